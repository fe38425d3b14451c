// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rules, shared across the vCalendar 1.0 and 2.0 grammars.
//!
//! The two grammars are incompatible on the wire: 1.0 writes positional
//! rules like `W2 MO TU #10`, 2.0 writes `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,TU`.
//! Each gets its own parser and rule struct ([`RecurrenceRuleV1`],
//! [`RecurrenceRuleV2`]); the [`RecurrenceRule`] enum unifies them behind the
//! small capability surface cross-version consumers need: [`frequency`],
//! [`interval`], [`duration`] and [`end_date`].
//!
//! [`frequency`]: RecurrenceRule::frequency
//! [`interval`]: RecurrenceRule::interval
//! [`duration`]: RecurrenceRule::duration
//! [`end_date`]: RecurrenceRule::end_date

use std::fmt::{self, Display};

use crate::error::ParseError;
use crate::keyword::{
    KW_FREQ_DAILY, KW_FREQ_HOURLY, KW_FREQ_MINUTELY, KW_FREQ_MONTHLY, KW_FREQ_SECONDLY,
    KW_FREQ_WEEKLY, KW_FREQ_YEARLY, KW_V1_DAILY, KW_V1_MINUTELY, KW_V1_MONTHLY_DAY,
    KW_V1_MONTHLY_POS, KW_V1_WEEKLY, KW_V1_YEARLY_DAY, KW_V1_YEARLY_MONTH,
};
use crate::span::Span;
use crate::value::DateTimeValue;

mod v1;
mod v2;

pub use v1::{Marked, MonthDay, MonthlyOccurrence, RecurrenceRuleV1, parse_rule_v1};
pub use v2::{OrdinalWeekday, RecurrenceRuleV2, parse_rule_v2};

/// Occurrence count reported when a rule names neither a count nor an end
/// date: the base occurrence plus one repeat.
///
/// Bare rules have always meant "happens twice" to the vCalendar tooling
/// this crate interoperates with, so the value is kept literal rather than
/// normalized to 0 or 1.
pub const DEFAULT_DURATION: u32 = 2;

/// Which grammar a rule was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleVersion {
    /// vCalendar 1.0 positional grammar.
    V1,
    /// vCalendar 2.0 `FREQ=...;...` grammar (RFC 5545 style).
    V2,
}

impl RuleVersion {
    /// The version string as written in `VERSION` properties.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V2 => "2.0",
        }
    }
}

impl Display for RuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Governing recurrence unit of a single rule.
///
/// The first seven variants are the v2 `FREQ` keywords; the `Monthly*` and
/// `Yearly*` variants past them are the v1 marker families, which fold the
/// by-list kind into the frequency itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Every second (`FREQ=SECONDLY`).
    Second,
    /// Every minute (`FREQ=MINUTELY`; v1 `M` marker).
    Minute,
    /// Every hour (`FREQ=HOURLY`).
    Hourly,
    /// Every day (`FREQ=DAILY`; v1 `D` marker).
    Daily,
    /// Every week (`FREQ=WEEKLY`; v1 `W` marker).
    Weekly,
    /// Every month (`FREQ=MONTHLY`).
    Monthly,
    /// Every year (`FREQ=YEARLY`).
    Yearly,
    /// Every month on given weekday occurrences (v1 `MP` marker).
    MonthlyPos,
    /// Every month on given day numbers (v1 `MD` marker).
    MonthlyDay,
    /// Every year in given months (v1 `YM` marker).
    YearlyMonth,
    /// Every year on given day numbers (v1 `YD` marker).
    YearlyDay,
    /// By set position. Reserved for set-position consumers; produced by
    /// neither grammar.
    Position,
}

impl Frequency {
    /// Map a v2 `FREQ` keyword to its frequency, case-insensitively.
    #[must_use]
    pub fn from_rrule_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            KW_FREQ_SECONDLY => Some(Self::Second),
            KW_FREQ_MINUTELY => Some(Self::Minute),
            KW_FREQ_HOURLY => Some(Self::Hourly),
            KW_FREQ_DAILY => Some(Self::Daily),
            KW_FREQ_WEEKLY => Some(Self::Weekly),
            KW_FREQ_MONTHLY => Some(Self::Monthly),
            KW_FREQ_YEARLY => Some(Self::Yearly),
            _ => None,
        }
    }

    /// The v2 `FREQ` keyword for this frequency, when it has one.
    #[must_use]
    pub const fn rrule_keyword(self) -> Option<&'static str> {
        match self {
            Self::Second => Some(KW_FREQ_SECONDLY),
            Self::Minute => Some(KW_FREQ_MINUTELY),
            Self::Hourly => Some(KW_FREQ_HOURLY),
            Self::Daily => Some(KW_FREQ_DAILY),
            Self::Weekly => Some(KW_FREQ_WEEKLY),
            Self::Monthly => Some(KW_FREQ_MONTHLY),
            Self::Yearly => Some(KW_FREQ_YEARLY),
            Self::MonthlyPos | Self::MonthlyDay | Self::YearlyMonth | Self::YearlyDay
            | Self::Position => None,
        }
    }

    /// The v1 frequency-marker letters for this frequency, when it has them.
    #[must_use]
    pub const fn v1_marker(self) -> Option<&'static str> {
        match self {
            Self::Minute => Some(KW_V1_MINUTELY),
            Self::Daily => Some(KW_V1_DAILY),
            Self::Weekly => Some(KW_V1_WEEKLY),
            Self::MonthlyPos => Some(KW_V1_MONTHLY_POS),
            Self::MonthlyDay => Some(KW_V1_MONTHLY_DAY),
            Self::YearlyMonth => Some(KW_V1_YEARLY_MONTH),
            Self::YearlyDay => Some(KW_V1_YEARLY_DAY),
            Self::Second | Self::Hourly | Self::Monthly | Self::Yearly | Self::Position => None,
        }
    }
}

/// Day of the week, written as the fixed two-letter codes.
///
/// `FromStr` accepts the codes in any case; `Display` writes them uppercase.
/// The default is Sunday, the week start a v2 rule assumes when `WKST` is
/// absent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Weekday {
    #[default]
    #[strum(serialize = "SU")]
    Sunday,
    #[strum(serialize = "MO")]
    Monday,
    #[strum(serialize = "TU")]
    Tuesday,
    #[strum(serialize = "WE")]
    Wednesday,
    #[strum(serialize = "TH")]
    Thursday,
    #[strum(serialize = "FR")]
    Friday,
    #[strum(serialize = "SA")]
    Saturday,
}

/// Magnitude with its written sign, as used by the signed by-lists.
///
/// `5` and `+5` both parse with `negative == false`. A negative entry counts
/// backward from the end of its period, e.g. `BYMONTHDAY=-1` is the last day
/// of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedValue {
    /// Whether the token carried a `-` sign.
    pub negative: bool,
    /// Unsigned magnitude, range-checked at parse time.
    pub value: u16,
}

impl SignedValue {
    /// The magnitude with its sign applied.
    #[must_use]
    pub fn signed(self) -> i32 {
        if self.negative {
            -i32::from(self.value)
        } else {
            i32::from(self.value)
        }
    }
}

impl Display for SignedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.value)
    }
}

/// A parsed recurrence rule from either grammar.
///
/// v1 parsing can fan a single rule string out into several chained rules;
/// each chain element becomes its own value here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// Rule parsed by the vCalendar 1.0 grammar.
    V1(RecurrenceRuleV1),
    /// Rule parsed by the vCalendar 2.0 grammar.
    V2(RecurrenceRuleV2),
}

impl RecurrenceRule {
    /// Grammar that produced this rule.
    #[must_use]
    pub const fn version(&self) -> RuleVersion {
        match self {
            Self::V1(_) => RuleVersion::V1,
            Self::V2(_) => RuleVersion::V2,
        }
    }

    /// Governing recurrence unit.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::V1(rule) => rule.frequency,
            Self::V2(rule) => rule.frequency,
        }
    }

    /// Repeat multiplier between occurrences.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        match self {
            Self::V1(rule) => rule.interval,
            Self::V2(rule) => rule.interval,
        }
    }

    /// Occurrence count; [`DEFAULT_DURATION`] when the rule names none.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        match self {
            Self::V1(rule) => rule.duration(),
            Self::V2(rule) => rule.duration(),
        }
    }

    /// End bound, when an `UNTIL` value or end timestamp was supplied.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTimeValue> {
        match self {
            Self::V1(rule) => rule.end_date,
            Self::V2(rule) => rule.until,
        }
    }
}

impl From<RecurrenceRuleV1> for RecurrenceRule {
    fn from(rule: RecurrenceRuleV1) -> Self {
        Self::V1(rule)
    }
}

impl From<RecurrenceRuleV2> for RecurrenceRule {
    fn from(rule: RecurrenceRuleV2) -> Self {
        Self::V2(rule)
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1(rule) => rule.fmt(f),
            Self::V2(rule) => rule.fmt(f),
        }
    }
}

/// Parse a recurrence rule string with the grammar `version` selects.
///
/// A v1 string may chain several sub-rules and yields one element per chain
/// link; a v2 string always yields exactly one.
///
/// ## Examples
///
/// ```
/// use versit::{Frequency, RuleVersion, parse_rule};
///
/// let rules = parse_rule(RuleVersion::V1, "D1 #5 M10 #6")?;
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[0].frequency(), Frequency::Daily);
///
/// let rules = parse_rule(RuleVersion::V2, "FREQ=WEEKLY;BYDAY=MO,TU")?;
/// assert_eq!(rules.len(), 1);
/// # Ok::<(), versit::ParseError>(())
/// ```
///
/// ## Errors
///
/// Any malformed token terminates the call with a [`ParseError`] pointing
/// at the offending slice of `rule`.
pub fn parse_rule(version: RuleVersion, rule: &str) -> Result<Vec<RecurrenceRule>, ParseError> {
    match version {
        RuleVersion::V1 => Ok(parse_rule_v1(rule)?
            .into_iter()
            .map(RecurrenceRule::V1)
            .collect()),
        RuleVersion::V2 => Ok(vec![RecurrenceRule::V2(parse_rule_v2(rule)?)]),
    }
}

/// Split an optional leading `+`/`-` sign off a token.
fn split_sign(token: &str) -> (bool, &str) {
    match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    }
}

/// Split an optional trailing `+`/`-` sign off a token, the v1 convention.
fn split_trailing_sign(token: &str) -> (bool, &str) {
    match token.strip_suffix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_suffix('+').unwrap_or(token)),
    }
}

/// Parse `digits` as an integer inside `min..=max`.
///
/// `token` is the full token as written, echoed in errors; it differs from
/// `digits` when the caller has already stripped a sign or a suffix.
fn int_in_range<T>(
    digits: &str,
    token: &str,
    what: &'static str,
    min: T,
    max: T,
    span: Span,
) -> Result<T, ParseError>
where
    T: TryFrom<u32> + Into<i32> + PartialOrd + Copy,
{
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ParseError::MalformedToken {
            token: token.to_owned(),
            expected: what,
            span,
        });
    }
    let out_of_range = || ParseError::OutOfRange {
        token: token.to_owned(),
        what,
        min: min.into(),
        max: max.into(),
        span,
    };
    let wide = lexical::parse::<u32, _>(digits).map_err(|_| out_of_range())?;
    match T::try_from(wide) {
        Ok(value) if (min..=max).contains(&value) => Ok(value),
        _ => Err(out_of_range()),
    }
}

/// `[+|-]digits` with the leading-sign convention v2 by-lists use.
fn signed_in_range(
    token: &str,
    what: &'static str,
    min: u16,
    max: u16,
    span: Span,
) -> Result<SignedValue, ParseError> {
    let (negative, digits) = split_sign(token);
    let value = int_in_range(digits, token, what, min, max, span)?;
    Ok(SignedValue { negative, value })
}

/// Parse a full token of plain digits as a `u32`.
fn whole_number(
    digits: &str,
    token: &str,
    what: &'static str,
    span: Span,
) -> Result<u32, ParseError> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ParseError::MalformedToken {
            token: token.to_owned(),
            expected: what,
            span,
        });
    }
    lexical::parse::<u32, _>(digits).map_err(|_| ParseError::MalformedToken {
        token: token.to_owned(),
        expected: what,
        span,
    })
}

/// Like [`whole_number`], but zero is rejected.
fn positive_number(
    digits: &str,
    token: &str,
    what: &'static str,
    span: Span,
) -> Result<u32, ParseError> {
    match whole_number(digits, token, what, span)? {
        0 => Err(ParseError::MalformedToken {
            token: token.to_owned(),
            expected: what,
            span,
        }),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::indexing_slicing)]

    use std::str::FromStr;

    use super::*;

    #[test]
    fn maps_freq_keywords_case_insensitively() {
        #[rustfmt::skip]
        let cases = [
            ("SECONDLY", Frequency::Second),
            ("MINUTELY", Frequency::Minute),
            ("HOURLY",   Frequency::Hourly),
            ("daily",    Frequency::Daily),
            ("Weekly",   Frequency::Weekly),
            ("MONTHLY",  Frequency::Monthly),
            ("yearly",   Frequency::Yearly),
        ];
        for (keyword, expected) in cases {
            assert_eq!(
                Frequency::from_rrule_keyword(keyword),
                Some(expected),
                "failed for {keyword}"
            );
        }
        assert_eq!(Frequency::from_rrule_keyword("MIN"), None);
        assert_eq!(Frequency::from_rrule_keyword(""), None);
    }

    #[test]
    fn keyword_and_marker_mappings_are_disjoint_where_expected() {
        assert_eq!(Frequency::Daily.rrule_keyword(), Some("DAILY"));
        assert_eq!(Frequency::Daily.v1_marker(), Some("D"));
        assert_eq!(Frequency::MonthlyPos.rrule_keyword(), None);
        assert_eq!(Frequency::MonthlyPos.v1_marker(), Some("MP"));
        assert_eq!(Frequency::Second.v1_marker(), None);
        assert_eq!(Frequency::Position.rrule_keyword(), None);
        assert_eq!(Frequency::Position.v1_marker(), None);
    }

    #[test]
    fn weekday_codes_parse_in_any_case_and_print_uppercase() {
        assert_eq!(Weekday::from_str("MO"), Ok(Weekday::Monday));
        assert_eq!(Weekday::from_str("mo"), Ok(Weekday::Monday));
        assert_eq!(Weekday::from_str("Su"), Ok(Weekday::Sunday));
        assert!(Weekday::from_str("XX").is_err());
        assert!(Weekday::from_str("MONDAY").is_err());
        assert_eq!(Weekday::Thursday.to_string(), "TH");
        assert_eq!(Weekday::default(), Weekday::Sunday);
    }

    #[test]
    fn signed_tokens_take_an_optional_leading_sign() {
        let span = Span::new(0, 2);
        #[rustfmt::skip]
        let success_cases = [
            ("5",   SignedValue { negative: false, value: 5 }),
            ("+5",  SignedValue { negative: false, value: 5 }),
            ("-5",  SignedValue { negative: true,  value: 5 }),
            ("31",  SignedValue { negative: false, value: 31 }),
            ("-31", SignedValue { negative: true,  value: 31 }),
            ("05",  SignedValue { negative: false, value: 5 }),
        ];
        for (token, expected) in success_cases {
            let value = signed_in_range(token, "day of month", 1, 31, span).unwrap();
            assert_eq!(value, expected, "failed for {token}");
        }
        assert_eq!(
            signed_in_range("-5", "day of month", 1, 31, span)
                .unwrap()
                .signed(),
            -5
        );

        for token in ["", "+", "-", "++5", "--5", "+-5", "5a", "abc"] {
            let err = signed_in_range(token, "day of month", 1, 31, span).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedToken { .. }),
                "{token} should be malformed, got {err:?}"
            );
        }
        for token in ["0", "32", "-32", "99999999999"] {
            let err = signed_in_range(token, "day of month", 1, 31, span).unwrap_err();
            assert!(
                matches!(err, ParseError::OutOfRange { .. }),
                "{token} should be out of range, got {err:?}"
            );
        }
    }

    #[test]
    fn trailing_signs_split_off_the_last_character() {
        assert_eq!(split_trailing_sign("3-"), (true, "3"));
        assert_eq!(split_trailing_sign("3+"), (false, "3"));
        assert_eq!(split_trailing_sign("3"), (false, "3"));
        // A leading sign is not the v1 shape; it stays on the digits and
        // fails the digit check downstream.
        assert_eq!(split_trailing_sign("-3"), (false, "-3"));
    }

    #[test]
    fn range_errors_echo_token_and_bounds() {
        let err = int_in_range::<u8>("61", "61", "seconds of minute", 0, 60, Span::new(20, 22))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'61'"), "bad message: {msg}");
        assert!(msg.contains("0 to 60"), "bad message: {msg}");
        assert_eq!(err.span(), Some(Span::new(20, 22)));
    }

    #[test]
    fn whole_numbers_reject_signs_and_zero_where_required() {
        let span = Span::new(0, 1);
        assert_eq!(whole_number("0", "0", "a count", span), Ok(0));
        assert_eq!(whole_number("10", "10", "a count", span), Ok(10));
        assert!(whole_number("+10", "+10", "a count", span).is_err());
        assert!(whole_number("", "", "a count", span).is_err());
        assert_eq!(positive_number("3", "3", "an interval", span), Ok(3));
        assert!(positive_number("0", "0", "an interval", span).is_err());
    }

    #[test]
    fn dispatches_on_rule_version() {
        let rules = parse_rule(RuleVersion::V1, "D2 #0").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].version(), RuleVersion::V1);
        assert_eq!(rules[0].frequency(), Frequency::Daily);
        assert_eq!(rules[0].interval(), 2);
        assert_eq!(rules[0].duration(), 0);

        let rules = parse_rule(RuleVersion::V2, "FREQ=DAILY").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].version(), RuleVersion::V2);
        assert_eq!(rules[0].duration(), DEFAULT_DURATION);
        assert_eq!(rules[0].end_date(), None);
    }

    #[test]
    fn version_strings_match_the_version_property() {
        assert_eq!(RuleVersion::V1.to_string(), "1.0");
        assert_eq!(RuleVersion::V2.as_str(), "2.0");
    }
}
