// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! vCalendar 2.0 `FREQ=...;...` recurrence-rule grammar.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY,
    KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT,
    KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::rrule::{
    DEFAULT_DURATION, Frequency, SignedValue, Weekday, int_in_range, positive_number,
    signed_in_range, split_sign, whole_number,
};
use crate::span::Span;
use crate::value::{DateTimeValue, parse_date_time};

/// Rule parsed from the vCalendar 2.0 key=value grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRuleV2 {
    /// Recurrence unit from the mandatory `FREQ` part.
    pub frequency: Frequency,

    /// End bound from `UNTIL`; mutually exclusive with `count`.
    pub until: Option<DateTimeValue>,

    /// Occurrence count from `COUNT`.
    pub count: Option<u32>,

    /// Repeat multiplier from `INTERVAL`; 1 when absent.
    pub interval: u32,

    /// `BYSECOND` entries, 0-60 (60 allows a positive leap second).
    pub by_second: Vec<u8>,

    /// `BYMINUTE` entries, 0-59.
    pub by_minute: Vec<u8>,

    /// `BYHOUR` entries, 0-23.
    pub by_hour: Vec<u8>,

    /// `BYDAY` entries.
    pub by_day: Vec<OrdinalWeekday>,

    /// `BYMONTHDAY` entries, magnitude 1-31.
    pub by_month_day: Vec<SignedValue>,

    /// `BYYEARDAY` entries, magnitude 1-366.
    pub by_year_day: Vec<SignedValue>,

    /// `BYWEEKNO` entries, magnitude 1-53.
    pub by_week_no: Vec<SignedValue>,

    /// `BYMONTH` entries, 1-12, unsigned.
    pub by_month: Vec<u8>,

    /// `BYSETPOS` entries, magnitude 1-366.
    pub by_set_pos: Vec<SignedValue>,

    /// Week start from `WKST`; Sunday when absent.
    pub week_start: Weekday,
}

impl RecurrenceRuleV2 {
    /// Occurrence count; [`DEFAULT_DURATION`] when the rule named none.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        match self.count {
            Some(count) => count,
            None => DEFAULT_DURATION,
        }
    }
}

// Canonical part order: FREQ, then UNTIL or COUNT when set, INTERVAL when
// not 1, the by-lists in grammar order, WKST when not the Sunday default.
// Fails for frequencies without a `FREQ` keyword form.
impl fmt::Display for RecurrenceRuleV2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.frequency.rrule_keyword().ok_or(fmt::Error)?;
        write!(f, "{KW_RRULE_FREQ}={keyword}")?;
        if let Some(until) = &self.until {
            write!(f, ";{KW_RRULE_UNTIL}={until}")?;
        } else if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }
        if self.interval != 1 {
            write!(f, ";{KW_RRULE_INTERVAL}={}", self.interval)?;
        }
        write_list(f, KW_RRULE_BYSECOND, &self.by_second)?;
        write_list(f, KW_RRULE_BYMINUTE, &self.by_minute)?;
        write_list(f, KW_RRULE_BYHOUR, &self.by_hour)?;
        write_list(f, KW_RRULE_BYDAY, &self.by_day)?;
        write_list(f, KW_RRULE_BYMONTHDAY, &self.by_month_day)?;
        write_list(f, KW_RRULE_BYYEARDAY, &self.by_year_day)?;
        write_list(f, KW_RRULE_BYWEEKNO, &self.by_week_no)?;
        write_list(f, KW_RRULE_BYMONTH, &self.by_month)?;
        write_list(f, KW_RRULE_BYSETPOS, &self.by_set_pos)?;
        if self.week_start != Weekday::default() {
            write!(f, ";{KW_RRULE_WKST}={}", self.week_start)?;
        }
        Ok(())
    }
}

/// `BYDAY` entry: a weekday with an optional signed week ordinal.
///
/// `1FR` is the first Friday, `-1SU` the last Sunday. A bare weekday code
/// keeps `week_num` 0, the "every such weekday" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalWeekday {
    /// Whether the ordinal counts backward from the end (`-` prefix).
    pub negative: bool,

    /// Week ordinal, 1-53; 0 when the token had none.
    pub week_num: u8,

    /// The weekday code.
    pub weekday: Weekday,
}

impl fmt::Display for OrdinalWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.week_num > 0 {
            if self.negative {
                f.write_str("-")?;
            }
            write!(f, "{}", self.week_num)?;
        }
        write!(f, "{}", self.weekday)
    }
}

/// Parse a vCalendar 2.0 recurrence rule string into exactly one rule.
///
/// Parts may come in any order; every key may appear at most once, `FREQ`
/// must appear, and `UNTIL`/`COUNT` exclude each other.
///
/// ## Errors
///
/// Fails on an unrecognized or repeated key, a part without `=`, a value
/// outside its documented range, or a malformed value token. The error
/// span points into `rule`.
pub fn parse_rule_v2(rule: &str) -> Result<RecurrenceRuleV2, ParseError> {
    tracing::trace!(rule, "parsing v2 recurrence rule");

    // FREQ presence is a whole-string scan, so the error is the same no
    // matter where in the part list it would have been.
    if !rule.to_ascii_uppercase().contains(KW_RRULE_FREQ) {
        return Err(ParseError::MissingRequiredKey { key: KW_RRULE_FREQ });
    }

    let mut seen: Vec<RuleKey> = Vec::new();
    let mut frequency = None;
    let mut until = None;
    let mut count = None;
    let mut interval = 1;
    let mut by_second = Vec::new();
    let mut by_minute = Vec::new();
    let mut by_hour = Vec::new();
    let mut by_day = Vec::new();
    let mut by_month_day = Vec::new();
    let mut by_year_day = Vec::new();
    let mut by_week_no = Vec::new();
    let mut by_month = Vec::new();
    let mut by_set_pos = Vec::new();
    let mut week_start = Weekday::default();

    let mut part_start = 0;
    for part in rule.split(';') {
        let part_span = Span::new(part_start, part_start + part.len());
        part_start = part_span.end + 1;

        let Some(at) = part.find('=') else {
            return Err(ParseError::MissingDelimiter {
                delimiter: '=',
                span: part_span,
            });
        };
        let (key_str, rest) = part.split_at(at);
        let value = rest.get(1..).unwrap_or_default();
        let key_span = Span::new(part_span.start, part_span.start + key_str.len());
        let value_span = Span::new(key_span.end + 1, part_span.end);

        let Some(key) = RuleKey::from_keyword(key_str) else {
            return Err(ParseError::UnrecognizedKey {
                key: key_str.to_owned(),
                what: "rule key name",
                span: key_span,
            });
        };

        if seen.contains(&key) {
            return Err(ParseError::DuplicateKey {
                key: key.keyword(),
                span: key_span,
            });
        }
        seen.push(key);

        // The exclusion fires at the second member of the pair, before its
        // value is even looked at.
        if seen.contains(&RuleKey::Until) && seen.contains(&RuleKey::Count) {
            let (first, second) = match key {
                RuleKey::Count => (KW_RRULE_UNTIL, KW_RRULE_COUNT),
                _ => (KW_RRULE_COUNT, KW_RRULE_UNTIL),
            };
            return Err(ParseError::MutuallyExclusiveKeys {
                first,
                second,
                span: key_span,
            });
        }

        match key {
            RuleKey::Freq => {
                frequency = Some(Frequency::from_rrule_keyword(value).ok_or_else(|| {
                    ParseError::UnrecognizedKey {
                        key: value.to_owned(),
                        what: "frequency",
                        span: value_span,
                    }
                })?);
            }
            RuleKey::Until => {
                until = Some(parse_date_time(value).ok_or_else(|| {
                    ParseError::MalformedToken {
                        token: value.to_owned(),
                        expected: "a date or date-time",
                        span: value_span,
                    }
                })?);
            }
            RuleKey::Count => {
                count = Some(whole_number(
                    value,
                    value,
                    "a count of occurrences",
                    value_span,
                )?);
            }
            RuleKey::Interval => {
                interval = positive_number(value, value, "a repeat interval", value_span)?;
            }
            RuleKey::BySecond => {
                by_second = list(value, value_span.start, |token, span| {
                    int_in_range(token, token, "a second of the minute", 0u8, 60, span)
                })?;
            }
            RuleKey::ByMinute => {
                by_minute = list(value, value_span.start, |token, span| {
                    int_in_range(token, token, "a minute of the hour", 0u8, 59, span)
                })?;
            }
            RuleKey::ByHour => {
                by_hour = list(value, value_span.start, |token, span| {
                    int_in_range(token, token, "an hour of the day", 0u8, 23, span)
                })?;
            }
            RuleKey::ByDay => {
                by_day = list(value, value_span.start, ordinal_weekday)?;
            }
            RuleKey::ByMonthDay => {
                by_month_day = list(value, value_span.start, |token, span| {
                    signed_in_range(token, "a day of the month", 1, 31, span)
                })?;
            }
            RuleKey::ByYearDay => {
                by_year_day = list(value, value_span.start, |token, span| {
                    signed_in_range(token, "a day of the year", 1, 366, span)
                })?;
            }
            RuleKey::ByWeekNo => {
                by_week_no = list(value, value_span.start, |token, span| {
                    signed_in_range(token, "a week of the year", 1, 53, span)
                })?;
            }
            RuleKey::ByMonth => {
                by_month = list(value, value_span.start, |token, span| {
                    int_in_range(token, token, "a month of the year", 1u8, 12, span)
                })?;
            }
            RuleKey::BySetPos => {
                by_set_pos = list(value, value_span.start, |token, span| {
                    signed_in_range(token, "a set position", 1, 366, span)
                })?;
            }
            RuleKey::WeekStart => {
                week_start = Weekday::from_str(value).map_err(|_| ParseError::MalformedToken {
                    token: value.to_owned(),
                    expected: "a weekday code",
                    span: value_span,
                })?;
            }
        }
    }

    let frequency = frequency.ok_or(ParseError::MissingRequiredKey { key: KW_RRULE_FREQ })?;

    Ok(RecurrenceRuleV2 {
        frequency,
        until,
        count,
        interval,
        by_second,
        by_minute,
        by_hour,
        by_day,
        by_month_day,
        by_year_day,
        by_week_no,
        by_month,
        by_set_pos,
        week_start,
    })
}

/// The closed key set of the v2 grammar.
///
/// Matching goes through [`from_keyword`](Self::from_keyword) so that the
/// per-key handling is an exhaustive enum match instead of a string
/// comparison chain; [`keyword`](Self::keyword) maps back to the canonical
/// spelling for error messages regardless of how the input spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKey {
    Freq,
    Until,
    Count,
    Interval,
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
    WeekStart,
}

impl RuleKey {
    fn from_keyword(key: &str) -> Option<Self> {
        match key.to_ascii_uppercase().as_str() {
            KW_RRULE_FREQ => Some(Self::Freq),
            KW_RRULE_UNTIL => Some(Self::Until),
            KW_RRULE_COUNT => Some(Self::Count),
            KW_RRULE_INTERVAL => Some(Self::Interval),
            KW_RRULE_BYSECOND => Some(Self::BySecond),
            KW_RRULE_BYMINUTE => Some(Self::ByMinute),
            KW_RRULE_BYHOUR => Some(Self::ByHour),
            KW_RRULE_BYDAY => Some(Self::ByDay),
            KW_RRULE_BYMONTHDAY => Some(Self::ByMonthDay),
            KW_RRULE_BYYEARDAY => Some(Self::ByYearDay),
            KW_RRULE_BYWEEKNO => Some(Self::ByWeekNo),
            KW_RRULE_BYMONTH => Some(Self::ByMonth),
            KW_RRULE_BYSETPOS => Some(Self::BySetPos),
            KW_RRULE_WKST => Some(Self::WeekStart),
            _ => None,
        }
    }

    const fn keyword(self) -> &'static str {
        match self {
            Self::Freq => KW_RRULE_FREQ,
            Self::Until => KW_RRULE_UNTIL,
            Self::Count => KW_RRULE_COUNT,
            Self::Interval => KW_RRULE_INTERVAL,
            Self::BySecond => KW_RRULE_BYSECOND,
            Self::ByMinute => KW_RRULE_BYMINUTE,
            Self::ByHour => KW_RRULE_BYHOUR,
            Self::ByDay => KW_RRULE_BYDAY,
            Self::ByMonthDay => KW_RRULE_BYMONTHDAY,
            Self::ByYearDay => KW_RRULE_BYYEARDAY,
            Self::ByWeekNo => KW_RRULE_BYWEEKNO,
            Self::ByMonth => KW_RRULE_BYMONTH,
            Self::BySetPos => KW_RRULE_BYSETPOS,
            Self::WeekStart => KW_RRULE_WKST,
        }
    }
}

/// Comma-split a rule value, handing each element and its span to `parse`.
fn list<T>(
    value: &str,
    value_start: usize,
    parse: impl Fn(&str, Span) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let mut items = Vec::new();
    let mut start = value_start;
    for element in value.split(',') {
        let span = Span::new(start, start + element.len());
        items.push(parse(element, span)?);
        start = span.end + 1;
    }
    Ok(items)
}

/// `[sign][1-2 digit ordinal]weekday`, e.g. `1FR`, `-2MO`, `TU`.
fn ordinal_weekday(token: &str, span: Span) -> Result<OrdinalWeekday, ParseError> {
    let at = token
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    let (prefix, code) = token.split_at(at);

    let weekday = Weekday::from_str(code).map_err(|_| ParseError::MalformedToken {
        token: token.to_owned(),
        expected: "a weekday code",
        span,
    })?;

    let (negative, week_num) = if prefix.is_empty() {
        (false, 0)
    } else {
        let (negative, digits) = split_sign(prefix);
        let week_num = int_in_range(digits, token, "a week ordinal", 1u8, 53, span)?;
        (negative, week_num)
    };

    Ok(OrdinalWeekday {
        negative,
        week_num,
        weekday,
    })
}

/// Write `;KEY=a,b,c` when `values` is non-empty; nothing otherwise.
fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    key: &str,
    values: &[T],
) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    write!(f, ";{key}=")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}
