// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! vCalendar 1.0 positional recurrence-rule grammar.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::keyword::{
    KW_V1_DAILY, KW_V1_DURATION_PREFIX, KW_V1_END_MARKER, KW_V1_LAST_DAY, KW_V1_MINUTELY,
    KW_V1_MONTHLY_DAY, KW_V1_MONTHLY_POS, KW_V1_WEEKLY, KW_V1_YEARLY_DAY, KW_V1_YEARLY_MONTH,
};
use crate::rrule::{
    DEFAULT_DURATION, Frequency, Weekday, int_in_range, positive_number, split_trailing_sign,
    whole_number,
};
use crate::span::Span;
use crate::value::{ClockValue, DateTimeValue, parse_timestamp};

/// Rule parsed from the vCalendar 1.0 positional grammar.
///
/// Which lists a rule populates depends on the marker family that opened
/// its sub-rule: `D` fills [`times_of_day`](Self::times_of_day), `W` fills
/// [`days_of_week`](Self::days_of_week) and times, `MP` fills
/// [`monthly_occurrences`](Self::monthly_occurrences) and weekdays, `MD`
/// fills [`month_days`](Self::month_days), `YM` fills
/// [`months`](Self::months), and `YD` fills [`year_days`](Self::year_days).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRuleV1 {
    /// Recurrence unit named by the marker that opened the sub-rule.
    pub frequency: Frequency,

    /// Repeat multiplier, the digits of the marker token.
    pub interval: u32,

    /// Occurrence count from a `#count` clause. `#0` is kept as `Some(0)`,
    /// not normalized away.
    pub count: Option<u32>,

    /// End bound from an end-timestamp token.
    pub end_date: Option<DateTimeValue>,

    /// `HHMM` time-of-day entries.
    pub times_of_day: Vec<Marked<ClockValue>>,

    /// Weekday entries.
    pub days_of_week: Vec<Marked<Weekday>>,

    /// Occurrence-in-month entries of an `MP` sub-rule.
    pub monthly_occurrences: Vec<Marked<MonthlyOccurrence>>,

    /// Day-of-month entries of an `MD` sub-rule.
    pub month_days: Vec<Marked<MonthDay>>,

    /// Month numbers of a `YM` sub-rule, 1-12.
    pub months: Vec<Marked<u8>>,

    /// Day-of-year numbers of a `YD` sub-rule, 1-366.
    pub year_days: Vec<Marked<u16>>,
}

impl RecurrenceRuleV1 {
    /// Occurrence count; [`DEFAULT_DURATION`] when the rule named none.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        match self.count {
            Some(count) => count,
            None => DEFAULT_DURATION,
        }
    }
}

// Canonical token order: marker+interval, occurrences, weekdays, times,
// month days, months, year days, then the `#count` or end-timestamp
// terminator. Fails for frequencies without a v1 marker form.
impl fmt::Display for RecurrenceRuleV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = self.frequency.v1_marker().ok_or(fmt::Error)?;
        write!(f, "{marker}{}", self.interval)?;
        for entry in &self.monthly_occurrences {
            write_marked(f, entry)?;
        }
        for entry in &self.days_of_week {
            write_marked(f, entry)?;
        }
        for entry in &self.times_of_day {
            write_marked(f, entry)?;
        }
        for entry in &self.month_days {
            write_marked(f, entry)?;
        }
        for entry in &self.months {
            write_marked(f, entry)?;
        }
        for entry in &self.year_days {
            write_marked(f, entry)?;
        }
        if let Some(count) = self.count {
            write!(f, " {KW_V1_DURATION_PREFIX}{count}")?;
        } else if let Some(end) = &self.end_date {
            write!(f, " {end}")?;
        }
        Ok(())
    }
}

fn write_marked<T: fmt::Display>(f: &mut fmt::Formatter<'_>, entry: &Marked<T>) -> fmt::Result {
    write!(f, " {}", entry.value)?;
    if entry.is_end {
        write!(f, "{KW_V1_END_MARKER}")?;
    }
    Ok(())
}

/// List entry with its `$` end-marker flag.
///
/// v1 lets a list run straight into the next sub-rule without a delimiter;
/// the `$` suffix marks a token as the last entry of its list so consumers
/// can tell where the list was meant to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marked<T> {
    /// Whether the token carried the `$` suffix.
    pub is_end: bool,

    /// The entry itself.
    pub value: T,
}

/// Occurrence-in-month entry of an `MP` sub-rule: `1+` is the first week,
/// `2-` the second-from-last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyOccurrence {
    /// Occurrence number, counted from the start or the end of the month.
    pub occurrence: u16,

    /// Whether the occurrence counts backward from the end (`-` suffix).
    pub negative: bool,
}

impl fmt::Display for MonthlyOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{}{sign}", self.occurrence)
    }
}

/// Day-of-month entry of an `MD` sub-rule.
///
/// The literal `LD` token means "last day of the month" and is stored with
/// [`is_last_day`](Self::is_last_day) set and a day of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    /// Day number, 1-31; 0 for `LD` entries.
    pub day: u8,

    /// Whether the day counts backward from the end of the month (`-`).
    pub negative: bool,

    /// Whether the token was the literal `LD`.
    pub is_last_day: bool,
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_last_day {
            f.write_str(KW_V1_LAST_DAY)
        } else if self.negative {
            write!(f, "{}-", self.day)
        } else {
            write!(f, "{}", self.day)
        }
    }
}

/// Parse a vCalendar 1.0 recurrence rule string.
///
/// One string may chain several sub-rules, each opened by a frequency
/// marker and closed by a `#count` clause, an end timestamp, or the next
/// marker: `D1 #5 M10 #6` is "daily for 5, then every 10 minutes for 6"
/// and yields two rules.
///
/// ## Errors
///
/// Fails on an unrecognized frequency marker, a numeric token outside its
/// range, or a token that does not fit the open marker family. The error
/// span points into `rule`.
pub fn parse_rule_v1(rule: &str) -> Result<Vec<RecurrenceRuleV1>, ParseError> {
    tracing::trace!(rule, "parsing v1 recurrence rule");

    let mut tokens = Tokens::new(rule);
    let Some(first) = tokens.next() else {
        return Err(ParseError::MalformedToken {
            token: String::new(),
            expected: "a frequency marker",
            span: Span::new(0, 0),
        });
    };

    let mut rules = Vec::new();
    let mut pending = first;
    loop {
        let (span, token) = pending;
        let Some((family, digits)) = split_marker(token) else {
            return Err(ParseError::UnrecognizedKey {
                key: token.to_owned(),
                what: "frequency marker",
                span,
            });
        };
        let interval = positive_number(digits, token, "a frequency interval", span)?;

        let (rule, next) = sub_rule(&mut tokens, family, interval)?;
        rules.push(rule);
        match next {
            Some(token) => pending = token,
            None => break,
        }
    }
    Ok(rules)
}

/// Marker families of the positional grammar. Unlike [`Frequency`], this
/// only covers what a v1 marker can open.
#[derive(Debug, Clone, Copy)]
enum Family {
    Minute,
    Daily,
    Weekly,
    MonthlyPos,
    MonthlyDay,
    YearlyMonth,
    YearlyDay,
}

impl Family {
    const fn frequency(self) -> Frequency {
        match self {
            Self::Minute => Frequency::Minute,
            Self::Daily => Frequency::Daily,
            Self::Weekly => Frequency::Weekly,
            Self::MonthlyPos => Frequency::MonthlyPos,
            Self::MonthlyDay => Frequency::MonthlyDay,
            Self::YearlyMonth => Frequency::YearlyMonth,
            Self::YearlyDay => Frequency::YearlyDay,
        }
    }
}

// Two-letter markers come first so `MD3` never reads as `M` plus junk.
const MARKERS: [(&str, Family); 7] = [
    (KW_V1_MONTHLY_POS, Family::MonthlyPos),
    (KW_V1_MONTHLY_DAY, Family::MonthlyDay),
    (KW_V1_YEARLY_MONTH, Family::YearlyMonth),
    (KW_V1_YEARLY_DAY, Family::YearlyDay),
    (KW_V1_MINUTELY, Family::Minute),
    (KW_V1_DAILY, Family::Daily),
    (KW_V1_WEEKLY, Family::Weekly),
];

/// Split a token into its marker family and interval digits. `None` when
/// the token is not shaped like a marker, e.g. the weekday `MO`.
fn split_marker(token: &str) -> Option<(Family, &str)> {
    MARKERS.iter().find_map(|&(marker, family)| {
        let rest = strip_prefix_ci(token, marker)?;
        (!rest.is_empty() && rest.bytes().all(|byte| byte.is_ascii_digit()))
            .then_some((family, rest))
    })
}

fn strip_prefix_ci<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let (head, rest) = token.split_at_checked(prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then_some(rest)
}

/// Consume tokens for one sub-rule until its terminator, the next marker,
/// or the end of input. Returns the rule and, when another marker
/// interrupted or followed it, that pending token.
fn sub_rule<'src>(
    tokens: &mut Tokens<'src>,
    family: Family,
    interval: u32,
) -> Result<(RecurrenceRuleV1, Option<(Span, &'src str)>), ParseError> {
    let mut count = None;
    let mut end_date = None;
    let mut times_of_day = Vec::new();
    let mut days_of_week = Vec::new();
    let mut monthly_occurrences = Vec::new();
    let mut month_days = Vec::new();
    let mut months = Vec::new();
    let mut year_days = Vec::new();
    let mut next = None;

    while let Some((span, token)) = tokens.next() {
        // `#count` terminator
        if let Some(digits) = token.strip_prefix(KW_V1_DURATION_PREFIX) {
            count = Some(whole_number(digits, token, "a duration count", span)?);
            next = tokens.next();
            break;
        }

        // A new marker interrupts the clause without a terminator.
        if split_marker(token).is_some() {
            next = Some((span, token));
            break;
        }

        // End-timestamp terminator.
        if let Some(value) = parse_timestamp(token) {
            end_date = Some(value);
            next = tokens.next();
            break;
        }

        let (is_end, content) = split_end_marker(token);
        match family {
            Family::Minute => {
                return Err(ParseError::MalformedToken {
                    token: token.to_owned(),
                    expected: "a duration or end date",
                    span,
                });
            }
            Family::Daily => times_of_day.push(Marked {
                is_end,
                value: clock_value(content, token, span)?,
            }),
            Family::Weekly => {
                if starts_with_digit(content) {
                    times_of_day.push(Marked {
                        is_end,
                        value: clock_value(content, token, span)?,
                    });
                } else {
                    days_of_week.push(Marked {
                        is_end,
                        value: weekday(content, token, span)?,
                    });
                }
            }
            Family::MonthlyPos => {
                if starts_with_digit(content) {
                    monthly_occurrences.push(Marked {
                        is_end,
                        value: monthly_occurrence(content, token, span)?,
                    });
                } else {
                    days_of_week.push(Marked {
                        is_end,
                        value: weekday(content, token, span)?,
                    });
                }
            }
            Family::MonthlyDay => month_days.push(Marked {
                is_end,
                value: month_day(content, token, span)?,
            }),
            Family::YearlyMonth => months.push(Marked {
                is_end,
                value: int_in_range(content, token, "a month of the year", 1u8, 12, span)?,
            }),
            Family::YearlyDay => year_days.push(Marked {
                is_end,
                value: int_in_range(content, token, "a day of the year", 1u16, 366, span)?,
            }),
        }
    }

    let rule = RecurrenceRuleV1 {
        frequency: family.frequency(),
        interval,
        count,
        end_date,
        times_of_day,
        days_of_week,
        monthly_occurrences,
        month_days,
        months,
        year_days,
    };
    Ok((rule, next))
}

fn split_end_marker(token: &str) -> (bool, &str) {
    match token.strip_suffix(KW_V1_END_MARKER) {
        Some(content) => (true, content),
        None => (false, token),
    }
}

fn starts_with_digit(token: &str) -> bool {
    token.bytes().next().is_some_and(|byte| byte.is_ascii_digit())
}

/// `HHMM`, exactly four digits.
fn clock_value(content: &str, token: &str, span: Span) -> Result<ClockValue, ParseError> {
    if content.len() != 4 || !content.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ParseError::MalformedToken {
            token: token.to_owned(),
            expected: "an HHMM time",
            span,
        });
    }
    let (hh, mm) = content.split_at(2);
    Ok(ClockValue {
        hour: int_in_range(hh, token, "an hour of the day", 0, 23, span)?,
        minute: int_in_range(mm, token, "a minute of the hour", 0, 59, span)?,
    })
}

fn weekday(content: &str, token: &str, span: Span) -> Result<Weekday, ParseError> {
    Weekday::from_str(content).map_err(|_| ParseError::MalformedToken {
        token: token.to_owned(),
        expected: "a weekday code",
        span,
    })
}

/// `<occurrence>[+|-]`, e.g. `1+` or `2-`.
fn monthly_occurrence(
    content: &str,
    token: &str,
    span: Span,
) -> Result<MonthlyOccurrence, ParseError> {
    let (negative, digits) = split_trailing_sign(content);
    let occurrence = int_in_range(digits, token, "an occurrence of the month", 1u16, 53, span)?;
    Ok(MonthlyOccurrence {
        occurrence,
        negative,
    })
}

/// `<day>[+|-]` or the literal `LD`.
fn month_day(content: &str, token: &str, span: Span) -> Result<MonthDay, ParseError> {
    if content.eq_ignore_ascii_case(KW_V1_LAST_DAY) {
        return Ok(MonthDay {
            day: 0,
            negative: false,
            is_last_day: true,
        });
    }
    let (negative, digits) = split_trailing_sign(content);
    let day = int_in_range(digits, token, "a day of the month", 1u8, 31, span)?;
    Ok(MonthDay {
        day,
        negative,
        is_last_day: false,
    })
}

/// Whitespace-delimited tokens of a rule string, with their byte spans.
struct Tokens<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Tokens<'src> {
    const fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }
}

impl<'src> Iterator for Tokens<'src> {
    type Item = (Span, &'src str);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.src.get(self.pos..)?;
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            self.pos = self.src.len();
            return None;
        }
        let start = self.pos + (rest.len() - trimmed.len());
        let end = trimmed
            .find(char::is_whitespace)
            .map_or(self.src.len(), |at| start + at);
        self.pos = end;
        let token = self.src.get(start..end)?;
        Some((Span::new(start, end), token))
    }
}
