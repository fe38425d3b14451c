// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date, time and timestamp values as they appear inside recurrence rules.
//!
//! Each type's `Display` writes the wire shape its parser reads, so the
//! write path is the symmetric inverse of the grammar.

use std::fmt;

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::input::Stream;
use chumsky::label::LabelError;
use chumsky::prelude::*;

use crate::value::ValueExpected;

/// Calendar date, `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue {
    /// Year component.
    pub year: i16,

    /// Month component, 1-12.
    pub month: i8,

    /// Day component, 1-31.
    pub day: i8,
}

impl DateValue {
    /// Convert to `jiff::civil::Date`.
    #[cfg(feature = "jiff")]
    #[must_use]
    pub fn civil_date(self) -> jiff::civil::Date {
        jiff::civil::date(self.year, self.month, self.day)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Time of day with seconds, `HHMMSS` with an optional trailing `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    /// Hour component, 0-23.
    pub hour: u8,

    /// Minute component, 0-59.
    pub minute: u8,

    /// Second component, 0-60 (60 for a positive leap second).
    pub second: u8,

    /// Whether a trailing `Z` marked the time as UTC.
    pub utc: bool,
}

impl TimeValue {
    /// Convert to `jiff::civil::Time`. A leap second is contracted to 59.
    #[cfg(feature = "jiff")]
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn civil_time(self) -> jiff::civil::Time {
        jiff::civil::time(self.hour as i8, self.minute as i8, self.second.min(59) as i8, 0)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
        if self.utc {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

/// Time of day without seconds, `HHMM` — the shape vCalendar 1.0 rule
/// strings use for their time lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockValue {
    /// Hour component, 0-23.
    pub hour: u8,

    /// Minute component, 0-59.
    pub minute: u8,
}

impl ClockValue {
    /// Convert to `jiff::civil::Time`.
    #[cfg(feature = "jiff")]
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn civil_time(self) -> jiff::civil::Time {
        jiff::civil::time(self.hour as i8, self.minute as i8, 0, 0)
    }
}

impl fmt::Display for ClockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)
    }
}

/// A date with an optional time part: `YYYYMMDD` or `YYYYMMDD"T"HHMMSS["Z"]`.
///
/// This is the shape of v2 `UNTIL` values and of v1 end-timestamp tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeValue {
    /// Date component.
    pub date: DateValue,

    /// Time component; `None` for date-only values.
    pub time: Option<TimeValue>,
}

impl DateTimeValue {
    /// Whether the value was marked UTC with a trailing `Z`.
    #[must_use]
    pub fn is_utc(&self) -> bool {
        self.time.is_some_and(|time| time.utc)
    }

    /// Convert to `jiff::civil::DateTime`; midnight when no time part.
    #[cfg(feature = "jiff")]
    #[must_use]
    pub fn civil_date_time(&self) -> jiff::civil::DateTime {
        let time = self
            .time
            .map_or_else(jiff::civil::Time::midnight, TimeValue::civil_time);
        self.date.civil_date().to_datetime(time)
    }

    /// The instant this value names, for UTC-marked values.
    ///
    /// Returns `None` when the value carries no `Z` marker (its zone is
    /// unknown to this crate) or when the conversion fails.
    #[cfg(feature = "jiff")]
    #[must_use]
    pub fn timestamp(&self) -> Option<jiff::Timestamp> {
        if !self.is_utc() {
            return None;
        }
        self.civil_date_time()
            .to_zoned(jiff::tz::TimeZone::UTC)
            .ok()
            .map(|zoned| zoned.timestamp())
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.date.fmt(f)?;
        if let Some(time) = self.time {
            write!(f, "T{time}")?;
        }
        Ok(())
    }
}

/// Parse a `YYYYMMDD` or `YYYYMMDD"T"HHMMSS["Z"]` token. `None` when the
/// token does not match the shape exactly.
pub(crate) fn parse_date_time(token: &str) -> Option<DateTimeValue> {
    let stream = Stream::from_iter(token.chars());
    value_date_time::<'_, _, extra::Err<Rich<'_, char>>>()
        .parse(stream)
        .into_result()
        .ok()
}

/// Parse a `YYYYMMDD"T"HHMMSS["Z"]` token. `None` when the token does not
/// match; the time part is required here, unlike [`parse_date_time`].
pub(crate) fn parse_timestamp(token: &str) -> Option<DateTimeValue> {
    parse_date_time(token).filter(|value| value.time.is_some())
}

/// Format Definition:
///
/// ```txt
/// date-value         = date-fullyear date-month date-mday
/// date-fullyear      = 4DIGIT
/// date-month         = 2DIGIT        ;01-12
/// date-mday          = 2DIGIT        ;01-28, 01-29, 01-30, 01-31
///                                    ;based on month/year
/// ```
fn value_date<'src, I, E>() -> impl Parser<'src, I, DateValue, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    let year = i16_0_9()
        .then(i16_0_9())
        .then(i16_0_9())
        .then(i16_0_9())
        .map(|(((a, b), c), d)| 1000 * a + 100 * b + 10 * c + d);

    let month = choice((
        just('0').ignore_then(i8_1_9()),
        just('1').ignore_then(i8_0_2()).map(|b| 10 + b),
    ));

    let day = choice((
        just('0').ignore_then(i8_1_9()),
        i8_1_2().then(i8_0_9()).map(|(a, b)| 10 * a + b),
        just('3').ignore_then(i8_0_1()).map(|b| 30 + b),
    ));

    year.then(month)
        .then(day)
        .try_map(|((year, month), day), span| {
            #[cfg(feature = "jiff")]
            if jiff::civil::Date::new(year, month, day).is_err() {
                return Err(E::Error::expected_found([ValueExpected::Date], None, span));
            }
            #[cfg(not(feature = "jiff"))]
            let _ = span;
            Ok(DateValue { year, month, day })
        })
}

/// Format Definition:
///
/// ```txt
/// time         = time-hour time-minute time-second [time-utc]
///
/// time-hour    = 2DIGIT        ;00-23
/// time-minute  = 2DIGIT        ;00-59
/// time-second  = 2DIGIT        ;00-60
/// ;The "60" value is used to account for positive "leap" seconds.
///
/// time-utc     = "Z"
/// ```
fn value_time<'src, I, E>() -> impl Parser<'src, I, TimeValue, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    time_hour()
        .then(time_minute())
        .then(time_second())
        .then(just('Z').or_not())
        .map(|(((hour, minute), second), utc)| TimeValue {
            hour,
            minute,
            second,
            utc: utc.is_some(),
        })
}

/// Format Definition:
///
/// ```txt
/// date-time  = date ["T" time]
/// ```
///
/// The optional time part covers both `UNTIL` shapes, date-only and full
/// timestamp.
fn value_date_time<'src, I, E>() -> impl Parser<'src, I, DateTimeValue, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    value_date()
        .then(just('T').ignore_then(value_time()).or_not())
        .map(|(date, time)| DateTimeValue { date, time })
}

fn time_hour<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_1().then(u8_0_9()).map(|(a, b)| 10 * a + b),
        just('2').ignore_then(u8_0_3()).map(|b| 20 + b),
    ))
}

fn time_minute<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    u8_0_5().then(u8_0_9()).map(|(a, b)| 10 * a + b)
}

fn time_second<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_5().then(u8_0_9()).map(|(a, b)| 10 * a + b),
        just('6').ignore_then(just('0').ignored().to(60)), // leap second
    ))
}

macro_rules! define_digit_select {
    ($fname:ident : $ty:ty => { $($ch:literal),+ $(,)? }) => {
        #[allow(trivial_numeric_casts, clippy::cast_lossless, clippy::char_lit_as_u8, clippy::cast_possible_wrap)]
        const fn $fname<'src, I, E>() -> impl Parser<'src, I, $ty, E> + Copy
        where
            I: Input<'src, Token = char, Span = SimpleSpan>,
            E: ParserExtra<'src, I>,
        {
            select! {
                $(
                    $ch => (($ch as u8 - b'0') as $ty),
                )+
            }
        }
    };
}

define_digit_select!(u8_0_1 : u8 => { '0', '1' });
define_digit_select!(u8_0_3 : u8 => { '0', '1', '2', '3' });
define_digit_select!(u8_0_5 : u8 => { '0', '1', '2', '3', '4', '5' });
define_digit_select!(u8_0_9 : u8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i8_0_1 : i8 => { '0', '1' });
define_digit_select!(i8_0_2 : i8 => { '0', '1', '2' });
define_digit_select!(i8_0_9 : i8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i8_1_2 : i8 => { '1', '2' });
define_digit_select!(i8_1_9 : i8 => { '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i16_0_9 : i16 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
