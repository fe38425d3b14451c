// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value types and grammars shared by the recurrence-rule parsers.

mod datetime;

pub use datetime::{ClockValue, DateTimeValue, DateValue, TimeValue};

pub(crate) use datetime::{parse_date_time, parse_timestamp};

use std::borrow::Cow;

use chumsky::error::RichPattern;

/// Labels attached to value-grammar parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueExpected {
    /// A calendar date that exists (relevant with the `jiff` feature).
    Date,
}

impl<'a> From<ValueExpected> for RichPattern<'a, char> {
    fn from(expected: ValueExpected) -> Self {
        RichPattern::Label(Cow::Borrowed(match expected {
            ValueExpected::Date => "date",
        }))
    }
}
