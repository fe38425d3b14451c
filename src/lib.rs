// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsing and serialization core for vCard and vCalendar documents.
//!
//! Content lines are split into properties by [`tokenize_line`], recurrence
//! rules in both grammar generations are parsed by [`parse_rule`], and
//! [`Formatter`] writes properties and rules back out with line folding.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod error;
pub mod formatter;
pub mod keyword;
pub mod lexer;
pub mod rrule;
pub mod span;
pub mod syntax;
pub mod value;

pub use crate::error::ParseError;
pub use crate::formatter::{FoldingStyle, FormatOptions, Formatter, format_property};
pub use crate::lexer::{SpannedToken, Token, tokenize};
pub use crate::rrule::{
    DEFAULT_DURATION, Frequency, Marked, MonthDay, MonthlyOccurrence, OrdinalWeekday,
    RecurrenceRule, RecurrenceRuleV1, RecurrenceRuleV2, RuleVersion, SignedValue, Weekday,
    parse_rule, parse_rule_v1, parse_rule_v2,
};
pub use crate::span::Span;
pub use crate::syntax::{
    ArgumentInfo, ArgumentValue, PropertyInfo, parse_argument_token, tokenize_line,
};
pub use crate::value::{ClockValue, DateTimeValue, DateValue, TimeValue};
