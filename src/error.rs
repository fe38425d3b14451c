// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse errors raised by the tokenizer and the recurrence-rule grammars.

use thiserror::Error;

use crate::span::Span;

/// Error raised while parsing a content line or a recurrence rule.
///
/// Every parse failure is terminal for that call: nothing is retried and no
/// partially built value escapes. Variants that point at a slice of the
/// input carry a [`Span`], so malformed third-party exports can be debugged
/// against the original text.
///
/// ## Examples
///
/// Rendering a diagnostic with `ariadne`:
///
/// ```
/// use ariadne::{Color, Label, Report, ReportKind, Source};
/// use versit::parse_rule_v2;
///
/// let src = "FREQ=DAILY;BYSECOND=61";
/// let err = parse_rule_v2(src).unwrap_err();
/// let span = err.span().expect("range errors carry a span");
/// Report::build(ReportKind::Error, span.range())
///     .with_config(ariadne::Config::new().with_index_type(ariadne::IndexType::Byte))
///     .with_message(err.to_string())
///     .with_label(Label::new(span.range()).with_color(Color::Red))
///     .finish()
///     .eprint(Source::from(src))
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A property line lacks an unescaped `:`, or a v2 rule part lacks `=`.
    #[error("missing unescaped '{delimiter}' delimiter")]
    MissingDelimiter {
        /// The delimiter that was expected.
        delimiter: char,
        /// Where the delimiter was expected.
        span: Span,
    },

    /// A v2 rule key is not in the fixed key set, or a v1 token's
    /// frequency-marker prefix is unrecognized.
    #[error("'{key}' is not a valid {what}")]
    UnrecognizedKey {
        /// The offending key or marker token, as written.
        key: String,
        /// What the token was expected to be.
        what: &'static str,
        /// Location of the offending token.
        span: Span,
    },

    /// A v2 rule key appears more than once.
    #[error("key '{key}' already exists")]
    DuplicateKey {
        /// The repeated key.
        key: &'static str,
        /// Location of the second occurrence.
        span: Span,
    },

    /// Both `UNTIL` and `COUNT` appear in one v2 rule.
    #[error("keys '{first}' and '{second}' are mutually exclusive")]
    MutuallyExclusiveKeys {
        /// The key seen first.
        first: &'static str,
        /// The key that completed the exclusive pair.
        second: &'static str,
        /// Location of the second key.
        span: Span,
    },

    /// A v2 rule lacks a required key (`FREQ`).
    #[error("required key '{key}' is missing")]
    MissingRequiredKey {
        /// The missing key.
        key: &'static str,
    },

    /// A numeric sub-token is outside its documented inclusive range.
    #[error("'{token}' is out of range for {what}, expected {min} to {max}")]
    OutOfRange {
        /// The offending token, as written.
        token: String,
        /// The category being validated, e.g. `a second of the minute`.
        what: &'static str,
        /// Lower inclusive bound.
        min: i32,
        /// Upper inclusive bound.
        max: i32,
        /// Location of the offending token.
        span: Span,
    },

    /// A token does not match the shape the grammar requires at this point:
    /// non-numeric where digits were expected, a sign with no digit, a bad
    /// weekday code, or a date/time token that fails date parsing.
    #[error("expected {expected}, found '{token}'")]
    MalformedToken {
        /// The offending token, as written.
        token: String,
        /// The shape that was expected.
        expected: &'static str,
        /// Location of the offending token.
        span: Span,
    },

    /// A value-to-field arity mismatch in fixed-arity fields. Never raised
    /// by this crate itself; part of the taxonomy inherited by the
    /// field-dispatch layer built on top of it.
    #[error("expected {expected} values, found {found}")]
    ArgumentCountMismatch {
        /// Number of values the field requires.
        expected: usize,
        /// Number of values actually present.
        found: usize,
    },
}

impl ParseError {
    /// Byte span of the offending input slice, when the error points at one.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::MissingDelimiter { span, .. }
            | Self::UnrecognizedKey { span, .. }
            | Self::DuplicateKey { span, .. }
            | Self::MutuallyExclusiveKeys { span, .. }
            | Self::OutOfRange { span, .. }
            | Self::MalformedToken { span, .. } => Some(*span),
            Self::MissingRequiredKey { .. } | Self::ArgumentCountMismatch { .. } => None,
        }
    }
}
