// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Write path: content lines and recurrence rules back to wire text.
//!
//! [`Formatter`] wraps any [`fmt::Write`] and folds long lines as text goes
//! out, so property writers never track line width themselves. The fold
//! never lands inside a UTF-8 sequence or between a backslash and the
//! character it escapes.
//!
//! # Example
//!
//! ```
//! use versit::{FormatOptions, Formatter, tokenize_line};
//!
//! let prop = tokenize_line("item1.TEL;TYPE=home:+1-555-0100")?;
//! let mut out = String::new();
//! Formatter::new(&mut out, FormatOptions::default()).write_property(&prop)?;
//! assert_eq!(out, "item1.TEL;TYPE=home:+1-555-0100\r\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::{self, Write};

use crate::rrule::{RecurrenceRule, RecurrenceRuleV1, RecurrenceRuleV2};
use crate::syntax::{ArgumentInfo, PropertyInfo};

/// Format a property line to a `String` with default options.
///
/// ## Errors
///
/// Only when a `Display` implementation fails; the crate's own value types
/// never do.
pub fn format_property(property: &PropertyInfo) -> Result<String, fmt::Error> {
    let mut out = String::new();
    Formatter::new(&mut out, FormatOptions::default()).write_property(property)?;
    Ok(out)
}

/// Formatting options for the write path.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)`, the RFC limit.
    pub folding: Option<usize>,

    /// Line folding style.
    ///
    /// Default: [`FoldingStyle::Space`] (CRLF + SPACE).
    pub folding_style: FoldingStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            folding: Some(75),
            folding_style: FoldingStyle::default(),
        }
    }
}

impl FormatOptions {
    /// Set the line folding option.
    #[must_use]
    pub const fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }

    /// Set the line folding style.
    #[must_use]
    pub const fn folding_style(mut self, style: FoldingStyle) -> Self {
        self.folding_style = style;
        self
    }
}

/// Line folding style.
///
/// A folded line continues after CRLF plus one whitespace character; the
/// continuation character counts toward the next line's width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldingStyle {
    /// CRLF + SPACE (the RFC default).
    #[default]
    Space,
    /// CRLF + TAB.
    Tab,
}

impl FoldingStyle {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Space => "\r\n ",
            Self::Tab => "\r\n\t",
        }
    }

    // Both SPACE and TAB are one byte.
    const fn continuation_len() -> usize {
        1
    }
}

/// Folding writer for content lines and rule values.
///
/// Everything written through the `fmt::Write` impl participates in line
/// folding; [`write_property`](Self::write_property) ends the line.
#[derive(Debug)]
pub struct Formatter<W: Write> {
    writer: W,
    options: FormatOptions,
    /// Width of the current line so far, in bytes.
    line_length: usize,
}

impl<W: Write> Formatter<W> {
    /// Create a formatter writing to `writer`.
    #[must_use]
    pub const fn new(writer: W, options: FormatOptions) -> Self {
        Self {
            writer,
            options,
            line_length: 0,
        }
    }

    /// Get a mutable reference to the underlying writer.
    #[must_use]
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Get a reference to the underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume this formatter, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write one property as a complete, CRLF-terminated content line.
    ///
    /// The literal [`name`](PropertyInfo::name) is written, prefixed by the
    /// group when present; argument values are double-quoted when they are
    /// case-sensitive or contain a delimiter the tokenizer would otherwise
    /// split on.
    ///
    /// ## Errors
    ///
    /// Only when the underlying writer fails.
    pub fn write_property(&mut self, property: &PropertyInfo) -> fmt::Result {
        if let Some(group) = &property.group {
            write!(self, "{group}.")?;
        }
        write!(self, "{}", property.name)?;
        for argument in &property.arguments {
            self.write_argument(argument)?;
        }
        write!(self, ":{}", property.value)?;
        self.writeln()
    }

    /// Write a rule from either grammar as a property value.
    ///
    /// ## Errors
    ///
    /// Fails when the rule's frequency has no written form in its own
    /// grammar, or when the underlying writer fails.
    pub fn write_rule(&mut self, rule: &RecurrenceRule) -> fmt::Result {
        write!(self, "{rule}")
    }

    /// Write a vCalendar 1.0 rule in canonical token order.
    ///
    /// ## Errors
    ///
    /// Fails when the frequency has no v1 marker form, or when the
    /// underlying writer fails.
    pub fn write_rule_v1(&mut self, rule: &RecurrenceRuleV1) -> fmt::Result {
        write!(self, "{rule}")
    }

    /// Write a vCalendar 2.0 rule in canonical part order.
    ///
    /// ## Errors
    ///
    /// Fails when the frequency has no `FREQ` keyword form, or when the
    /// underlying writer fails.
    pub fn write_rule_v2(&mut self, rule: &RecurrenceRuleV2) -> fmt::Result {
        write!(self, "{rule}")
    }

    fn write_argument(&mut self, argument: &ArgumentInfo) -> fmt::Result {
        self.write_str(";")?;
        if !argument.key.is_empty() {
            write!(self, "{}=", argument.key)?;
        }
        for (i, value) in argument.values.iter().enumerate() {
            if i > 0 {
                self.write_str(",")?;
            }
            if value.case_sensitive || value.text.contains([',', ';', ':']) {
                write!(self, "\"{}\"", value.text)?;
            } else {
                write!(self, "{}", value.text)?;
            }
        }
        Ok(())
    }

    /// End the current line with a CRLF, bypassing the folding counter.
    fn writeln(&mut self) -> fmt::Result {
        self.writer.write_str("\r\n")?;
        self.line_length = 0;
        Ok(())
    }

    fn insert_fold(&mut self) -> fmt::Result {
        self.writer.write_str(self.options.folding_style.as_str())?;
        self.line_length = FoldingStyle::continuation_len();
        Ok(())
    }
}

impl<W: Write> fmt::Write for Formatter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let Some(max_len) = self.options.folding else {
            return self.writer.write_str(s);
        };

        let mut remaining = s;
        while !remaining.is_empty() {
            let available = max_len.saturating_sub(self.line_length);
            let mut at = fold_point(remaining, available);
            if at == 0 {
                self.insert_fold()?;
                at = fold_point(remaining, max_len.saturating_sub(self.line_length));
                if at == 0 {
                    // A single character wider than the whole width; write
                    // it unsplit rather than loop forever.
                    at = remaining
                        .chars()
                        .next()
                        .map_or(remaining.len(), char::len_utf8);
                }
            }
            let (chunk, rest) = remaining.split_at(at);
            self.writer.write_str(chunk)?;
            self.line_length += chunk.len();
            remaining = rest;
        }
        Ok(())
    }
}

/// Largest byte offset at most `max` where `s` may split: always a char
/// boundary and never between a backslash and the character it escapes,
/// because the lexer reads the pair as one token.
fn fold_point(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut at = max;
    while at > 0 && !s.is_char_boundary(at) {
        at -= 1;
    }
    while at > 0 && trailing_backslashes(s, at) % 2 == 1 {
        at -= 1;
    }
    at
}

/// Number of consecutive `\` bytes directly before byte offset `end`.
fn trailing_backslashes(s: &str, end: usize) -> usize {
    s.bytes()
        .take(end)
        .rev()
        .take_while(|&byte| byte == b'\\')
        .count()
}
