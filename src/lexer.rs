// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lexer for vCard/vCalendar content lines.

use std::fmt::{self, Display};

use logos::Logos;

use crate::span::Span;

/// Tokenize a content line into a sequence of [`SpannedToken`]s.
///
/// Folding sequences (newline followed by space or tab) are skipped at the
/// regex level, so a folded physical representation of one logical line can
/// be fed directly.
#[must_use]
pub fn tokenize(src: &str) -> impl Iterator<Item = SpannedToken<'_>> {
    Token::lexer(src).spanned().map(|(tok, span)| match tok {
        Ok(tok) => SpannedToken(tok, Span::new(span.start, span.end)),
        Err(()) => SpannedToken(Token::Error, Span::new(span.start, span.end)),
    })
}

/// Token emitted by the content-line lexer.
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
#[logos(skip r#"\r?\n[ \t]"#)] // skip folding
pub enum Token<'a> {
    /// Double quote (`"`), delimits case-sensitive argument values.
    #[token(r#"""#)]
    DQuote,

    /// Comma (`,`), separates argument values.
    #[token(",")]
    Comma,

    /// Colon (`:`), separates the prefix part from the value.
    #[token(":")]
    Colon,

    /// Semicolon (`;`), separates argument tokens.
    #[token(";")]
    Semicolon,

    /// Equal sign (`=`), separates an argument key from its values.
    #[token("=")]
    Equal,

    /// Dot (`.`), separates the property group from the property name.
    #[token(".")]
    Dot,

    /// Backslash followed by any character: an escaped pair. The slice keeps
    /// the backslash, so raw values can be reassembled verbatim.
    #[regex(r#"\\[^\r\n]"#)]
    Escaped(&'a str),

    /// ASCII symbols: runs of printable ASCII outside the classes above.
    #[regex(r#"[\t !#$%&'()*+/<>?@\[\]\^`\{|\}~]+"#)]
    Symbol(&'a str),

    /// Line break (`\r\n` or bare `\n`) not followed by folding whitespace.
    #[token("\r\n")]
    #[token("\n")]
    Newline,

    /// ASCII word characters: 0-9, A-Z, a-z, underscore, hyphen.
    #[regex("[0-9A-Za-z_-]+")]
    Word(&'a str),

    /// Non-ASCII text runs (UTF8-2 / UTF8-3 / UTF8-4 per RFC 3629).
    #[regex(r#"[^\x00-\x7F]+"#)]
    UnicodeText(&'a str),

    /// Error token for input the lexer cannot classify.
    Error,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DQuote => write!(f, "DQuote"),
            Self::Comma => write!(f, "Comma"),
            Self::Colon => write!(f, "Colon"),
            Self::Semicolon => write!(f, "Semicolon"),
            Self::Equal => write!(f, "Equal"),
            Self::Dot => write!(f, "Dot"),
            Self::Escaped(s) => write!(f, "Escaped({s})"),
            Self::Symbol(s) => write!(f, "Symbol({s})"),
            Self::Newline => write!(f, "Newline"),
            Self::Word(s) => write!(f, "Word({s})"),
            Self::UnicodeText(s) => write!(f, "UnicodeText({s})"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'src>(pub Token<'src>, pub Span);

impl Display for SpannedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::Token::*;
    use super::*;

    fn lex(src: &str) -> Vec<Token<'_>> {
        tokenize(src).map(|SpannedToken(tok, _)| tok).collect()
    }

    #[test]
    fn lexes_simple_property_line() {
        assert_eq!(
            lex("TEL;TYPE=home:+1-555-0100"),
            vec![
                Word("TEL"),
                Semicolon,
                Word("TYPE"),
                Equal,
                Word("home"),
                Colon,
                Symbol("+"),
                Word("1-555-0100"),
            ]
        );
    }

    #[test]
    fn lexes_group_dot() {
        assert_eq!(
            lex("item1.X-FOO:bar"),
            vec![Word("item1"), Dot, Word("X-FOO"), Colon, Word("bar")]
        );
    }

    #[test]
    fn skips_folding_sequences() {
        assert_eq!(
            lex("SUMMARY:foo\r\n bar"),
            vec![Word("SUMMARY"), Colon, Word("foo"), Word("bar")]
        );
        assert_eq!(
            lex("SUMMARY:foo\n\tbar"),
            vec![Word("SUMMARY"), Colon, Word("foo"), Word("bar")]
        );
    }

    #[test]
    fn newline_without_whitespace_is_a_token() {
        assert_eq!(
            lex("A:b\r\nC:d"),
            vec![Word("A"), Colon, Word("b"), Newline, Word("C"), Colon, Word("d")]
        );
    }

    #[test]
    fn escaped_pairs_keep_the_backslash() {
        assert_eq!(
            lex(r"NOTE:a\,b\;c"),
            vec![
                Word("NOTE"),
                Colon,
                Word("a"),
                Escaped(r"\,"),
                Word("b"),
                Escaped(r"\;"),
                Word("c"),
            ]
        );
        assert_eq!(lex(r"N:\:"), vec![Word("N"), Colon, Escaped(r"\:")]);
    }

    #[test]
    fn lexes_quotes_and_commas() {
        assert_eq!(
            lex(r#"ADR;LABEL="1, Main St":x"#),
            vec![
                Word("ADR"),
                Semicolon,
                Word("LABEL"),
                Equal,
                DQuote,
                Word("1"),
                Comma,
                Symbol(" "),
                Word("Main"),
                Symbol(" "),
                Word("St"),
                DQuote,
                Colon,
                Word("x"),
            ]
        );
    }

    #[test]
    fn lexes_unicode_runs() {
        assert_eq!(
            lex("FN:José"),
            vec![Word("FN"), Colon, Word("Jos"), UnicodeText("é")]
        );
    }

    #[test]
    fn spans_cover_the_source() {
        let spans: Vec<Span> = tokenize("A.B:c").map(|SpannedToken(_, s)| s).collect();
        assert_eq!(
            spans,
            vec![
                Span::new(0, 1),
                Span::new(1, 2),
                Span::new(2, 3),
                Span::new(3, 4),
                Span::new(4, 5),
            ]
        );
    }

    #[test]
    fn lone_trailing_backslash_is_an_error_token() {
        assert_eq!(lex("N:a\\"), vec![Word("N"), Colon, Word("a"), Error]);
    }
}
