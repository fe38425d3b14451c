// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content-line tokenizer: property prefix, group, arguments and raw value.
//!
//! A content line has the shape
//! `[group "."] name *(";" argument) ":" value` where each argument is
//! `[key "="] value *("," value)`. The tokenizer splits exactly that far:
//! interpreting the value against the property's type, unescaping text and
//! fixed-arity checks all belong to the field-dispatch layer built on top.

use std::mem;

use crate::error::ParseError;
use crate::keyword::KW_XNAME_SENTINEL;
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::span::Span;

/// One parsed property line.
///
/// Constructed by [`tokenize_line`], read by the per-field dispatch layer,
/// and discarded once the field object is built. Not mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Dot-delimited property group, e.g. `item1` in `item1.TEL:...`;
    /// nested groups keep their inner dots (`a.b.TEL` has group `a.b`).
    /// `None` when the line has no group.
    pub group: Option<String>,

    /// Uppercased property name used for dispatch. Nonstandard (`X-`
    /// prefixed) names collapse to the sentinel [`KW_XNAME_SENTINEL`]; the
    /// literal name stays available in [`name`](Self::name).
    pub prefix: String,

    /// The literal property name, uppercased, e.g. `TEL` or `X-FOO`.
    pub name: String,

    /// Arguments in insertion order; may be empty.
    pub arguments: Vec<ArgumentInfo>,

    /// Raw value portion after the first unescaped `:`, trimmed. Escape
    /// sequences are kept verbatim for the field layer to interpret.
    pub value: String,
}

impl PropertyInfo {
    /// Whether the property carries a nonstandard (`X-` prefixed) name.
    #[must_use]
    pub fn is_nonstandard(&self) -> bool {
        self.prefix == KW_XNAME_SENTINEL
    }

    /// The nonstandard name with the `X-` sentinel stripped, e.g. `FOO` for
    /// an `X-FOO` property. `None` for standard properties.
    #[must_use]
    pub fn nonstandard_name(&self) -> Option<&str> {
        self.is_nonstandard()
            .then(|| self.name.strip_prefix(KW_XNAME_SENTINEL))
            .flatten()
    }
}

/// One `KEY=value1,value2,...` or bare-value argument token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentInfo {
    /// Argument key, trimmed, as written. Empty for bare values such as the
    /// type shorthands vCard 2.1 allows (`TEL;HOME:...`).
    pub key: String,

    /// The comma-separated values; never empty.
    pub values: Vec<ArgumentValue>,
}

impl ArgumentInfo {
    /// Whether ANY stored value matches `target`, each compared under its
    /// own case-sensitivity flag. This is a per-value OR match, not a set
    /// equality.
    #[must_use]
    pub fn match_value(&self, target: &str) -> bool {
        self.values.iter().any(|value| value.matches(target))
    }
}

/// A single argument value with its case-sensitivity flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentValue {
    /// True when the value was double-quoted in the source. Quoted values
    /// are opaque, case-sensitive strings.
    pub case_sensitive: bool,

    /// The value text, quotes stripped for quoted values, trimmed for
    /// unquoted ones.
    pub text: String,
}

impl ArgumentValue {
    /// Compare with `target` under this value's own case rule.
    #[must_use]
    pub fn matches(&self, target: &str) -> bool {
        if self.case_sensitive {
            self.text == target
        } else {
            self.text.eq_ignore_ascii_case(target)
        }
    }
}

/// Split one content line into a [`PropertyInfo`].
///
/// The line is expected to be one logical line; folded physical lines are
/// accepted because the lexer skips fold sequences. The only hard failure
/// at this layer is a line without an unescaped `:` delimiter.
///
/// ## Errors
///
/// [`ParseError::MissingDelimiter`] when no unescaped `:` exists outside
/// double quotes.
///
/// ## Examples
///
/// ```
/// use versit::tokenize_line;
///
/// let prop = tokenize_line("item1.TEL;TYPE=home:+1-555-0100").unwrap();
/// assert_eq!(prop.group.as_deref(), Some("item1"));
/// assert_eq!(prop.prefix, "TEL");
/// assert!(prop.arguments[0].match_value("HOME"));
/// assert_eq!(prop.value, "+1-555-0100");
/// ```
#[expect(clippy::indexing_slicing)] // indices come from enumerate over the same vec
pub fn tokenize_line(line: &str) -> Result<PropertyInfo, ParseError> {
    tracing::trace!(len = line.len(), "tokenizing content line");
    let tokens: Vec<SpannedToken<'_>> = tokenize(line).collect();

    // The first unescaped ':' outside double quotes splits prefix from value.
    // Escaped pairs are single tokens, so they can never register here.
    let mut in_quotes = false;
    let mut colon = None;
    let mut line_end = line.len();
    for (idx, SpannedToken(token, span)) in tokens.iter().enumerate() {
        match token {
            Token::DQuote => in_quotes = !in_quotes,
            Token::Colon if !in_quotes => {
                colon = Some(idx);
                break;
            }
            Token::Newline => {
                line_end = span.start;
                break;
            }
            _ => {}
        }
    }
    let Some(colon) = colon else {
        return Err(ParseError::MissingDelimiter {
            delimiter: ':',
            span: Span::new(line_end, line_end),
        });
    };

    // First top-level ';' inside the prefix part starts the argument list.
    let mut in_quotes = false;
    let mut semicolon = None;
    for (idx, SpannedToken(token, _)) in tokens[..colon].iter().enumerate() {
        match token {
            Token::DQuote => in_quotes = !in_quotes,
            Token::Semicolon if !in_quotes => {
                semicolon = Some(idx);
                break;
            }
            _ => {}
        }
    }

    // Group and name split at the LAST dot of the name part.
    let name_end = semicolon.unwrap_or(colon);
    let mut raw_name = String::new();
    let mut last_dot = None;
    for SpannedToken(token, span) in &tokens[..name_end] {
        if matches!(token, Token::Dot) {
            last_dot = Some(raw_name.len());
        }
        raw_name.push_str(&line[span.range()]);
    }
    let (group, local) = match last_dot {
        Some(dot) => (
            Some(raw_name[..dot].trim().to_string()),
            &raw_name[dot + 1..],
        ),
        None => (None, raw_name.as_str()),
    };
    let name = local.trim().to_ascii_uppercase();
    let prefix = if name.starts_with(KW_XNAME_SENTINEL) {
        KW_XNAME_SENTINEL.to_string()
    } else {
        name.clone()
    };

    // Each top-level ';'-delimited run becomes one argument; empty runs
    // (";;", trailing ";") are skipped.
    let mut arguments = Vec::new();
    if let Some(semicolon) = semicolon {
        let mut run: Vec<SpannedToken<'_>> = Vec::new();
        let mut in_quotes = false;
        for &spanned in &tokens[semicolon + 1..colon] {
            match spanned.0 {
                Token::Semicolon if !in_quotes => {
                    if let Some(argument) = argument_from_tokens(&mem::take(&mut run), line) {
                        arguments.push(argument);
                    }
                }
                Token::DQuote => {
                    in_quotes = !in_quotes;
                    run.push(spanned);
                }
                _ => run.push(spanned),
            }
        }
        if let Some(argument) = argument_from_tokens(&run, line) {
            arguments.push(argument);
        }
    }

    // Everything after the ':' up to the end of the logical line, trimmed.
    let mut value = String::new();
    for SpannedToken(token, span) in &tokens[colon + 1..] {
        if matches!(token, Token::Newline) {
            break;
        }
        value.push_str(&line[span.range()]);
    }
    let value = value.trim().to_string();

    Ok(PropertyInfo {
        group,
        prefix,
        name,
        arguments,
        value,
    })
}

/// Parse one argument token into an [`ArgumentInfo`].
///
/// This layer is lenient: malformed quoting means "not a quoted value", not
/// an error, so the function is infallible.
///
/// ## Examples
///
/// ```
/// use versit::parse_argument_token;
///
/// let arg = parse_argument_token("TYPE=\"Home\"");
/// assert_eq!(arg.key, "TYPE");
/// assert!(arg.values[0].case_sensitive);
/// assert!(!arg.match_value("home"));
/// assert!(arg.match_value("Home"));
/// ```
#[must_use]
pub fn parse_argument_token(token: &str) -> ArgumentInfo {
    let tokens: Vec<SpannedToken<'_>> = tokenize(token).collect();
    argument_from_tokens(&tokens, token).unwrap_or_else(|| ArgumentInfo {
        key: String::new(),
        values: vec![ArgumentValue {
            case_sensitive: false,
            text: String::new(),
        }],
    })
}

/// Build an argument from a token run, or `None` when the run is blank.
fn argument_from_tokens(tokens: &[SpannedToken<'_>], src: &str) -> Option<ArgumentInfo> {
    if text_of(tokens, src).trim().is_empty() {
        return None;
    }

    // Split on the FIRST top-level '=': left is the key, right the values.
    // Removing exactly the tokens before '=' removes the "key=" prefix
    // exactly once, never by substring search, so a value that repeats the
    // key text survives intact.
    let mut in_quotes = false;
    let mut equal = None;
    for (idx, SpannedToken(token, _)) in tokens.iter().enumerate() {
        match token {
            Token::DQuote => in_quotes = !in_quotes,
            Token::Equal if !in_quotes => {
                equal = Some(idx);
                break;
            }
            _ => {}
        }
    }

    let (key, value_tokens) = match equal {
        Some(equal) => {
            let (key_tokens, rest) = tokens.split_at(equal);
            (
                text_of(key_tokens, src).trim().to_string(),
                rest.get(1..).unwrap_or_default(),
            )
        }
        None => (String::new(), tokens),
    };

    // Quote-aware comma split of the value side.
    let mut values = Vec::new();
    let mut piece: Vec<SpannedToken<'_>> = Vec::new();
    let mut in_quotes = false;
    for &spanned in value_tokens {
        match spanned.0 {
            Token::Comma if !in_quotes => {
                values.push(argument_value(&mem::take(&mut piece), src));
            }
            Token::DQuote => {
                in_quotes = !in_quotes;
                piece.push(spanned);
            }
            _ => piece.push(spanned),
        }
    }
    values.push(argument_value(&piece, src));

    Some(ArgumentInfo { key, values })
}

/// Classify one comma-separated piece as quoted (case-sensitive, quotes
/// stripped) or plain (case-insensitive, trimmed).
fn argument_value(tokens: &[SpannedToken<'_>], src: &str) -> ArgumentValue {
    let quoted = tokens.len() >= 2
        && matches!(tokens.first(), Some(SpannedToken(Token::DQuote, _)))
        && matches!(tokens.last(), Some(SpannedToken(Token::DQuote, _)));
    if quoted {
        let inner = tokens.get(1..tokens.len() - 1).unwrap_or_default();
        ArgumentValue {
            case_sensitive: true,
            text: text_of(inner, src),
        }
    } else {
        ArgumentValue {
            case_sensitive: false,
            text: text_of(tokens, src).trim().to_string(),
        }
    }
}

/// Reassemble the source text a token run covers. Fold bytes vanish because
/// they are never part of a token span.
fn text_of(tokens: &[SpannedToken<'_>], src: &str) -> String {
    tokens
        .iter()
        .filter(|SpannedToken(token, _)| !matches!(token, Token::Newline))
        .map(|SpannedToken(_, span)| src.get(span.range()).unwrap_or_default())
        .collect()
}
