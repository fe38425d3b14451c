// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the content-line tokenizer
//!
//! These tests exercise the tokenizer on realistic vCard and vCalendar
//! content lines, including the vCard 2.1 shorthand forms.

use versit::{ParseError, PropertyInfo, Span, parse_argument_token, tokenize_line};

/// Test helper asserting a line tokenizes and returning the property.
fn line(src: &str) -> PropertyInfo {
    tokenize_line(src).unwrap_or_else(|err| panic!("{src:?} failed to tokenize: {err}"))
}

#[test]
fn tokenizes_plain_vcard_properties() {
    let prop = line("FN:Erika Mustermann");
    assert_eq!(prop.group, None);
    assert_eq!(prop.prefix, "FN");
    assert_eq!(prop.name, "FN");
    assert!(prop.arguments.is_empty());
    assert_eq!(prop.value, "Erika Mustermann");
}

#[test]
fn keeps_structured_values_raw() {
    // Unescaping ';'-structured values belongs to the field layer, so the
    // value comes back exactly as written.
    let prop = line("N:Mustermann;Erika;;Dr.;");
    assert_eq!(prop.value, "Mustermann;Erika;;Dr.;");

    let prop = line("ADR;TYPE=home:;;Heidestraße 17;Koeln;;51147;Germany");
    assert_eq!(prop.value, ";;Heidestraße 17;Koeln;;51147;Germany");
}

#[test]
fn splits_group_name_and_arguments() {
    let prop = line("item1.TEL;TYPE=home,voice;PREF=1:+1-555-0100");
    assert_eq!(prop.group.as_deref(), Some("item1"));
    assert_eq!(prop.name, "TEL");
    assert_eq!(prop.arguments.len(), 2);

    let types = &prop.arguments[0];
    assert_eq!(types.key, "TYPE");
    assert_eq!(types.values.len(), 2);
    assert!(types.match_value("HOME"));
    assert!(types.match_value("voice"));
    assert!(!types.match_value("work"));

    let pref = &prop.arguments[1];
    assert_eq!(pref.key, "PREF");
    assert!(pref.match_value("1"));

    assert_eq!(prop.value, "+1-555-0100");
}

#[test]
fn nested_groups_keep_inner_dots() {
    let prop = line("a.b.TEL:123");
    assert_eq!(prop.group.as_deref(), Some("a.b"));
    assert_eq!(prop.name, "TEL");
}

#[test]
fn accepts_vcard21_bare_type_arguments() {
    let prop = line("TEL;HOME;VOICE:+49 221 9999123");
    assert_eq!(prop.arguments.len(), 2);
    assert_eq!(prop.arguments[0].key, "");
    assert!(prop.arguments[0].match_value("home"));
    assert_eq!(prop.arguments[1].key, "");
    assert!(prop.arguments[1].match_value("VOICE"));
}

#[test]
fn lowercase_names_dispatch_uppercased() {
    let prop = line("tel;type=home:123");
    assert_eq!(prop.prefix, "TEL");
    assert_eq!(prop.name, "TEL");
    // Argument keys keep their written case; matching is per value.
    assert_eq!(prop.arguments[0].key, "type");
}

#[test]
fn collapses_nonstandard_names_to_the_sentinel() {
    let prop = line("X-ABLabel:Mobile");
    assert_eq!(prop.prefix, "X-");
    assert_eq!(prop.name, "X-ABLABEL");
    assert!(prop.is_nonstandard());
    assert_eq!(prop.nonstandard_name(), Some("ABLABEL"));

    let prop = line("TEL:123");
    assert!(!prop.is_nonstandard());
    assert_eq!(prop.nonstandard_name(), None);
}

#[test]
fn quoted_argument_values_are_case_sensitive_and_opaque() {
    let prop = line(r#"ADR;LABEL="42 Plantation St.\nBaytown, LA":;;42 Plantation St."#);
    let label = &prop.arguments[0];
    assert_eq!(label.key, "LABEL");
    assert_eq!(label.values.len(), 1);
    assert!(label.values[0].case_sensitive);
    assert_eq!(label.values[0].text, r"42 Plantation St.\nBaytown, LA");
    assert!(label.match_value(r"42 Plantation St.\nBaytown, LA"));
    assert!(!label.match_value(r"42 PLANTATION ST.\nBAYTOWN, LA"));
}

#[test]
fn first_colon_outside_quotes_starts_the_value() {
    // The URI scheme colon must not terminate the prefix early.
    let prop = line(r#"DESCRIPTION;ALTREP="cid:part1@example.org":The meeting agenda"#);
    assert_eq!(prop.name, "DESCRIPTION");
    assert!(prop.arguments[0].match_value("cid:part1@example.org"));
    assert_eq!(prop.value, "The meeting agenda");

    let prop = line("URL:https://example.com/page");
    assert_eq!(prop.value, "https://example.com/page");
}

#[test]
fn escaped_colons_do_not_split_the_line() {
    let prop = line(r"X-TIME:09\:30");
    assert_eq!(prop.name, "X-TIME");
    assert_eq!(prop.value, r"09\:30");
}

#[test]
fn accepts_folded_physical_lines() {
    let folded = "NOTE:This is a long description\r\n  that exists on a long line.";
    let prop = line(folded);
    // The fold eats CRLF plus one whitespace; the second space survives.
    assert_eq!(prop.value, "This is a long description that exists on a long line.");

    let tab_folded = "NOTE:first\r\n\tsecond";
    assert_eq!(line(tab_folded).value, "firstsecond");
}

#[test]
fn value_keeps_escapes_and_internal_whitespace() {
    let prop = line(r"NOTE:  a\, b; c  ");
    assert_eq!(prop.value, r"a\, b; c");
}

#[test]
fn empty_values_are_allowed() {
    assert_eq!(line("X-EMPTY:").value, "");
    assert_eq!(line("ADR;TYPE=home:").value, "");
}

#[test]
fn rejects_lines_without_a_colon() {
    let err = tokenize_line("BEGIN").unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingDelimiter {
            delimiter: ':',
            span: Span::new(5, 5),
        }
    );

    // A colon hidden inside quotes does not count.
    let err = tokenize_line(r#"X-FOO;BAR="a:b""#).unwrap_err();
    assert!(matches!(err, ParseError::MissingDelimiter { delimiter: ':', .. }));
}

#[test]
fn parses_standalone_argument_tokens() {
    let arg = parse_argument_token("TYPE=work,voice");
    assert_eq!(arg.key, "TYPE");
    assert_eq!(arg.values.len(), 2);
    assert!(arg.match_value("WORK"));

    let arg = parse_argument_token(r#"TZID="America/New_York""#);
    assert_eq!(arg.key, "TZID");
    assert!(arg.values[0].case_sensitive);
    assert!(arg.match_value("America/New_York"));

    let arg = parse_argument_token("HOME");
    assert_eq!(arg.key, "");
    assert!(arg.match_value("home"));
}

#[test]
fn mixed_quoted_and_bare_values_keep_their_own_case_rules() {
    let arg = parse_argument_token(r#"TYPE="Work",home"#);
    assert_eq!(arg.values.len(), 2);
    assert!(arg.values[0].case_sensitive);
    assert!(!arg.values[1].case_sensitive);
    assert!(arg.match_value("Work"));
    assert!(!arg.match_value("work"));
    assert!(arg.match_value("HOME"));
}
