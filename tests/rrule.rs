// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the recurrence-rule parsers
//!
//! These tests run published example rules from both grammar generations
//! through the public API and check the cross-version rule view.

use versit::{
    DEFAULT_DURATION, Frequency, ParseError, RuleVersion, Span, Weekday, parse_rule,
    parse_rule_v1, parse_rule_v2,
};

#[test]
fn parses_published_v2_rules() {
    // (rule, frequency, interval, duration)
    #[rustfmt::skip]
    let cases = [
        ("FREQ=DAILY;COUNT=10",                                Frequency::Daily,   1, 10),
        ("FREQ=DAILY;UNTIL=19971224T000000Z",                  Frequency::Daily,   1, DEFAULT_DURATION),
        ("FREQ=WEEKLY;INTERVAL=2;WKST=SU",                     Frequency::Weekly,  2, DEFAULT_DURATION),
        ("FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13",                Frequency::Monthly, 1, DEFAULT_DURATION),
        ("FREQ=MONTHLY;INTERVAL=18;COUNT=10;BYMONTHDAY=10,15", Frequency::Monthly, 18, 10),
        ("FREQ=YEARLY;INTERVAL=4;BYMONTH=11;BYDAY=TU;BYMONTHDAY=2,3,4,5,6,7,8",
                                                               Frequency::Yearly,  4, DEFAULT_DURATION),
    ];
    for (src, frequency, interval, duration) in cases {
        let rules = parse_rule(RuleVersion::V2, src)
            .unwrap_or_else(|err| panic!("{src:?} failed to parse: {err}"));
        assert_eq!(rules.len(), 1, "failed for {src}");
        assert_eq!(rules[0].frequency(), frequency, "failed for {src}");
        assert_eq!(rules[0].interval(), interval, "failed for {src}");
        assert_eq!(rules[0].duration(), duration, "failed for {src}");
    }
}

#[test]
fn parses_published_v1_rules() {
    // (rule, frequency, interval, duration)
    #[rustfmt::skip]
    let cases = [
        ("D1 #10",                 Frequency::Daily,       1, 10),
        ("D2 0600 1200 1600 #8",   Frequency::Daily,       2, 8),
        ("W2 MO WE FR #8",         Frequency::Weekly,      2, 8),
        ("MP6 1+ MO #12",          Frequency::MonthlyPos,  6, 12),
        ("MD1 1 15 #10",           Frequency::MonthlyDay,  1, 10),
        ("YM1 6 12 #5",            Frequency::YearlyMonth, 1, 5),
        ("YD4 1 100 200 #4",       Frequency::YearlyDay,   4, 4),
        ("M30 #6",                 Frequency::Minute,      30, 6),
    ];
    for (src, frequency, interval, duration) in cases {
        let rules = parse_rule(RuleVersion::V1, src)
            .unwrap_or_else(|err| panic!("{src:?} failed to parse: {err}"));
        assert_eq!(rules.len(), 1, "failed for {src}");
        assert_eq!(rules[0].frequency(), frequency, "failed for {src}");
        assert_eq!(rules[0].interval(), interval, "failed for {src}");
        assert_eq!(rules[0].duration(), duration, "failed for {src}");
    }
}

#[test]
fn v1_chains_fan_out_into_one_rule_per_link() {
    let rules = parse_rule(RuleVersion::V1, "D1 #5 M10 #6").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].frequency(), Frequency::Daily);
    assert_eq!(rules[0].duration(), 5);
    assert_eq!(rules[1].frequency(), Frequency::Minute);
    assert_eq!(rules[1].interval(), 10);
    assert_eq!(rules[1].duration(), 6);

    // A marker can interrupt a clause that never wrote its terminator.
    let rules = parse_rule(RuleVersion::V1, "W1 MO W2 TU #4").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].duration(), DEFAULT_DURATION);
    assert_eq!(rules[1].duration(), 4);
}

#[test]
fn bare_rules_repeat_twice() {
    for (version, src) in [(RuleVersion::V1, "D1"), (RuleVersion::V2, "FREQ=DAILY")] {
        let rules = parse_rule(version, src).unwrap();
        assert_eq!(rules[0].duration(), DEFAULT_DURATION, "failed for {src}");
        assert_eq!(rules[0].end_date(), None, "failed for {src}");
    }
}

#[test]
fn count_zero_survives_as_written() {
    let rules = parse_rule_v1("D2 #0").unwrap();
    assert_eq!(rules[0].count, Some(0));
    assert_eq!(rules[0].duration(), 0);
}

#[test]
fn last_day_entries_use_the_sentinel_shape() {
    let rules = parse_rule_v1("MD1 LD #4").unwrap();
    let entry = rules[0].month_days[0].value;
    assert!(entry.is_last_day);
    assert!(!entry.negative);
    assert_eq!(entry.day, 0);
}

#[test]
fn end_dates_surface_through_the_unified_view() {
    let v1 = parse_rule(RuleVersion::V1, "W2 MO WE FR 19941224T000000Z").unwrap();
    let v2 = parse_rule(RuleVersion::V2, "FREQ=WEEKLY;INTERVAL=2;UNTIL=19941224T000000Z").unwrap();

    for rules in [&v1, &v2] {
        let end = rules[0].end_date().expect("end date should be set");
        assert_eq!(end.date.year, 1994);
        assert_eq!(end.date.month, 12);
        assert_eq!(end.date.day, 24);
        assert!(end.is_utc());
    }

    // Date-only UNTIL has no time part.
    let rules = parse_rule(RuleVersion::V2, "FREQ=DAILY;UNTIL=19941224").unwrap();
    let end = rules[0].end_date().unwrap();
    assert_eq!(end.time, None);
    assert!(!end.is_utc());
}

#[test]
fn weekday_codes_parse_in_any_case_in_both_grammars() {
    let rules = parse_rule_v1("W1 mo Tu #2").unwrap();
    let days: Vec<Weekday> = rules[0].days_of_week.iter().map(|day| day.value).collect();
    assert_eq!(days, [Weekday::Monday, Weekday::Tuesday]);

    let rule = parse_rule_v2("freq=weekly;byday=mo,sa").unwrap();
    let days: Vec<Weekday> = rule.by_day.iter().map(|day| day.weekday).collect();
    assert_eq!(days, [Weekday::Monday, Weekday::Saturday]);
}

#[test]
fn rejects_rules_fed_to_the_wrong_grammar() {
    let err = parse_rule(RuleVersion::V1, "FREQ=DAILY;COUNT=10").unwrap_err();
    assert!(
        matches!(err, ParseError::UnrecognizedKey { ref key, .. } if key == "FREQ=DAILY;COUNT=10"),
        "unexpected error: {err:?}"
    );

    let err = parse_rule(RuleVersion::V2, "D1 #10").unwrap_err();
    assert_eq!(err, ParseError::MissingRequiredKey { key: "FREQ" });
}

#[test]
fn error_spans_locate_the_bad_token() {
    let err = parse_rule_v2("FREQ=DAILY;BYSECOND=61").unwrap_err();
    assert_eq!(err.span(), Some(Span::new(20, 22)));
    let msg = err.to_string();
    assert!(msg.contains("'61'"), "bad message: {msg}");

    let err = parse_rule_v1("D1 XX #3").unwrap_err();
    assert_eq!(err.span(), Some(Span::new(3, 5)));
    assert!(
        matches!(err, ParseError::MalformedToken { ref token, .. } if token == "XX"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn versions_report_their_wire_strings() {
    let rules = parse_rule(RuleVersion::V1, "D1").unwrap();
    assert_eq!(rules[0].version().as_str(), "1.0");
    let rules = parse_rule(RuleVersion::V2, "FREQ=DAILY").unwrap();
    assert_eq!(rules[0].version().as_str(), "2.0");
}
