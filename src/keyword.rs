// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Keywords shared by the vCard and vCalendar grammars.

/// Sentinel prefix that every nonstandard (experimental) property name
/// collapses to for dispatch purposes.
pub const KW_XNAME_SENTINEL: &str = "X-";

// Recurrence rule keys, vCalendar 2.0 / RFC 5545 Section 3.3.10
pub const KW_RRULE_FREQ: &str = "FREQ";
pub const KW_RRULE_UNTIL: &str = "UNTIL";
pub const KW_RRULE_COUNT: &str = "COUNT";
pub const KW_RRULE_INTERVAL: &str = "INTERVAL";
pub const KW_RRULE_BYSECOND: &str = "BYSECOND";
pub const KW_RRULE_BYMINUTE: &str = "BYMINUTE";
pub const KW_RRULE_BYHOUR: &str = "BYHOUR";
pub const KW_RRULE_BYDAY: &str = "BYDAY";
pub const KW_RRULE_BYMONTHDAY: &str = "BYMONTHDAY";
pub const KW_RRULE_BYYEARDAY: &str = "BYYEARDAY";
pub const KW_RRULE_BYWEEKNO: &str = "BYWEEKNO";
pub const KW_RRULE_BYMONTH: &str = "BYMONTH";
pub const KW_RRULE_BYSETPOS: &str = "BYSETPOS";
pub const KW_RRULE_WKST: &str = "WKST";

// Frequency names, vCalendar 2.0 FREQ values
pub const KW_FREQ_SECONDLY: &str = "SECONDLY";
pub const KW_FREQ_MINUTELY: &str = "MINUTELY";
pub const KW_FREQ_HOURLY: &str = "HOURLY";
pub const KW_FREQ_DAILY: &str = "DAILY";
pub const KW_FREQ_WEEKLY: &str = "WEEKLY";
pub const KW_FREQ_MONTHLY: &str = "MONTHLY";
pub const KW_FREQ_YEARLY: &str = "YEARLY";

// Frequency markers, vCalendar 1.0 positional grammar. Two-letter markers
// must be tried before one-letter ones when classifying a token.
pub const KW_V1_MINUTELY: &str = "M";
pub const KW_V1_DAILY: &str = "D";
pub const KW_V1_WEEKLY: &str = "W";
pub const KW_V1_MONTHLY_POS: &str = "MP";
pub const KW_V1_MONTHLY_DAY: &str = "MD";
pub const KW_V1_YEARLY_MONTH: &str = "YM";
pub const KW_V1_YEARLY_DAY: &str = "YD";

// Other vCalendar 1.0 rule tokens. Weekday codes (SU, MO, ...) are owned by
// the `Weekday` enum's strum derives.
pub const KW_V1_LAST_DAY: &str = "LD";
pub const KW_V1_DURATION_PREFIX: char = '#';
pub const KW_V1_END_MARKER: char = '$';
