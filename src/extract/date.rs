//! Request date normalization.
//!
//! Form dates are local wall-clock phrases such as `2024年5月1日10時30分`.
//! They are resolved in a named time zone, using the offset that zone
//! observes on that date, and rendered as a UTC timestamp.

use std::sync::LazyLock;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::text::normalize_digits;

const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

static RE_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日([0-9]{1,2})時([0-9]{1,2})分$")
        .expect("regex is compile-time constant")
});

static RE_DATED_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9０-９]{4}年[0-9０-９]{1,2}月[0-9０-９]{1,2}日(?:\s*[0-9０-９]{1,2}時[0-9０-９]{1,2}分)?)\s*[(（]\s*([0-9０-９]+)\s*[)）]",
    )
    .expect("regex is compile-time constant")
});

/// A request date in one of the shapes callers hand over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// Form text, `<y>年<m>月<d>日<h>時<m>分`
    Text(String),
    /// Wall-clock time in the configured zone
    Local(NaiveDateTime),
    /// Already an instant
    Instant(DateTime<Utc>),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

/// Normalize a request date to `yyyy-MM-ddTHH:mm:ssZ`.
///
/// Text that does not have the exact form shape, or names an impossible
/// date, yields `None`.
pub fn normalize(input: &DateInput, zone: Tz) -> Option<String> {
    let instant = match input {
        DateInput::Text(text) => local_to_utc(parse_phrase(text)?, zone)?,
        DateInput::Local(naive) => local_to_utc(*naive, zone)?,
        DateInput::Instant(instant) => *instant,
    };
    Some(instant.format(UTC_FORMAT).to_string())
}

fn parse_phrase(text: &str) -> Option<NaiveDateTime> {
    let text = normalize_digits(text.trim());
    let caps = RE_DATE_TIME.captures(&text)?;
    let number = |i: usize| caps[i].parse::<u32>().ok();

    let year = caps[1].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?.and_hms_opt(number(4)?, number(5)?, 0)
}

/// Resolve a wall-clock time in `zone` to UTC.
///
/// An ambiguous time (clocks going back) takes the earlier instant. A time
/// skipped by a forward transition is shifted by the zone's offset at that
/// moment read as UTC.
pub fn local_to_utc(naive: NaiveDateTime, zone: Tz) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) => Some(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let offset = zone.offset_from_utc_datetime(&naive).fix();
            let utc = naive.checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc().into()))?;
            Some(Utc.from_utc_datetime(&utc))
        }
    }
}

/// Find `<date phrase>(<number>)` in `text`.
///
/// Returns the date phrase as written and the number with half-width digits.
pub fn find_dated_reference(text: &str) -> Option<(String, String)> {
    let caps = RE_DATED_REFERENCE.captures(text)?;
    Some((caps[1].to_string(), normalize_digits(&caps[2])))
}
