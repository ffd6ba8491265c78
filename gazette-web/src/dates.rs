//! Normalization of publication timestamps scraped from pages.
//!
//! Portals print dates in many shapes (`2023-05-01`, `2023/5/1 09:30`,
//! `2023年5月1日`, RFC 3339 ...). [`parse_date`] turns any of them into a
//! zoned timestamp; values without a zone are read in the caller's offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})\s*日?(?:[\sT]+(\d{1,2})[:：](\d{1,2})(?:[:：](\d{1,2}))?)?$",
    )
    .expect("calendar date pattern is valid")
});

static EPOCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}(\d{3})?$").expect("epoch pattern is valid"));

/// The offset used for portal timestamps that carry no zone (UTC+08:00).
pub fn china_standard_time() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap_or_else(|| Utc.fix())
}

/// Parse a scraped date string.
///
/// Tries, in order: RFC 3339, RFC 2822, Unix seconds/milliseconds, and
/// calendar dates with `-`, `/`, `.` or `年月日` separators and an optional
/// `HH:MM[:SS]` time. Returns `None` for blank or unrecognised text.
pub fn parse_date(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    if EPOCH.is_match(s) {
        let n: i64 = s.parse().ok()?;
        let dt = if s.len() == 13 {
            DateTime::<Utc>::from_timestamp_millis(n)?
        } else {
            DateTime::<Utc>::from_timestamp(n, 0)?
        };
        return Some(dt.with_timezone(&offset));
    }

    let caps = CALENDAR_DATE.captures(s)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;
    let time = match num(4) {
        Some(hour) => NaiveTime::from_hms_opt(hour, num(5)?, num(6).unwrap_or(0))?,
        None => NaiveTime::MIN,
    };

    offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cst(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn parses_plain_dates_in_portal_offset() {
        let tz = china_standard_time();
        assert_eq!(
            parse_date("2023-05-01", tz),
            Some(cst("2023-05-01T00:00:00+08:00"))
        );
        assert_eq!(
            parse_date("  2023/5/1\n", tz),
            Some(cst("2023-05-01T00:00:00+08:00"))
        );
        assert_eq!(
            parse_date("2023.05.01", tz),
            Some(cst("2023-05-01T00:00:00+08:00"))
        );
    }

    #[test]
    fn parses_date_times() {
        let tz = china_standard_time();
        assert_eq!(
            parse_date("2023-05-01 09:30:15", tz),
            Some(cst("2023-05-01T09:30:15+08:00"))
        );
        assert_eq!(
            parse_date("2023-05-01 9:30", tz),
            Some(cst("2023-05-01T09:30:00+08:00"))
        );
        assert_eq!(
            parse_date("2023-05-01T23:59:59", tz),
            Some(cst("2023-05-01T23:59:59+08:00"))
        );
    }

    #[test]
    fn parses_chinese_calendar_dates() {
        let tz = china_standard_time();
        assert_eq!(
            parse_date("2023年5月1日", tz),
            Some(cst("2023-05-01T00:00:00+08:00"))
        );
        assert_eq!(
            parse_date("2023年05月01日 14：05", tz),
            Some(cst("2023-05-01T14:05:00+08:00"))
        );
    }

    #[test]
    fn zoned_inputs_keep_their_offset() {
        let tz = china_standard_time();
        assert_eq!(
            parse_date("2023-05-01T00:00:00Z", tz),
            Some(cst("2023-05-01T00:00:00+00:00"))
        );
        assert_eq!(
            parse_date("Mon, 01 May 2023 10:00:00 +0000", tz),
            Some(cst("2023-05-01T10:00:00+00:00"))
        );
    }

    #[test]
    fn parses_unix_timestamps() {
        let tz = china_standard_time();
        assert_eq!(
            parse_date("1682870400", tz),
            Some(cst("2023-05-01T00:00:00+08:00"))
        );
        assert_eq!(
            parse_date("1682870400000", tz),
            Some(cst("2023-05-01T00:00:00+08:00"))
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        let tz = china_standard_time();
        assert_eq!(parse_date("", tz), None);
        assert_eq!(parse_date("   ", tz), None);
        assert_eq!(parse_date("发布时间", tz), None);
        assert_eq!(parse_date("2023-13-01", tz), None);
        assert_eq!(parse_date("2023-02-30", tz), None);
        assert_eq!(parse_date("2023-05-01 25:00", tz), None);
    }
}
