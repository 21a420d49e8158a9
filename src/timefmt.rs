//! Timestamp parsing and display.
//!
//! Absolute timestamps are rendered the way the Vietnamese locale prints them
//! (`07:30 10/02/2025`), by default in the `Asia/Ho_Chi_Minh` zone. Relative
//! labels ("5 phút trước") escalate through a configurable set of tiers.
//!
//! Nothing here fails: absent or unparsable input renders as an empty string.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

/// UTC offset of `Asia/Ho_Chi_Minh`. The zone has no daylight saving time.
pub const VIETNAM_UTC_OFFSET_SECS: i32 = 7 * 3600;

const MS_PER_MINUTE: i64 = 60_000;

/// Source of "now" for relative labels.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses the timestamp shapes the backend emits.
///
/// Accepts RFC 3339 (`2025-02-10T07:30:00+07:00`) and offset-less
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Options for absolute, locale-formatted timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteFormat {
    /// Offset east of UTC, in seconds, the timestamp is shown in.
    pub utc_offset_secs: i32,
    /// Include seconds in the time part.
    pub with_seconds: bool,
}

impl Default for AbsoluteFormat {
    fn default() -> Self {
        Self {
            utc_offset_secs: VIETNAM_UTC_OFFSET_SECS,
            with_seconds: false,
        }
    }
}

impl AbsoluteFormat {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    /// Renders a parsed timestamp as `HH:MM[:SS] dd/mm/yyyy`.
    pub fn render(&self, ts: &DateTime<FixedOffset>) -> String {
        let pattern = if self.with_seconds {
            "%H:%M:%S %d/%m/%Y"
        } else {
            "%H:%M %d/%m/%Y"
        };
        ts.with_timezone(&self.offset()).format(pattern).to_string()
    }
}

/// Formats a raw timestamp as an absolute local string, or `""`.
pub fn format_absolute(raw: Option<&str>, format: &AbsoluteFormat) -> String {
    raw.and_then(parse_timestamp)
        .map(|ts| format.render(&ts))
        .unwrap_or_default()
}

/// How far a relative label escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelativeTiers {
    /// Minutes, then hours without an upper bound.
    #[default]
    MinutesHours,
    /// Minutes, hours below one day, then days.
    MinutesHoursDays,
}

/// Builds a "time ago" label for an elapsed duration.
///
/// Minutes are floored, so anything under a minute is `"0 phút trước"`.
/// Hours and days are rounded. Negative durations clamp to zero.
pub fn relative_label(elapsed: chrono::Duration, tiers: RelativeTiers) -> String {
    let minutes = (elapsed.num_milliseconds() / MS_PER_MINUTE).max(0);
    if minutes < 60 {
        return format!("{minutes} phút trước");
    }

    let hours = (minutes as f64 / 60.0).round() as i64;
    match tiers {
        RelativeTiers::MinutesHoursDays if hours >= 24 => {
            let days = (hours as f64 / 24.0).round() as i64;
            format!("{days} ngày trước")
        }
        _ => format!("{hours} giờ trước"),
    }
}

/// Formats a raw timestamp relative to `now`, or `""`.
pub fn format_relative(raw: Option<&str>, now: DateTime<Utc>, tiers: RelativeTiers) -> String {
    raw.and_then(parse_timestamp)
        .map(|ts| relative_label(now.signed_duration_since(ts), tiers))
        .unwrap_or_default()
}

/// How template timestamps are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    Absolute(AbsoluteFormat),
    Relative(RelativeTiers),
}

impl Default for TimestampStyle {
    fn default() -> Self {
        TimestampStyle::Absolute(AbsoluteFormat::default())
    }
}

/// Formats a raw timestamp in the given style.
pub fn format_timestamp(raw: Option<&str>, style: TimestampStyle, now: DateTime<Utc>) -> String {
    match style {
        TimestampStyle::Absolute(format) => format_absolute(raw, &format),
        TimestampStyle::Relative(tiers) => format_relative(raw, now, tiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 10, 12, 0, 0).unwrap()
    }

    fn ago(duration: Duration) -> String {
        (now() - duration).to_rfc3339()
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let rfc = parse_timestamp("2025-02-10T07:30:00+07:00").unwrap();
        assert_eq!(rfc.with_timezone(&Utc), Utc.with_ymd_and_hms(2025, 2, 10, 0, 30, 0).unwrap());

        let spaced = parse_timestamp("2025-02-10 00:30:00").unwrap();
        assert_eq!(spaced, rfc);

        let naive_t = parse_timestamp("2025-02-10T00:30:00.250").unwrap();
        assert_eq!(naive_t.with_timezone(&Utc).timestamp(), rfc.timestamp());

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_absolute_in_vietnam_time() {
        let format = AbsoluteFormat::default();
        assert_eq!(
            format_absolute(Some("2025-02-10T07:30:00+07:00"), &format),
            "07:30 10/02/2025"
        );
        assert_eq!(
            format_absolute(Some("2025-02-09T23:15:42Z"), &format),
            "06:15 10/02/2025"
        );

        let with_seconds = AbsoluteFormat {
            with_seconds: true,
            ..AbsoluteFormat::default()
        };
        assert_eq!(
            format_absolute(Some("2025-02-09T23:15:42Z"), &with_seconds),
            "06:15:42 10/02/2025"
        );
    }

    #[test]
    fn test_absolute_missing_or_invalid_is_empty() {
        let format = AbsoluteFormat::default();
        assert_eq!(format_absolute(None, &format), "");
        assert_eq!(format_absolute(Some("not a date"), &format), "");
    }

    #[test]
    fn test_relative_under_a_minute_is_zero() {
        let label = format_relative(Some(&ago(Duration::milliseconds(45_000))), now(), RelativeTiers::MinutesHours);
        assert_eq!(label, "0 phút trước");
    }

    #[test]
    fn test_relative_minutes() {
        let label = format_relative(Some(&ago(Duration::minutes(59))), now(), RelativeTiers::MinutesHours);
        assert_eq!(label, "59 phút trước");
    }

    #[test]
    fn test_relative_hours_round() {
        let label = format_relative(Some(&ago(Duration::minutes(90))), now(), RelativeTiers::MinutesHours);
        assert_eq!(label, "2 giờ trước");
        let label = format_relative(Some(&ago(Duration::minutes(80))), now(), RelativeTiers::MinutesHoursDays);
        assert_eq!(label, "1 giờ trước");
    }

    #[test]
    fn test_two_tier_never_escalates_to_days() {
        let label = format_relative(Some(&ago(Duration::hours(50))), now(), RelativeTiers::MinutesHours);
        assert_eq!(label, "50 giờ trước");
    }

    #[test]
    fn test_three_tier_escalates_to_days() {
        let label = format_relative(Some(&ago(Duration::hours(23))), now(), RelativeTiers::MinutesHoursDays);
        assert_eq!(label, "23 giờ trước");
        let label = format_relative(Some(&ago(Duration::hours(50))), now(), RelativeTiers::MinutesHoursDays);
        assert_eq!(label, "2 ngày trước");
    }

    #[test]
    fn test_relative_future_clamps_to_zero() {
        assert_eq!(relative_label(Duration::minutes(-5), RelativeTiers::MinutesHours), "0 phút trước");
    }

    #[test]
    fn test_relative_missing_is_empty() {
        assert_eq!(format_relative(None, now(), RelativeTiers::MinutesHours), "");
        assert_eq!(format_relative(Some("garbage"), now(), RelativeTiers::MinutesHoursDays), "");
    }

    #[test]
    fn test_clock_sources() {
        assert_eq!(FixedClock(now()).now(), now());
        assert!(SystemClock.now() > now());
    }

    #[test]
    fn test_format_timestamp_dispatches_on_style() {
        let raw = ago(Duration::minutes(10));
        assert_eq!(
            format_timestamp(Some(&raw), TimestampStyle::Relative(RelativeTiers::MinutesHours), now()),
            "10 phút trước"
        );
        assert_eq!(
            format_timestamp(Some(&raw), TimestampStyle::default(), now()),
            "18:50 10/02/2025"
        );
    }
}
