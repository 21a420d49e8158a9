//! `{{token}}` substitution for notification templates.
//!
//! Recognized tokens are replaced by the matching notification field wrapped
//! in `<b>…</b>`. What happens to unrecognized tokens is chosen per call with
//! [`UnknownTokenPolicy`].
//!
//! Output is plain text carrying a small inline-markup whitelist (`<b>`,
//! `<strong>`). Rendering that markup is up to the view.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

use crate::geo::{self, DmsStyle};
use crate::model::Notification;
use crate::timefmt::{self, Clock, TimestampStyle};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid"));

static INLINE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:b|strong)>").expect("markup pattern is valid"));

/// What to do with a `{{token}}` that has no known source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTokenPolicy {
    /// Leave the literal `{{token}}` in place.
    #[default]
    Preserve,
    /// Replace it with an empty bold span.
    Blank,
}

/// Tokens with a fixed source in the notification record. Names are
/// case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    ShipCode,
    Timestamp,
    Location,
    Lat,
    Lng,
    OwnerName,
    OwnerPhone,
    Phone,
    Content,
    Type,
    AgentCode,
}

impl Token {
    fn from_name(name: &str) -> Option<Self> {
        let token = match name {
            "vesselCode" | "ship_code" => Token::ShipCode,
            "firstLostAt" | "occurred_at" => Token::Timestamp,
            "location" => Token::Location,
            "lat" => Token::Lat,
            "lng" => Token::Lng,
            "owner_name" => Token::OwnerName,
            "owner_phone" => Token::OwnerPhone,
            "phone" => Token::Phone,
            "content" => Token::Content,
            "type" => Token::Type,
            "agent_code" => Token::AgentCode,
            _ => return None,
        };
        Some(token)
    }

    fn value(self, n: &Notification, ctx: &RenderContext) -> String {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        match self {
            Token::ShipCode => text(&n.ship_code),
            Token::Timestamp => {
                let raw = n.first_lost_at.as_deref().or(n.occurred_at.as_deref());
                timefmt::format_timestamp(raw, ctx.timestamp, ctx.now)
            }
            Token::Location => geo::format_location(n.lat, n.lng, ctx.location),
            Token::Lat => coordinate(n.lat),
            Token::Lng => coordinate(n.lng),
            Token::OwnerName => text(&n.owner_name),
            Token::OwnerPhone => text(&n.owner_phone),
            Token::Phone => text(&n.phone),
            Token::Content => text(&n.content),
            Token::Type => n.kind.clone(),
            Token::AgentCode => text(&n.agent_code),
        }
    }
}

/// Raw coordinate text; empty for absent or non-finite values.
fn coordinate(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Per-render options.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub timestamp: TimestampStyle,
    pub location: DmsStyle,
    pub unknown_tokens: UnknownTokenPolicy,
    /// Reference instant for relative timestamps.
    pub now: DateTime<Utc>,
}

impl RenderContext {
    /// Default options evaluated at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: TimestampStyle::default(),
            location: DmsStyle::Compact,
            unknown_tokens: UnknownTokenPolicy::default(),
            now,
        }
    }

    /// Default options evaluated at the clock's current time.
    pub fn from_clock(clock: &impl Clock) -> Self {
        Self::new(clock.now())
    }
}

/// Wraps a value in the bold markup the views understand.
pub fn bold(value: &str) -> String {
    format!("<b>{value}</b>")
}

/// Substitutes every `{{token}}` in `template` from `notification`.
pub fn render(template: &str, notification: &Notification, ctx: &RenderContext) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match Token::from_name(&caps[1]) {
            Some(token) => bold(&token.value(notification, ctx)),
            None => match ctx.unknown_tokens {
                UnknownTokenPolicy::Preserve => caps[0].to_string(),
                UnknownTokenPolicy::Blank => bold(""),
            },
        })
        .into_owned()
}

/// Names of all placeholders in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Removes the inline bold markup, for plain-text sinks such as a terminal.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    INLINE_MARKUP.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timefmt::RelativeTiers;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 10, 12, 0, 0).unwrap()
    }

    fn notification() -> Notification {
        Notification {
            kind: "MKN_OVER_6H".to_string(),
            ship_code: Some("BV-99999-TS".to_string()),
            occurred_at: Some("2025-02-10T07:30:00+07:00".to_string()),
            lat: Some(6.17),
            lng: Some(105.9067),
            owner_name: Some("Trần Văn B".to_string()),
            owner_phone: Some("0987654321".to_string()),
            ..Notification::default()
        }
    }

    #[test]
    fn test_recognized_tokens_are_bold_and_consumed() {
        let out = render(
            "Tàu {{vesselCode}} lúc {{firstLostAt}}",
            &notification(),
            &RenderContext::new(now()),
        );
        assert_eq!(out, "Tàu <b>BV-99999-TS</b> lúc <b>07:30 10/02/2025</b>");
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let out = render("{{ship_code}}/{{vesselCode}}/{{ship_code}}", &notification(), &RenderContext::new(now()));
        assert_eq!(out, "<b>BV-99999-TS</b>/<b>BV-99999-TS</b>/<b>BV-99999-TS</b>");
    }

    #[test]
    fn test_unknown_token_preserved_by_default() {
        let out = render("{{unknownField}}", &notification(), &RenderContext::new(now()));
        assert_eq!(out, "{{unknownField}}");
    }

    #[test]
    fn test_unknown_token_blanked_when_asked() {
        let ctx = RenderContext {
            unknown_tokens: UnknownTokenPolicy::Blank,
            ..RenderContext::new(now())
        };
        let out = render("x{{unknownField}}y {{vesselCode}}", &notification(), &ctx);
        assert_eq!(out, "x<b></b>y <b>BV-99999-TS</b>");
    }

    #[test]
    fn test_token_names_are_case_sensitive() {
        let out = render("{{VesselCode}}", &notification(), &RenderContext::new(now()));
        assert_eq!(out, "{{VesselCode}}");
    }

    #[test]
    fn test_missing_fields_render_empty_bold() {
        let sparse = Notification {
            kind: "SYSTEM".to_string(),
            ..Notification::default()
        };
        let out = render(
            "{{vesselCode}}|{{firstLostAt}}|{{location}}|{{lat}}|{{content}}|{{type}}",
            &sparse,
            &RenderContext::new(now()),
        );
        assert_eq!(out, "<b></b>|<b></b>|<b></b>|<b></b>|<b></b>|<b>SYSTEM</b>");
    }

    #[test]
    fn test_non_finite_coordinates_render_empty() {
        let n = Notification {
            kind: "X".to_string(),
            lat: Some(f64::NAN),
            lng: Some(f64::INFINITY),
            ..Notification::default()
        };
        let out = render("{{lat}}|{{lng}}|{{location}}", &n, &RenderContext::new(now()));
        assert_eq!(out, "<b></b>|<b></b>|<b></b>");

        let parsed: Notification =
            serde_json::from_value(serde_json::json!({"type": "X", "lat": "NaN", "lng": "inf"})).unwrap();
        let out = render("{{lat}}|{{lng}}|{{location}}", &parsed, &RenderContext::new(now()));
        assert_eq!(out, "<b></b>|<b></b>|<b></b>");
    }

    #[test]
    fn test_raw_fields_pass_through() {
        let mut n = notification();
        n.phone = Some("113".to_string());
        n.content = Some("Đã vào cảng".to_string());
        n.agent_code = Some("DL-01".to_string());
        let out = render(
            "{{lat}},{{lng}} {{owner_name}} {{owner_phone}} {{phone}} {{content}} {{type}} {{agent_code}}",
            &n,
            &RenderContext::new(now()),
        );
        assert_eq!(
            out,
            "<b>6.17</b>,<b>105.9067</b> <b>Trần Văn B</b> <b>0987654321</b> <b>113</b> \
             <b>Đã vào cảng</b> <b>MKN_OVER_6H</b> <b>DL-01</b>"
        );
    }

    #[test]
    fn test_relative_timestamp_and_first_lost_at() {
        let mut n = notification();
        n.first_lost_at = Some("2025-02-10T04:00:00Z".to_string());
        let ctx = RenderContext {
            timestamp: TimestampStyle::Relative(RelativeTiers::MinutesHours),
            ..RenderContext::new(now())
        };
        assert_eq!(render("{{firstLostAt}}", &n, &ctx), "<b>8 giờ trước</b>");
    }

    #[test]
    fn test_location_uses_configured_style() {
        let ctx = RenderContext {
            location: DmsStyle::Verbose,
            ..RenderContext::new(now())
        };
        assert_eq!(
            render("{{location}}", &notification(), &ctx),
            "<b>6°10'12.000\"N105°54'24.120\"E</b>"
        );
    }

    #[test]
    fn test_placeholders_and_strip_markup() {
        assert_eq!(placeholders("a {{x}} b {{y_1}} {{ bad }}"), vec!["x", "y_1"]);
        assert_eq!(strip_markup("Tàu <b>A</b> và <STRONG>B</STRONG>"), "Tàu A và B");
    }

    #[test]
    fn test_template_without_tokens_unchanged() {
        let out = render("Không có biến", &notification(), &RenderContext::new(now()));
        assert_eq!(out, "Không có biến");
    }
}
