//! Records consumed from the platform API.
//!
//! Notification records are heterogeneous: which fields are populated depends
//! on the event type. Every field except the type code therefore defaults when
//! absent, and coordinates tolerate `null`, numbers and numeric strings.

use serde::{Deserialize, Deserializer, Serialize};

/// A notification emitted for a vessel event (connection loss, port arrival,
/// position report reminder, ...).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Notification {
    /// Backend identifier. Numeric or string depending on the resource.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Notification type code, e.g. `MKN_OVER_6H`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub ship_code: Option<String>,
    /// Event time as emitted by the backend (usually RFC 3339).
    #[serde(default)]
    pub occurred_at: Option<String>,
    /// Start of a connection loss, when the event carries one.
    #[serde(default)]
    pub first_lost_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_phone: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub agent_code: Option<String>,
}

impl Notification {
    /// Stable key for de-duplicating notifications across polls.
    ///
    /// Uses the backend id when present, otherwise type, ship and time.
    pub fn key(&self) -> String {
        match &self.id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => format!(
                "{}|{}|{}",
                self.kind,
                self.ship_code.as_deref().unwrap_or_default(),
                self.occurred_at.as_deref().unwrap_or_default()
            ),
            Some(other) => other.to_string(),
        }
    }
}

/// A notification type with its message template and display metadata.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct NotificationType {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Template containing `{{token}}` placeholders.
    #[serde(default)]
    pub template_message: Option<String>,
    /// Comma-separated form codes this type lets the user submit.
    #[serde(default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

/// Accepts a number, a numeric string, or null. Anything else, including
/// non-finite values such as `"NaN"` or `"inf"`, becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}
