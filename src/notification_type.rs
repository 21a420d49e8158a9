//! Notification-type lookup against a read-only snapshot.
//!
//! The type list is fetched once per session and passed explicitly to every
//! formatting call as a [`NotificationTypeSnapshot`]. An empty snapshot is
//! valid: lookups then fall back to display defaults.

use std::collections::{BTreeSet, HashMap};

use crate::model::NotificationType;

/// Form code for declaring the vessel's current position.
pub const FORM_POSITION_REPORT: &str = "KBVT";
/// Form code for declaring arrival in port.
pub const FORM_PORT_ARRIVAL: &str = "KBCC";

/// Color used when a type is unknown or declares none.
pub const DEFAULT_COLOR: &str = "#1f2937";
/// Background used when a type is unknown or declares none.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f3f4f6";

/// Set of form codes a notification type enables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormTypes(BTreeSet<String>);

impl FormTypes {
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether the "declare position" action applies.
    pub fn allows_position_report(&self) -> bool {
        self.contains(FORM_POSITION_REPORT)
    }

    /// Whether the "declare port arrival" action applies.
    pub fn allows_port_arrival(&self) -> bool {
        self.contains(FORM_PORT_ARRIVAL)
    }
}

/// Parses a comma-separated `form_type` value. Entries are trimmed and empty
/// entries dropped.
pub fn parse_form_types(raw: &str) -> FormTypes {
    FormTypes(
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Resolved display properties for one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDisplay {
    pub title: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: String,
    pub background_color: String,
    pub forms: FormTypes,
    /// Whether the code matched a known type.
    pub known: bool,
}

/// Immutable view of the notification types, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct NotificationTypeSnapshot {
    types: HashMap<String, NotificationType>,
}

impl NotificationTypeSnapshot {
    /// Builds a snapshot. On duplicate codes the first entry wins, matching a
    /// find-by-code scan over the original list.
    pub fn from_types(types: Vec<NotificationType>) -> Self {
        let mut map = HashMap::with_capacity(types.len());
        for t in types {
            if map.contains_key(&t.code) {
                log::warn!("Duplicate notification type ignored code={}", t.code);
                continue;
            }
            map.insert(t.code.clone(), t);
        }
        Self { types: map }
    }

    pub fn get(&self, code: &str) -> Option<&NotificationType> {
        self.types.get(code)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The message template for a code, if the type exists and declares one.
    pub fn template_for(&self, code: &str) -> Option<&str> {
        self.get(code)
            .and_then(|t| t.template_message.as_deref())
            .filter(|tpl| !tpl.trim().is_empty())
    }

    /// Resolves display properties for `code`.
    ///
    /// Unknown codes degrade to the uppercased raw content as title, no icon,
    /// default colors and no forms.
    pub fn resolve(&self, code: &str, raw_content: Option<&str>) -> TypeDisplay {
        match self.get(code) {
            Some(t) => TypeDisplay {
                title: t
                    .title
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| t.name.clone()),
                name: Some(t.name.clone()).filter(|s| !s.is_empty()),
                icon: t.icon.clone(),
                color: t.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                background_color: t
                    .background_color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
                forms: t.form_type.as_deref().map(parse_form_types).unwrap_or_default(),
                known: true,
            },
            None => {
                log::debug!("Notification type not in snapshot code={} types={}", code, self.len());
                TypeDisplay {
                    title: raw_content.unwrap_or_default().to_uppercase(),
                    name: None,
                    icon: None,
                    color: DEFAULT_COLOR.to_string(),
                    background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
                    forms: FormTypes::default(),
                    known: false,
                }
            }
        }
    }
}
