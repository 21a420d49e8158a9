//! Assembles a displayable message from a notification and the type snapshot.

use crate::model::Notification;
use crate::notification_type::{NotificationTypeSnapshot, TypeDisplay};
use crate::template::{self, RenderContext};

/// A notification ready for display. Recomputed on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage {
    pub display: TypeDisplay,
    /// Rendered template, or the raw content when no template applies.
    pub body: String,
    /// Whether `body` came from a template.
    pub templated: bool,
}

impl FormattedMessage {
    /// Body without inline markup.
    pub fn plain_body(&self) -> String {
        template::strip_markup(&self.body).into_owned()
    }
}

/// Formats notifications against one snapshot of notification types.
pub struct MessageFormatter<'a> {
    types: &'a NotificationTypeSnapshot,
    context: RenderContext,
}

impl<'a> MessageFormatter<'a> {
    pub fn new(types: &'a NotificationTypeSnapshot, context: RenderContext) -> Self {
        Self { types, context }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Resolves the type and renders its template. Without a template the body
    /// degrades to the notification's raw content.
    pub fn format(&self, notification: &Notification) -> FormattedMessage {
        let display = self
            .types
            .resolve(&notification.kind, notification.content.as_deref());

        match self.types.template_for(&notification.kind) {
            Some(tpl) => FormattedMessage {
                display,
                body: template::render(tpl, notification, &self.context),
                templated: true,
            },
            None => FormattedMessage {
                display,
                body: notification.content.clone().unwrap_or_default(),
                templated: false,
            },
        }
    }

    pub fn format_all(&self, notifications: &[Notification]) -> Vec<FormattedMessage> {
        notifications.iter().map(|n| self.format(n)).collect()
    }
}
