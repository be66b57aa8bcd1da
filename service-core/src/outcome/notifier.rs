use serde::Serialize;

/// A business-rule violation recorded while handling one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request-scoped collector of business notifications.
///
/// Construct one per request at the top of the handler and pass it down by
/// `&mut`. It is intentionally neither `Clone` nor shareable: a notifier that
/// outlives its request would leak messages into unrelated responses.
#[derive(Debug, Default)]
pub struct Notifier {
    notifications: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification. Duplicates are kept; order is insertion order.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification::new(message));
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}
