//! Toast notifications.

/// Kind of a notification, used as its CSS class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fas fa-check-circle",
            NotificationKind::Error => "fas fa-exclamation-circle",
        }
    }
}

/// Times, relative to insertion, at which a toast changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationTimeline {
    /// Add the `show` class
    pub show_at_ms: u32,
    /// Remove the `show` class
    pub hide_at_ms: u32,
    /// Remove the element
    pub remove_at_ms: u32,
}

impl Default for NotificationTimeline {
    fn default() -> Self {
        Self {
            show_at_ms: 100,
            hide_at_ms: 3000,
            remove_at_ms: 3300,
        }
    }
}

/// A message shown to the user for a few seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    /// Element class list, e.g. `"notification success"`.
    pub fn class_list(&self) -> String {
        format!("notification {}", self.kind.class_name())
    }

    pub fn timeline(&self) -> NotificationTimeline {
        NotificationTimeline::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        let n = Notification::error("nope");
        assert_eq!(n.class_list(), "notification error");
        assert_eq!(n.kind.icon_class(), "fas fa-exclamation-circle");
        assert_eq!(
            Notification::success("ok").kind.icon_class(),
            "fas fa-check-circle"
        );
    }

    #[test]
    fn test_timeline_order() {
        let t = Notification::success("ok").timeline();
        assert!(t.show_at_ms < t.hide_at_ms);
        assert_eq!(t.remove_at_ms - t.hide_at_ms, 300);
    }
}
