// Diagnostics engine → caller
//
// Rejected updates and renderer failures are pushed here in addition to the
// log, so a UI can surface them without scraping log output.

use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Engine area a diagnostic comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Transport,
    Parameter,
    Renderer,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        })
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationCategory::Transport => "transport",
            NotificationCategory::Parameter => "parameter",
            NotificationCategory::Renderer => "renderer",
        })
    }
}

/// One diagnostic, stamped with the transport position it was raised at
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Next step to be emitted when the diagnostic was raised
    pub step: u64,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        category: NotificationCategory,
        message: impl Into<String>,
        step: u64,
    ) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            step,
        }
    }

    /// At least as severe as `level`
    pub fn is_at_least(&self, level: NotificationLevel) -> bool {
        self.level >= level
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{} @ step {}] {}",
            self.level, self.category, self.step, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let notification = Notification::new(
            NotificationLevel::Warning,
            NotificationCategory::Parameter,
            "Unknown parameter group",
            12,
        );
        assert_eq!(
            notification.to_string(),
            "[warning/parameter @ step 12] Unknown parameter group"
        );
    }

    #[test]
    fn test_severity_ordering() {
        let error = Notification::new(
            NotificationLevel::Error,
            NotificationCategory::Renderer,
            "No output device",
            0,
        );
        assert!(error.is_at_least(NotificationLevel::Warning));
        assert!(!Notification::new(
            NotificationLevel::Info,
            NotificationCategory::Transport,
            "",
            0
        )
        .is_at_least(NotificationLevel::Warning));
    }
}
