//! User-facing notices

use std::fmt;
use tracing::{error, info, warn};

/// Severity of a notice shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Status,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Status => write!(f, "status"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// Sink for notices meant for a person rather than the log
pub trait Messenger: Send + Sync {
    fn add_message(&self, message: &str, level: NoticeLevel);
}

/// Messenger that forwards notices to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn add_message(&self, message: &str, level: NoticeLevel) {
        match level {
            NoticeLevel::Status => info!("{}", message),
            NoticeLevel::Warning => warn!("{}", message),
            NoticeLevel::Error => error!("{}", message),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Messenger that keeps every notice for assertions
    #[derive(Debug, Default)]
    pub struct RecordingMessenger {
        notices: Mutex<Vec<(NoticeLevel, String)>>,
    }

    impl RecordingMessenger {
        pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl Messenger for RecordingMessenger {
        fn add_message(&self, message: &str, level: NoticeLevel) {
            self.notices
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }
}
