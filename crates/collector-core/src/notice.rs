use std::fmt;

/// Fixed label in front of every user-facing error.
pub const NOTICE_LABEL: &str = "Daily Note Collector Error: ";

/// A one-line message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
}

impl Notice {
    pub fn error(error: &dyn fmt::Display) -> Self {
        Self {
            message: format!("{}{}", NOTICE_LABEL, error),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Shows notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Headless hosts: notices go to the error log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        log::error!("{}", notice);
    }
}
