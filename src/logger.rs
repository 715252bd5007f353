//! Log sink passed into every command.
//!
//! Commands never reach for a global logger. The binary hands them a
//! [`TracingLogger`]; tests hand them a [`MemoryLogger`] and inspect what
//! was written.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Notice,
    Warning,
    Error,
}

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn notice(&self, message: &str) {
        self.log(Level::Notice, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards entries to the `tracing` subscriber installed by the binary.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!("{}", message),
            Level::Notice => tracing::info!("{}", message),
            Level::Warning => tracing::warn!("{}", message),
            Level::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every entry in memory.
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Messages logged at exactly `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// First message at any level containing `needle`.
    pub fn find(&self, needle: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .map(|(_, m)| m)
            .find(|m| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_filters_by_level() {
        let log = MemoryLogger::new();
        log.notice("first");
        log.error("broken");
        log.notice("second");

        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.messages(Level::Error), vec!["broken".to_string()]);
        assert_eq!(log.messages(Level::Notice).len(), 2);
        assert_eq!(log.find("sec").as_deref(), Some("second"));
        assert!(log.find("missing").is_none());
    }
}
