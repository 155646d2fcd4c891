//! Build-log notices
//!
//! Informational lines meant for the person reading the build output, as
//! opposed to the diagnostic `tracing` events emitted throughout the crate.

use std::fmt::Debug;
use tracing::info;

/// Destination for build-log notices
pub trait NoticeSink: Send + Sync + Debug {
    fn notice(&self, message: &str);
}

/// Writes notices as `info` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn notice(&self, message: &str) {
        info!("{}", message);
    }
}

/// Keeps notices in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl NoticeSink for RecordingSink {
    fn notice(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
