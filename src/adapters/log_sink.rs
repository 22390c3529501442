//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing device events to the `log` facade
//! (ESP-IDF logger on the serial console in production). Consecutive
//! identical messages are folded: the second and later copies print as
//! `"<message> (<n>)"`, so a link that stays down for minutes shows a
//! growing counter instead of a scrolling wall of text.

use log::{info, warn};

use crate::app::events::DeviceEvent;
use crate::app::ports::EventSink;

/// Tracks the last message and how many times in a row it was seen.
#[derive(Debug, Default)]
pub struct RepeatFolder {
    last: String,
    count: u32,
}

impl RepeatFolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The line to print for `message`.
    pub fn fold(&mut self, message: String) -> String {
        if self.count > 0 && message == self.last {
            self.count = self.count.saturating_add(1);
            return format!("{} ({})", message, self.count);
        }
        self.count = 1;
        self.last = message.clone();
        message
    }
}

/// Adapter that logs every [`DeviceEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    folder: RepeatFolder,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DeviceEvent) {
        let line = self.folder.fold(event.to_string());
        match event {
            DeviceEvent::HeartbeatRejected { .. }
            | DeviceEvent::HeartbeatFailed { .. } => warn!("{}", line),
            _ => info!("{}", line),
        }
    }
}
