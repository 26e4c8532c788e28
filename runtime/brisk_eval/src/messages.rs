//! Message handler for user-visible runtime diagnostics.
//!
//! Resolution failures and built-in errors are shown to the user through the
//! editor's message line. The runtime only produces the text; where it goes is
//! chosen by the handler:
//! - Tracing: forwarded as `tracing` events (default)
//! - Buffer: captured for the editor front end or for tests
//! - Silent: discarded
//!
//! Enum dispatch, no trait objects.

use parking_lot::Mutex;

/// Severity of a runtime message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

/// Handler that forwards messages to `tracing` on target `brisk::message`.
#[derive(Default)]
pub struct TracingMessageHandler;

impl TracingMessageHandler {
    pub fn emit(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Info => tracing::info!(target: "brisk::message", "{text}"),
            MessageLevel::Error => tracing::warn!(target: "brisk::message", "{text}"),
        }
    }
}

/// Handler that keeps every message.
pub struct BufferMessageHandler {
    lines: Mutex<Vec<(MessageLevel, String)>>,
}

impl BufferMessageHandler {
    pub fn new() -> Self {
        BufferMessageHandler {
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn emit(&self, level: MessageLevel, text: &str) {
        self.lines.lock().push((level, text.to_owned()));
    }

    /// Captured messages, oldest first.
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.lines.lock().clone()
    }

    /// The most recent message text.
    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().map(|(_, text)| text.clone())
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Default for BufferMessageHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub enum MessageHandler {
    Tracing(TracingMessageHandler),
    Buffer(BufferMessageHandler),
    Silent,
}

impl MessageHandler {
    pub fn emit(&self, level: MessageLevel, text: &str) {
        match self {
            Self::Tracing(h) => h.emit(level, text),
            Self::Buffer(h) => h.emit(level, text),
            Self::Silent => {}
        }
    }

    #[inline]
    pub fn info(&self, text: &str) {
        self.emit(MessageLevel::Info, text);
    }

    #[inline]
    pub fn error(&self, text: &str) {
        self.emit(MessageLevel::Error, text);
    }

    /// Captured messages; empty for handlers that do not capture.
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        match self {
            Self::Buffer(h) => h.messages(),
            Self::Tracing(_) | Self::Silent => Vec::new(),
        }
    }

    /// The most recent captured message text.
    pub fn last(&self) -> Option<String> {
        match self {
            Self::Buffer(h) => h.last(),
            Self::Tracing(_) | Self::Silent => None,
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Handler shared between the runtime and the editor front end.
#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedMessageHandler shared with the front end"
)]
pub type SharedMessageHandler = std::sync::Arc<MessageHandler>;

#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedMessageHandler"
)]
pub fn tracing_handler() -> SharedMessageHandler {
    std::sync::Arc::new(MessageHandler::Tracing(TracingMessageHandler))
}

/// Create a capturing handler.
#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedMessageHandler"
)]
pub fn buffer_handler() -> SharedMessageHandler {
    std::sync::Arc::new(MessageHandler::Buffer(BufferMessageHandler::new()))
}

#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedMessageHandler"
)]
pub fn silent_handler() -> SharedMessageHandler {
    std::sync::Arc::new(MessageHandler::Silent)
}
