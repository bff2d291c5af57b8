use std::cell::RefCell;

/// Record terminator used by [`MemoryLogger`]: the platform's line ending.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Record terminator used by [`MemoryLogger`]: the platform's line ending.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Minimal logging capability consumed by [`LogBroadcaster`](crate::LogBroadcaster).
///
/// Only the `info` severity is used. Formatting and storage belong to the
/// implementation; in particular the sink decides how records are terminated.
pub trait Logger {
    fn info(&self, message: &str);
}

/// Forwards records to `tracing` at `INFO` level, target `herald::events`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "herald::events", "{message}");
    }
}

/// In-memory sink writing raw records, one per line.
///
/// Useful in tests: every record is stored as `message` followed by
/// [`LINE_ENDING`].
#[derive(Debug, Default)]
pub struct MemoryLogger {
    data: RefCell<String>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn data(&self) -> String {
        self.data.borrow().clone()
    }

    /// Recorded lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.data.borrow().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.data.borrow_mut().clear();
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        let mut data = self.data.borrow_mut();
        data.push_str(message);
        data.push_str(LINE_ENDING);
    }
}
