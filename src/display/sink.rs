//! Display transports: where a finished frame goes on `flush`.

#![allow(missing_docs)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::errors::{OstError, Result};
use crate::display::frame::DisplayFrame;

/// A physical (or simulated) panel that accepts whole frames.
///
/// `flush_frame` is a blocking transfer with no timeout. An error is a
/// hardware fault; the caller does not retry.
pub trait DisplaySink: Send {
    fn flush_frame(&mut self, frame: &DisplayFrame) -> Result<()>;

    /// Short transport name for diagnostics.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct MemoryLog {
    frames: Vec<DisplayFrame>,
    fail_at: Option<usize>,
}

/// Sink that keeps every flushed frame in memory.
///
/// Clones share the same log, so a test can keep one handle while the
/// renderer owns the other.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    log: Arc<Mutex<MemoryLog>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `nth` flush (0-based, counting from now) fail as a transport fault.
    pub fn fail_on_flush(&self, nth: usize) {
        let mut log = self.log.lock();
        log.fail_at = Some(log.frames.len() + nth);
    }

    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.log.lock().frames.len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<DisplayFrame> {
        self.log.lock().frames.last().cloned()
    }

    #[must_use]
    pub fn frame(&self, index: usize) -> Option<DisplayFrame> {
        self.log.lock().frames.get(index).cloned()
    }
}

impl DisplaySink for MemorySink {
    fn flush_frame(&mut self, frame: &DisplayFrame) -> Result<()> {
        let mut log = self.log.lock();
        if log.fail_at == Some(log.frames.len()) {
            log.fail_at = None;
            return Err(OstError::Display {
                operation: "flush",
                details: "simulated transport fault".to_string(),
            });
        }
        log.frames.push(frame.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
