//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use oled_status::prelude::*;
//! ```

// Core
pub use crate::core::clock::{Clock, MonotonicClock, RecordingSleeper, Sleeper, ThreadSleeper};
pub use crate::core::config::{Config, PacingPolicy};
pub use crate::core::errors::{OstError, Result};

// Platform
pub use crate::platform::pal::{MockPlatform, Platform, detect_platform};

// Monitor
pub use crate::monitor::json_stats::ReceiverStats;
pub use crate::monitor::reading::{Placeholder, Reading, Unavailable};
pub use crate::monitor::stat_sampler::{StatSampler, SysStats};
pub use crate::monitor::temperature::TemperatureProbe;

// Tracker
pub use crate::tracker::queue::{TrackerEntry, TrackerQueue};

// Display
pub use crate::display::{DisplayFrame, DisplayRenderer, DisplaySink, MemorySink, RenderContext};

// Daemon
pub use crate::daemon::loop_main::{FrameReport, LoopParts, MainLoop, Verbosity};
pub use crate::daemon::rotation::{DetailMode, ModeRotator};

// Logging
pub use crate::logger::ActivityLog;
