//! Frame pacing between render iterations.

use std::time::Duration;

use crate::core::config::PacingPolicy;
use crate::daemon::rotation::DetailMode;

/// How long to wait after an iteration that rendered `mode` and took `elapsed`.
#[must_use]
pub fn pause_after(
    policy: PacingPolicy,
    mode: DetailMode,
    elapsed: Duration,
    interval: Duration,
) -> Duration {
    match policy {
        PacingPolicy::Deadline => interval.saturating_sub(elapsed),
        PacingPolicy::Legacy if mode == DetailMode::SysStat => Duration::ZERO,
        PacingPolicy::Legacy => interval,
    }
}
