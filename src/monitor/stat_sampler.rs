//! CPU load, iowait and available-memory percentages from two kernel counter
//! snapshots taken one sampling window apart.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::core::clock::Sleeper;
use crate::monitor::reading::{Reading, Unavailable};
use crate::platform::pal::{CPU_IDLE_FIELD, CPU_IOWAIT_FIELD, CpuCounters, Platform};

/// One complete system sample. Never partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SysStats {
    pub cpu_load_pct: f64,
    pub iowait_pct: f64,
    pub mem_avail_pct: f64,
}

/// CPU share derived from a counter delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuShare {
    pub load_pct: f64,
    pub iowait_pct: f64,
}

/// Two-snapshot sampler over the platform's kernel counters.
pub struct StatSampler {
    platform: Arc<dyn Platform>,
    sleeper: Arc<dyn Sleeper>,
    window: Duration,
}

impl StatSampler {
    #[must_use]
    pub fn new(platform: Arc<dyn Platform>, sleeper: Arc<dyn Sleeper>, window: Duration) -> Self {
        Self {
            platform,
            sleeper,
            window,
        }
    }

    /// The wait between the two counter snapshots.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Take a full sample. Blocks for the sampling window.
    ///
    /// Any failure along the way makes the whole triple unavailable.
    pub fn sample(&self) -> Reading<SysStats> {
        let before = self.platform.cpu_counters()?;
        self.sleeper.sleep(self.window);
        let after = self.platform.cpu_counters()?;
        let cpu = cpu_share(&before, &after)?;
        let mem_avail_pct = self.platform.memory_snapshot()?.available_pct()?;
        Ok(SysStats {
            cpu_load_pct: cpu.load_pct,
            iowait_pct: cpu.iowait_pct,
            mem_avail_pct,
        })
    }
}

/// Compute load and iowait percentages from two counter snapshots.
pub fn cpu_share(before: &CpuCounters, after: &CpuCounters) -> Reading<CpuShare> {
    if before.fields.len() != after.fields.len() {
        return Err(Unavailable::malformed(
            "stat",
            format!(
                "counter count changed between snapshots ({} -> {})",
                before.fields.len(),
                after.fields.len()
            ),
        ));
    }

    let mut deltas = Vec::with_capacity(after.fields.len());
    for (field, (old, new)) in before.fields.iter().zip(&after.fields).enumerate() {
        let delta = new
            .checked_sub(*old)
            .ok_or(Unavailable::CounterRegression { field })?;
        deltas.push(delta);
    }

    let total: u64 = deltas.iter().sum();
    if total == 0 {
        return Err(Unavailable::ZeroWindow);
    }
    let (Some(idle), Some(iowait)) = (deltas.get(CPU_IDLE_FIELD), deltas.get(CPU_IOWAIT_FIELD))
    else {
        return Err(Unavailable::malformed("stat", "cpu line lacks idle/iowait"));
    };

    let total = total as f64;
    Ok(CpuShare {
        load_pct: 100.0 - (*idle as f64 / total) * 100.0,
        iowait_pct: (*iowait as f64 / total) * 100.0,
    })
}
