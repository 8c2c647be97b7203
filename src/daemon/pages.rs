//! Per-mode page bodies and the persistent header/footer lines.
//!
//! Each [`DetailMode`] maps to exactly one render function through
//! [`page_for`]; the match is exhaustive so a new mode cannot be added
//! without a page.

#![allow(missing_docs)]

use std::path::Path;

use crate::daemon::rotation::DetailMode;
use crate::daemon::spinner::SpinnerFrame;
use crate::monitor::json_stats::ReceiverStats;
use crate::monitor::reading::{Placeholder, Reading, Unavailable};
use crate::monitor::stat_sampler::{StatSampler, SysStats};
use crate::tracker::queue::TrackerQueue;

/// Address header.
pub const HEADER_ROW: usize = 0;
/// First page body row.
pub const BODY_FIRST_ROW: usize = 2;
/// Temperature and spinner.
pub const FOOTER_ROW: usize = 6;

/// Tracker entries shown on the mesh page.
pub const MESH_SLOTS: usize = 6;
const MESH_PER_LINE: usize = 3;
const MESH_SEPARATOR: &str = " - ";

/// Everything a page may read. Only `MainLoop` builds one.
pub struct PageInputs<'a> {
    pub sampler: &'a StatSampler,
    pub receiver: &'a ReceiverStats,
    pub tracker: &'a mut TrackerQueue,
    pub tracker_file: &'a Path,
}

/// Lines for rows `BODY_FIRST_ROW..`, plus the outcome of every source read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBody {
    pub lines: Vec<String>,
    pub sources: Vec<SourceOutcome>,
}

/// Whether one named source produced a value this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub source: &'static str,
    pub failure: Option<Unavailable>,
}

impl SourceOutcome {
    pub fn of<T>(source: &'static str, reading: &Reading<T>) -> Self {
        Self {
            source,
            failure: reading.as_ref().err().cloned(),
        }
    }
}

pub type PageFn = fn(&mut PageInputs<'_>) -> PageBody;

/// The render function for `mode`.
#[must_use]
pub fn page_for(mode: DetailMode) -> PageFn {
    match mode {
        DetailMode::AdsbStats => adsb_page,
        DetailMode::MeshStats => mesh_page,
        DetailMode::SysStat => sysstat_page,
    }
}

fn adsb_page(inputs: &mut PageInputs<'_>) -> PageBody {
    let count_1090 = inputs.receiver.aircraft_1090();
    let count_978 = inputs.receiver.aircraft_978();
    let peak = inputs.receiver.peak_signal();
    PageBody {
        lines: vec![
            format!(
                "1090 aircraft: {}",
                Placeholder::AircraftCount.render(&count_1090, ToString::to_string)
            ),
            format!(
                "978 aircraft: {}",
                Placeholder::AircraftCount.render(&count_978, ToString::to_string)
            ),
            format!(
                "Peak RSSI: {}",
                Placeholder::Missing.render(&peak, ToString::to_string)
            ),
        ],
        sources: vec![
            SourceOutcome::of("stats_1090", &count_1090),
            SourceOutcome::of("stats_978", &count_978),
            SourceOutcome::of("detail_stats", &peak),
        ],
    }
}

fn mesh_page(inputs: &mut PageInputs<'_>) -> PageBody {
    let loaded = inputs.tracker.load_from_file(inputs.tracker_file);
    PageBody {
        lines: mesh_lines(inputs.tracker),
        sources: vec![SourceOutcome::of("tracker", &loaded)],
    }
}

/// The six most recent tracker entries as exactly two lines.
#[must_use]
pub fn mesh_lines(queue: &TrackerQueue) -> Vec<String> {
    let slots: Vec<String> = (0..MESH_SLOTS).map(|i| queue.format_entry(i)).collect();
    slots
        .chunks(MESH_PER_LINE)
        .map(|chunk| chunk.join(MESH_SEPARATOR))
        .collect()
}

fn sysstat_page(inputs: &mut PageInputs<'_>) -> PageBody {
    let stats = inputs.sampler.sample();
    let pct = |pick: fn(&SysStats) -> f64| {
        Placeholder::Missing.render(&stats, |s| format!("{}%", truncate_pct(pick(s))))
    };
    PageBody {
        lines: vec![
            format!("CPU load: {}", pct(|s| s.cpu_load_pct)),
            format!("IOwait: {}", pct(|s| s.iowait_pct)),
            format!("Avail memory: {}", pct(|s| s.mem_avail_pct)),
        ],
        sources: vec![SourceOutcome::of("sysstat", &stats)],
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_pct(value: f64) -> i64 {
    value.trunc() as i64
}

/// Row 0: `IP: <address>`.
#[must_use]
pub fn header_line(address: &Reading<String>) -> String {
    format!("IP: {}", Placeholder::Address.render(address, Clone::clone))
}

/// Row 6: `Temp: <t>    <glyph>`.
#[must_use]
pub fn footer_line(frame: &SpinnerFrame) -> String {
    format!(
        "Temp: {}    {}",
        Placeholder::Missing.render(&frame.temperature, |t| format!("{t:.1}")),
        frame.glyph
    )
}
