//! Main render loop: one page per tick, composed and flushed under the display lock.
//!
//! Single thread, blocking reads and sleeps only. Each iteration:
//! 1. `ModeRotator::tick` picks the page
//! 2. clear, header, page body and spinner footer are drawn while holding the
//!    display lock, then the frame is flushed
//! 3. the lock is released and the pacer sleeps until the next frame
//!
//! Peripheral data failures become placeholder text. A display flush failure
//! is the only runtime error and ends the loop.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::clock::{Clock, MonotonicClock, Sleeper, ThreadSleeper};
use crate::core::config::Config;
use crate::core::errors::Result;
use crate::daemon::pacing::pause_after;
use crate::daemon::pages::{
    BODY_FIRST_ROW, FOOTER_ROW, HEADER_ROW, PageInputs, SourceOutcome, footer_line, header_line,
    page_for,
};
use crate::daemon::rotation::{DetailMode, ModeRotator};
use crate::daemon::spinner::Spinner;
use crate::display::frame::{RenderContext, TEXT_ROWS};
use crate::display::renderer::DisplayRenderer;
use crate::display::sink::DisplaySink;
use crate::logger::ActivityLog;
use crate::logger::jsonl::JsonlConfig;
use crate::monitor::json_stats::ReceiverStats;
use crate::monitor::stat_sampler::StatSampler;
use crate::monitor::temperature::TemperatureProbe;
use crate::platform::pal::{Platform, detect_platform};
use crate::tracker::queue::TrackerQueue;

/// Banner drawn on row 0 before the first tick.
pub const BOOT_BANNER: &str = "Booting...";

/// How much the loop reports on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    /// Also print every composed frame.
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Booting,
    Running,
}

/// Collaborators the loop is built from. Tests swap in mocks.
pub struct LoopParts {
    pub platform: Arc<dyn Platform>,
    pub sleeper: Arc<dyn Sleeper>,
    pub clock: Arc<dyn Clock>,
    /// `None` runs headless.
    pub sink: Option<Box<dyn DisplaySink>>,
    pub activity: ActivityLog,
    pub verbosity: Verbosity,
}

impl LoopParts {
    /// Real platform, wall-clock timing and the configured activity log.
    ///
    /// The display sink is left for the caller to attach.
    pub fn system(config: &Config, verbosity: Verbosity) -> Result<Self> {
        let activity = config
            .paths
            .activity_log
            .as_ref()
            .map_or_else(ActivityLog::disabled, |path| {
                ActivityLog::open(JsonlConfig::at(path))
            });
        Ok(Self {
            platform: detect_platform(&config.sources)?,
            sleeper: Arc::new(ThreadSleeper),
            clock: Arc::new(MonotonicClock::default()),
            sink: None,
            activity,
            verbosity,
        })
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn DisplaySink>) -> Self {
        self.sink = Some(sink);
        self
    }
}

/// What one iteration put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    pub mode: DetailMode,
    /// Composed text per row, independent of whether a panel is attached.
    pub rows: Vec<Option<String>>,
    /// Sleep taken after the frame.
    pub pause: Duration,
}

impl FrameReport {
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.as_deref())
    }
}

pub struct MainLoop {
    config: Config,
    platform: Arc<dyn Platform>,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    display: Mutex<DisplayRenderer>,
    interrupt_lock: Arc<Mutex<()>>,
    rotator: ModeRotator,
    spinner: Spinner,
    sampler: StatSampler,
    receiver: ReceiverStats,
    tracker: TrackerQueue,
    activity: ActivityLog,
    /// Sources whose last read failed.
    unavailable: HashMap<&'static str, bool>,
    state: LoopState,
    verbosity: Verbosity,
}

impl MainLoop {
    /// Validate the detail list and wire the loop. Reads the temperature once.
    pub fn new(config: Config, parts: LoopParts) -> Result<Self> {
        let rotator = ModeRotator::new(config.detail_modes()?, config.display.rotation_ticks)?;
        let ctx = RenderContext::default();
        let renderer = match parts.sink {
            Some(sink) => DisplayRenderer::new(ctx, sink),
            None => DisplayRenderer::headless(ctx),
        };
        let sampler = StatSampler::new(
            Arc::clone(&parts.platform),
            Arc::clone(&parts.sleeper),
            config.timing.sample_window(),
        );
        let spinner = Spinner::new(TemperatureProbe::new(Arc::clone(&parts.platform)));
        let receiver = ReceiverStats::new(&config.sources);
        let tracker = TrackerQueue::new(config.sources.tracker_capacity);

        Ok(Self {
            platform: parts.platform,
            sleeper: parts.sleeper,
            clock: parts.clock,
            display: Mutex::new(renderer),
            interrupt_lock: Arc::new(Mutex::new(())),
            rotator,
            spinner,
            sampler,
            receiver,
            tracker,
            activity: parts.activity,
            unavailable: HashMap::new(),
            state: LoopState::Booting,
            verbosity: parts.verbosity,
            config,
        })
    }

    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn modes(&self) -> &[DetailMode] {
        self.rotator.modes()
    }

    /// The display session lock. Held for the whole clear-to-flush span of
    /// every frame.
    #[must_use]
    pub const fn display_lock(&self) -> &Mutex<DisplayRenderer> {
        &self.display
    }

    /// Lock reserved for an out-of-band writer (alerts, interrupt messages).
    /// The render loop never takes it.
    #[must_use]
    pub fn interrupt_lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.interrupt_lock)
    }

    /// Draw the boot banner and enter the running state.
    pub fn boot(&mut self) -> Result<()> {
        let config_hash = self.config.stable_hash().unwrap_or_default();
        let sink_name = {
            let mut display = self.display.lock();
            display.clear();
            display.write_line(HEADER_ROW, BOOT_BANNER);
            display.flush()?;
            display.sink_name()
        };
        self.activity
            .daemon_start(self.rotator.modes(), &config_hash, sink_name);
        if self.verbosity > Verbosity::Quiet {
            let tokens: Vec<&str> = self.rotator.modes().iter().map(|m| m.token()).collect();
            eprintln!(
                "[OST-DAEMON] started v{} modes={} sink={sink_name} pacing={:?} config_hash={config_hash}",
                env!("CARGO_PKG_VERSION"),
                tokens.join(","),
                self.config.timing.pacing,
            );
        }
        self.sleeper.sleep(self.config.timing.boot_delay());
        self.state = LoopState::Running;
        Ok(())
    }

    /// Render one frame and pace to the next.
    pub fn run_once(&mut self) -> Result<FrameReport> {
        let started = self.clock.now();
        let mut rows: Vec<Option<String>> = vec![None; TEXT_ROWS];
        let mut outcomes = Vec::with_capacity(5);
        let (mode, tick) = {
            let mut display = self.display.lock();
            let previous = self.rotator.current();
            let mode = self.rotator.tick();
            let tick = self.rotator.ticks();
            if mode != previous {
                self.activity.mode_change(tick, previous, mode);
            }
            display.clear();

            let address = self
                .platform
                .interface_address(&self.config.sources.interface);
            outcomes.push(SourceOutcome::of("address", &address));
            rows[HEADER_ROW] = Some(header_line(&address));

            let mut inputs = PageInputs {
                sampler: &self.sampler,
                receiver: &self.receiver,
                tracker: &mut self.tracker,
                tracker_file: &self.config.sources.tracker_file,
            };
            let body = page_for(mode)(&mut inputs);
            for (offset, line) in body.lines.into_iter().enumerate() {
                if let Some(slot) = rows.get_mut(BODY_FIRST_ROW + offset) {
                    *slot = Some(line);
                }
            }
            outcomes.extend(body.sources);

            let spin = self.spinner.advance();
            outcomes.push(SourceOutcome::of("temperature", &spin.temperature));
            rows[FOOTER_ROW] = Some(footer_line(&spin));

            for (row, text) in rows.iter().enumerate() {
                if let Some(text) = text {
                    display.write_line(row, text);
                }
            }
            if let Err(err) = display.flush() {
                self.activity.display_fault(tick, &err);
                return Err(err);
            }
            (mode, tick)
        };

        self.track_sources(tick, &outcomes);
        if self.verbosity >= Verbosity::Verbose {
            let text: Vec<&str> = rows.iter().flatten().map(String::as_str).collect();
            eprintln!("[OST-DAEMON] tick={tick} mode={mode} | {}", text.join(" | "));
        }

        let elapsed = self.clock.now().saturating_sub(started);
        let pause = pause_after(
            self.config.timing.pacing,
            mode,
            elapsed,
            self.config.timing.frame_interval(),
        );
        self.sleeper.sleep(pause);

        Ok(FrameReport {
            tick,
            mode,
            rows,
            pause,
        })
    }

    /// Boot, then render forever. Returns only on a display fault.
    pub fn run(&mut self) -> Result<()> {
        if self.state == LoopState::Booting {
            self.boot()?;
        }
        loop {
            self.run_once()?;
        }
    }

    fn track_sources(&mut self, tick: u64, outcomes: &[SourceOutcome]) {
        for outcome in outcomes {
            let was_down = self
                .unavailable
                .insert(outcome.source, outcome.failure.is_some())
                .unwrap_or(false);
            match (&outcome.failure, was_down) {
                (Some(reason), false) => {
                    self.activity
                        .source_unavailable(tick, outcome.source, reason);
                    if self.verbosity > Verbosity::Quiet {
                        eprintln!(
                            "[OST-DAEMON] source {} unavailable: {reason}",
                            outcome.source
                        );
                    }
                }
                (None, true) => {
                    self.activity.source_recovered(tick, outcome.source);
                    if self.verbosity > Verbosity::Quiet {
                        eprintln!("[OST-DAEMON] source {} recovered", outcome.source);
                    }
                }
                _ => {}
            }
        }
    }
}
