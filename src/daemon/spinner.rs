//! Liveness spinner with a temperature reading cached per glyph cycle.

#![allow(missing_docs)]

use crate::monitor::reading::Reading;
use crate::monitor::temperature::TemperatureProbe;

/// Glyph cycle shown in the footer.
pub const GLYPHS: [char; 8] = ['|', '/', '-', '\\', '|', '/', '-', '\\'];

/// What the footer shows for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerFrame {
    pub glyph: char,
    pub temperature: Reading<f64>,
    /// The temperature was re-read on this tick.
    pub resampled: bool,
}

/// Footer state: glyph index and the temperature cached for the current cycle.
///
/// The sensor is read once at construction and then again only when the
/// index wraps back to the first glyph after a completed cycle, so the value
/// on screen is stable for eight ticks at a time.
pub struct Spinner {
    probe: TemperatureProbe,
    index: usize,
    temperature: Reading<f64>,
}

impl Spinner {
    pub fn new(probe: TemperatureProbe) -> Self {
        let temperature = probe.sample();
        Self {
            probe,
            index: 0,
            temperature,
        }
    }

    /// Produce this tick's glyph and temperature, then advance.
    pub fn advance(&mut self) -> SpinnerFrame {
        let mut resampled = false;
        if self.index == GLYPHS.len() {
            self.index = 0;
            self.temperature = self.probe.sample();
            resampled = true;
        }
        let glyph = GLYPHS[self.index];
        self.index += 1;
        SpinnerFrame {
            glyph,
            temperature: self.temperature.clone(),
            resampled,
        }
    }

    /// Temperature currently on screen.
    #[must_use]
    pub const fn cached_temperature(&self) -> &Reading<f64> {
        &self.temperature
    }
}
