//! Board temperature probe.

use std::sync::Arc;

use crate::monitor::reading::Reading;
use crate::platform::pal::Platform;

/// Reads one instantaneous temperature value in degrees Celsius.
pub struct TemperatureProbe {
    platform: Arc<dyn Platform>,
}

impl TemperatureProbe {
    /// Probe backed by the platform's thermal zone.
    #[must_use]
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Current temperature.
    pub fn sample(&self) -> Reading<f64> {
        self.platform.temperature_celsius()
    }
}
