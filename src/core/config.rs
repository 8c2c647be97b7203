//! Configuration system: TOML file + env var overrides + defaults taken from
//! the stock Raspberry Pi receiver image layout.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{OstError, Result};
use crate::daemon::rotation::DetailMode;

/// Full daemon configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub sources: SourcesConfig,
    pub paths: PathsConfig,
}

/// What is shown and where it is shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Comma-separated detail modes (`adsb`, `mesh`, `sysstat`).
    pub detail: String,
    /// Ticks spent on each detail mode before rotating.
    pub rotation_ticks: u64,
    /// I2C bus device node of the SSD1306 panel.
    pub i2c_bus: PathBuf,
    /// Run the loop without a physical panel.
    pub headless: bool,
}

/// How the loop paces itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PacingPolicy {
    /// Sleep out the remainder of the frame interval, measured from the start
    /// of the iteration. Time spent sampling is absorbed automatically.
    #[default]
    Deadline,
    /// Sleep a full frame interval after every page except `sysstat`, whose
    /// sampling window stands in for the sleep.
    Legacy,
}

/// Interval knobs. Frame cadence and the CPU sampling window are independent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub frame_interval_ms: u64,
    pub sample_window_ms: u64,
    /// Settle time before and after panel initialization.
    pub boot_delay_ms: u64,
    pub pacing: PacingPolicy,
}

/// Where every peripheral reading comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourcesConfig {
    /// 1090 MHz receiver status (`aircraft_with_pos`).
    pub stats_1090: PathBuf,
    /// 978 MHz receiver status (`aircraft_with_pos`).
    pub stats_978: PathBuf,
    /// Receiver statistics (`last1min.local.peak_signal`).
    pub detail_stats: PathBuf,
    /// Mesh tracker queue file.
    pub tracker_file: PathBuf,
    pub tracker_capacity: usize,
    pub proc_stat: PathBuf,
    pub proc_meminfo: PathBuf,
    /// Thermal zone reporting millidegrees Celsius.
    pub thermal_zone: PathBuf,
    /// Network interface whose IPv4 address is shown in the header.
    pub interface: String,
}

/// Files owned by the daemon itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    /// JSONL activity log; disabled when unset.
    pub activity_log: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            detail: "sysstat".to_string(),
            rotation_ticks: 5,
            i2c_bus: PathBuf::from("/dev/i2c-1"),
            headless: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1_000,
            sample_window_ms: 1_000,
            boot_delay_ms: 1_000,
            pacing: PacingPolicy::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            stats_1090: PathBuf::from("/usr/share/graphs1090/data-symlink/data/status.json"),
            stats_978: PathBuf::from("/usr/share/graphs1090/978-symlink/data/status.json"),
            detail_stats: PathBuf::from("/usr/share/graphs1090/data-symlink/data/stats.json"),
            tracker_file: PathBuf::from("tracker_stats.json"),
            tracker_capacity: 100,
            proc_stat: PathBuf::from("/proc/stat"),
            proc_meminfo: PathBuf::from("/proc/meminfo"),
            thermal_zone: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            interface: "wlan0".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("/etc/oled-status/config.toml"),
            activity_log: None,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    #[must_use]
    pub const fn sample_window(&self) -> Duration {
        Duration::from_millis(self.sample_window_ms)
    }

    #[must_use]
    pub const fn boot_delay(&self) -> Duration {
        Duration::from_millis(self.boot_delay_ms)
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    /// The result is not validated: callers layer command-line values on top and then call
    /// [`Config::validate`] once.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| OstError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(OstError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        Ok(cfg)
    }

    /// Deterministic FNV-1a hash of the effective config for the startup log.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// The validated detail-mode sequence.
    pub fn detail_modes(&self) -> Result<Vec<DetailMode>> {
        DetailMode::parse_list(&self.display.detail)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("OLED_STATUS_DETAIL") {
            self.display.detail = raw;
        }
        if let Some(raw) = lookup("OLED_STATUS_ROTATION_TICKS") {
            self.display.rotation_ticks = parse_env("OLED_STATUS_ROTATION_TICKS", &raw)?;
        }
        if let Some(raw) = lookup("OLED_STATUS_I2C_BUS") {
            self.display.i2c_bus = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("OLED_STATUS_HEADLESS") {
            self.display.headless = parse_env("OLED_STATUS_HEADLESS", &raw)?;
        }

        if let Some(raw) = lookup("OLED_STATUS_FRAME_INTERVAL_MS") {
            self.timing.frame_interval_ms = parse_env("OLED_STATUS_FRAME_INTERVAL_MS", &raw)?;
        }
        if let Some(raw) = lookup("OLED_STATUS_SAMPLE_WINDOW_MS") {
            self.timing.sample_window_ms = parse_env("OLED_STATUS_SAMPLE_WINDOW_MS", &raw)?;
        }
        if let Some(raw) = lookup("OLED_STATUS_PACING") {
            self.timing.pacing = match raw.as_str() {
                "deadline" => PacingPolicy::Deadline,
                "legacy" => PacingPolicy::Legacy,
                other => {
                    return Err(OstError::ConfigParse {
                        context: "env",
                        details: format!(
                            "OLED_STATUS_PACING={other:?}: expected \"deadline\" or \"legacy\""
                        ),
                    });
                }
            };
        }

        if let Some(raw) = lookup("OLED_STATUS_TRACKER_FILE") {
            self.sources.tracker_file = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("OLED_STATUS_INTERFACE") {
            self.sources.interface = raw;
        }
        if let Some(raw) = lookup("OLED_STATUS_ACTIVITY_LOG") {
            self.paths.activity_log = Some(PathBuf::from(raw));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.display.rotation_ticks == 0 {
            return Err(OstError::InvalidConfig {
                details: "display.rotation_ticks must be >= 1".to_string(),
            });
        }
        if self.timing.frame_interval_ms == 0 {
            return Err(OstError::InvalidConfig {
                details: "timing.frame_interval_ms must be > 0".to_string(),
            });
        }
        if self.timing.sample_window_ms == 0 {
            return Err(OstError::InvalidConfig {
                details: "timing.sample_window_ms must be > 0".to_string(),
            });
        }
        if self.sources.tracker_capacity == 0 {
            return Err(OstError::InvalidConfig {
                details: "sources.tracker_capacity must be >= 1".to_string(),
            });
        }
        if self.sources.interface.trim().is_empty() {
            return Err(OstError::InvalidConfig {
                details: "sources.interface must not be empty".to_string(),
            });
        }

        self.detail_modes()?;
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|error| OstError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}
