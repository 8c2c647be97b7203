//! PAL trait and platform implementations (Linux `/proc` + sysfs, and a mock).

#![allow(missing_docs)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::config::SourcesConfig;
use crate::core::errors::{OstError, Result};
use crate::monitor::reading::{Reading, Unavailable};

/// Index of the idle column in the `cpu` aggregate line (label excluded).
pub const CPU_IDLE_FIELD: usize = 3;
/// Index of the iowait column in the `cpu` aggregate line (label excluded).
pub const CPU_IOWAIT_FIELD: usize = 4;

/// One snapshot of the kernel `cpu` aggregate counters, in jiffies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CpuCounters {
    /// user, nice, system, idle, iowait, irq, softirq, steal, ...
    pub fields: Vec<u64>,
}

/// Memory figures in kB as reported by meminfo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub free_kb: u64,
    pub cached_kb: u64,
}

impl MemorySnapshot {
    /// `(free + cached) / total * 100`.
    pub fn available_pct(&self) -> Reading<f64> {
        if self.total_kb == 0 {
            return Err(Unavailable::ZeroMemoryTotal);
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = (self.free_kb.saturating_add(self.cached_kb) as f64 / self.total_kb as f64)
            * 100.0;
        Ok(pct)
    }
}

/// OS abstraction used by the samplers and the header line.
///
/// Every method is a blocking read with no timeout.
pub trait Platform: Send + Sync {
    fn cpu_counters(&self) -> Reading<CpuCounters>;
    fn memory_snapshot(&self) -> Reading<MemorySnapshot>;
    fn temperature_celsius(&self) -> Reading<f64>;
    fn interface_address(&self, interface: &str) -> Reading<String>;
}

/// Linux platform implementation using `/proc`, sysfs and `getifaddrs`.
#[derive(Debug, Clone)]
pub struct LinuxPlatform {
    proc_stat: PathBuf,
    proc_meminfo: PathBuf,
    thermal_zone: PathBuf,
}

impl Default for LinuxPlatform {
    fn default() -> Self {
        Self::new(&SourcesConfig::default())
    }
}

impl LinuxPlatform {
    #[must_use]
    pub fn new(sources: &SourcesConfig) -> Self {
        Self {
            proc_stat: sources.proc_stat.clone(),
            proc_meminfo: sources.proc_meminfo.clone(),
            thermal_zone: sources.thermal_zone.clone(),
        }
    }
}

impl Platform for LinuxPlatform {
    fn cpu_counters(&self) -> Reading<CpuCounters> {
        let raw = read_source(&self.proc_stat)?;
        parse_cpu_line(&raw)
            .map_err(|err| Unavailable::malformed(display_name(&self.proc_stat), err))
    }

    fn memory_snapshot(&self) -> Reading<MemorySnapshot> {
        let raw = read_source(&self.proc_meminfo)?;
        parse_meminfo(&raw)
            .map_err(|err| Unavailable::malformed(display_name(&self.proc_meminfo), err))
    }

    fn temperature_celsius(&self) -> Reading<f64> {
        let raw = read_source(&self.thermal_zone)?;
        parse_millidegrees(&raw)
            .map_err(|err| Unavailable::malformed(display_name(&self.thermal_zone), err))
    }

    fn interface_address(&self, interface: &str) -> Reading<String> {
        ipv4_for_interface(interface)
    }
}

#[cfg(unix)]
fn ipv4_for_interface(interface: &str) -> Reading<String> {
    let addrs = nix::ifaddrs::getifaddrs().map_err(|err| Unavailable::malformed("getifaddrs", err))?;
    addrs
        .filter(|ifaddr| ifaddr.interface_name == interface)
        .find_map(|ifaddr| {
            let sin = ifaddr.address?.as_sockaddr_in().copied()?;
            Some(std::net::Ipv4Addr::from(sin.ip()).to_string())
        })
        .ok_or_else(|| Unavailable::NoAddress {
            interface: interface.to_string(),
        })
}

#[cfg(not(unix))]
fn ipv4_for_interface(interface: &str) -> Reading<String> {
    Err(Unavailable::NoAddress {
        interface: interface.to_string(),
    })
}

/// In-memory mock implementation for deterministic tests.
///
/// CPU snapshots are consumed in order; once the script runs dry the last
/// snapshot repeats. Temperature and address can be changed between ticks.
#[derive(Debug, Default)]
pub struct MockPlatform {
    cpu_script: Mutex<VecDeque<Reading<CpuCounters>>>,
    last_cpu: Mutex<Option<Reading<CpuCounters>>>,
    memory: Mutex<Option<MemorySnapshot>>,
    temperature: Mutex<Option<f64>>,
    addresses: Mutex<HashMap<String, String>>,
    temperature_reads: Mutex<u64>,
}

impl MockPlatform {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_cpu(&self, fields: &[u64]) {
        self.cpu_script.lock().push_back(Ok(CpuCounters {
            fields: fields.to_vec(),
        }));
    }

    pub fn push_cpu_failure(&self, reason: Unavailable) {
        self.cpu_script.lock().push_back(Err(reason));
    }

    pub fn set_memory(&self, memory: Option<MemorySnapshot>) {
        *self.memory.lock() = memory;
    }

    pub fn set_temperature(&self, celsius: Option<f64>) {
        *self.temperature.lock() = celsius;
    }

    pub fn set_address(&self, interface: &str, address: &str) {
        self.addresses
            .lock()
            .insert(interface.to_string(), address.to_string());
    }

    /// How many times the temperature sensor has been read.
    pub fn temperature_reads(&self) -> u64 {
        *self.temperature_reads.lock()
    }
}

impl Platform for MockPlatform {
    fn cpu_counters(&self) -> Reading<CpuCounters> {
        let next = self.cpu_script.lock().pop_front();
        let mut last = self.last_cpu.lock();
        if let Some(reading) = next {
            *last = Some(reading.clone());
            return reading;
        }
        last.clone()
            .unwrap_or_else(|| Err(Unavailable::missing("mock /proc/stat")))
    }

    fn memory_snapshot(&self) -> Reading<MemorySnapshot> {
        self.memory
            .lock()
            .ok_or_else(|| Unavailable::missing("mock /proc/meminfo"))
    }

    fn temperature_celsius(&self) -> Reading<f64> {
        *self.temperature_reads.lock() += 1;
        self.temperature
            .lock()
            .ok_or_else(|| Unavailable::missing("mock thermal zone"))
    }

    fn interface_address(&self, interface: &str) -> Reading<String> {
        self.addresses
            .lock()
            .get(interface)
            .cloned()
            .ok_or_else(|| Unavailable::NoAddress {
                interface: interface.to_string(),
            })
    }
}

/// Detect active platform implementation.
pub fn detect_platform(sources: &SourcesConfig) -> Result<Arc<dyn Platform>> {
    #[cfg(target_os = "linux")]
    {
        Ok(Arc::new(LinuxPlatform::new(sources)))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = sources;
        Err(OstError::UnsupportedPlatform {
            details: "only Linux is currently implemented".to_string(),
        })
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

fn read_source(path: &Path) -> Reading<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Unavailable::missing(display_name(path)),
        _ => Unavailable::malformed(display_name(path), err),
    })
}

/// Parse the first `cpu` aggregate line of `/proc/stat`.
fn parse_cpu_line(raw: &str) -> Result<CpuCounters> {
    let line = raw
        .lines()
        .next()
        .ok_or_else(|| OstError::CounterParse {
            source_name: "stat",
            details: "empty stat source".to_string(),
        })?;
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("cpu") => {}
        other => {
            return Err(OstError::CounterParse {
                source_name: "stat",
                details: format!("first line is not the cpu aggregate: {other:?}"),
            });
        }
    }

    let fields = parts
        .map(|raw_field| {
            raw_field.parse::<u64>().map_err(|err| OstError::CounterParse {
                source_name: "stat",
                details: format!("invalid counter {raw_field:?}: {err}"),
            })
        })
        .collect::<Result<Vec<u64>>>()?;

    if fields.len() <= CPU_IOWAIT_FIELD {
        return Err(OstError::CounterParse {
            source_name: "stat",
            details: format!("cpu line has {} counters, need at least 5", fields.len()),
        });
    }
    Ok(CpuCounters { fields })
}

fn parse_meminfo(raw: &str) -> Result<MemorySnapshot> {
    let mut values = HashMap::<&str, u64>::new();

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some((key, rest)) = line.split_once(':') else {
            return Err(OstError::CounterParse {
                source_name: "meminfo",
                details: format!("invalid meminfo line (missing ':'): {line}"),
            });
        };
        let Some(value_raw) = rest.split_whitespace().next() else {
            return Err(OstError::CounterParse {
                source_name: "meminfo",
                details: format!("missing meminfo value in line: {line}"),
            });
        };
        let value = value_raw
            .parse::<u64>()
            .map_err(|err| OstError::CounterParse {
                source_name: "meminfo",
                details: format!("invalid meminfo numeric value in line {line:?}: {err}"),
            })?;
        values.insert(key.trim(), value);
    }

    let required = |key: &str| {
        values
            .get(key)
            .copied()
            .ok_or_else(|| OstError::CounterParse {
                source_name: "meminfo",
                details: format!("missing required meminfo field: {key}"),
            })
    };

    Ok(MemorySnapshot {
        total_kb: required("MemTotal")?,
        free_kb: required("MemFree")?,
        cached_kb: required("Cached")?,
    })
}

fn parse_millidegrees(raw: &str) -> Result<f64> {
    let first = raw.lines().next().unwrap_or_default().trim();
    let milli = first.parse::<i64>().map_err(|err| OstError::CounterParse {
        source_name: "thermal",
        details: format!("invalid temperature {first:?}: {err}"),
    })?;
    #[allow(clippy::cast_precision_loss)]
    let celsius = milli as f64 / 1000.0;
    Ok(celsius)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT_SAMPLE: &str = "cpu  4705 356 584 3699176 23060 0 277 0 0 0\n\
                               cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0\n\
                               intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]\n";

    #[test]
    fn parses_cpu_aggregate_line() {
        let counters = parse_cpu_line(STAT_SAMPLE).expect("stat should parse");
        assert_eq!(counters.fields.len(), 10);
        assert_eq!(counters.fields[CPU_IDLE_FIELD], 3_699_176);
        assert_eq!(counters.fields[CPU_IOWAIT_FIELD], 23_060);
    }

    #[test]
    fn rejects_stat_without_cpu_label() {
        let err = parse_cpu_line("intr 1 2 3\n").expect_err("must reject");
        assert_eq!(err.code(), "OST-2001");
        assert!(parse_cpu_line("").is_err());
    }

    #[test]
    fn rejects_short_or_garbled_cpu_line() {
        assert!(parse_cpu_line("cpu 1 2 3\n").is_err());
        assert!(parse_cpu_line("cpu 1 2 x 4 5\n").is_err());
    }

    #[test]
    fn parses_meminfo_fields() {
        let snap = parse_meminfo(
            "MemTotal:        3884096 kB\n\
             MemFree:         2617072 kB\n\
             MemAvailable:    3381044 kB\n\
             Buffers:           52256 kB\n\
             Cached:           771864 kB\n",
        )
        .expect("meminfo should parse");
        assert_eq!(snap.total_kb, 3_884_096);
        assert_eq!(snap.free_kb, 2_617_072);
        assert_eq!(snap.cached_kb, 771_864);
    }

    #[test]
    fn meminfo_missing_cached_is_error() {
        let err = parse_meminfo("MemTotal: 100 kB\nMemFree: 50 kB\n").expect_err("must fail");
        assert!(err.to_string().contains("Cached"));
    }

    #[test]
    fn available_pct_sums_free_and_cached() {
        let snap = MemorySnapshot {
            total_kb: 1_000,
            free_kb: 250,
            cached_kb: 250,
        };
        let pct = snap.available_pct().expect("non-zero total");
        assert!((pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_memory_is_unavailable() {
        let snap = MemorySnapshot {
            total_kb: 0,
            free_kb: 0,
            cached_kb: 0,
        };
        assert_eq!(snap.available_pct(), Err(Unavailable::ZeroMemoryTotal));
    }

    #[test]
    fn parses_thermal_millidegrees() {
        let celsius = parse_millidegrees("48312\n").expect("temp should parse");
        assert!((celsius - 48.312).abs() < 1e-9);
        assert!(parse_millidegrees("hot\n").is_err());
    }

    #[test]
    fn linux_platform_reads_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let stat = dir.path().join("stat");
        let meminfo = dir.path().join("meminfo");
        let thermal = dir.path().join("temp");
        fs::write(&stat, STAT_SAMPLE).unwrap();
        fs::write(&meminfo, "MemTotal: 200 kB\nMemFree: 50 kB\nCached: 50 kB\n").unwrap();
        fs::write(&thermal, "51000\n").unwrap();

        let sources = SourcesConfig {
            proc_stat: stat,
            proc_meminfo: meminfo,
            thermal_zone: thermal,
            ..SourcesConfig::default()
        };
        let platform = LinuxPlatform::new(&sources);
        assert!(platform.cpu_counters().is_ok());
        assert_eq!(platform.memory_snapshot().unwrap().total_kb, 200);
        assert!((platform.temperature_celsius().unwrap() - 51.0).abs() < 1e-9);
    }

    #[test]
    fn linux_platform_missing_sensor_is_unavailable() {
        let sources = SourcesConfig {
            thermal_zone: PathBuf::from("/nonexistent/thermal_zone0/temp"),
            ..SourcesConfig::default()
        };
        let platform = LinuxPlatform::new(&sources);
        assert!(matches!(
            platform.temperature_celsius(),
            Err(Unavailable::MissingSource { .. })
        ));
    }

    #[test]
    fn unknown_interface_has_no_address() {
        let platform = LinuxPlatform::default();
        assert!(matches!(
            platform.interface_address("ost-test-no-such-if0"),
            Err(Unavailable::NoAddress { .. })
        ));
    }

    #[test]
    fn mock_repeats_last_cpu_snapshot() {
        let mock = MockPlatform::new();
        assert!(mock.cpu_counters().is_err());
        mock.push_cpu(&[1, 2, 3, 4, 5]);
        assert_eq!(mock.cpu_counters().unwrap().fields, vec![1, 2, 3, 4, 5]);
        assert_eq!(mock.cpu_counters().unwrap().fields, vec![1, 2, 3, 4, 5]);
    }
}
