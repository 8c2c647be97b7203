//! Detail modes and the tick-driven rotation between them.

#![allow(missing_docs)]

use serde::Serialize;

use crate::core::errors::{OstError, Result};

/// One display page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailMode {
    AdsbStats,
    MeshStats,
    SysStat,
}

impl DetailMode {
    pub const ALL: [Self; 3] = [Self::AdsbStats, Self::MeshStats, Self::SysStat];

    /// Token used in `--detail` and the config file.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::AdsbStats => "adsb",
            Self::MeshStats => "mesh",
            Self::SysStat => "sysstat",
        }
    }

    /// Exact, case-sensitive token match.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.token() == token)
    }

    /// Parse a comma-separated detail list.
    ///
    /// Unknown tokens are dropped, duplicates keep their first position, and
    /// tokens are not trimmed. An empty result is a configuration error.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        let mut modes = Vec::with_capacity(Self::ALL.len());
        for mode in raw.split(',').filter_map(Self::from_token) {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        if modes.is_empty() {
            return Err(OstError::InvalidConfig {
                details: format!(
                    "detail list {raw:?} has no recognized mode (expected adsb, mesh, sysstat)"
                ),
            });
        }
        Ok(modes)
    }
}

impl std::fmt::Display for DetailMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Ordered mode list plus a tick counter that advances it every `period` ticks.
#[derive(Debug, Clone)]
pub struct ModeRotator {
    modes: Vec<DetailMode>,
    period: u64,
    index: usize,
    ticks: u64,
}

impl ModeRotator {
    pub fn new(modes: Vec<DetailMode>, period: u64) -> Result<Self> {
        if modes.is_empty() {
            return Err(OstError::InvalidConfig {
                details: "detail list must name at least one mode".to_string(),
            });
        }
        if period == 0 {
            return Err(OstError::InvalidConfig {
                details: "display.rotation_ticks must be >= 1".to_string(),
            });
        }
        Ok(Self {
            modes,
            period,
            index: 0,
            ticks: 0,
        })
    }

    /// Build straight from the raw `--detail` string.
    pub fn from_config_str(raw: &str, period: u64) -> Result<Self> {
        Self::new(DetailMode::parse_list(raw)?, period)
    }

    /// Count one tick, rotate if the period has elapsed, and return the active mode.
    pub fn tick(&mut self) -> DetailMode {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.period == 0 {
            self.index = (self.index + 1) % self.modes.len();
        }
        self.modes[self.index]
    }

    #[must_use]
    pub fn current(&self) -> DetailMode {
        self.modes[self.index]
    }

    #[must_use]
    pub fn modes(&self) -> &[DetailMode] {
        &self.modes
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn period(&self) -> u64 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use DetailMode::{AdsbStats, MeshStats, SysStat};

    #[test]
    fn parse_filters_and_keeps_first_occurrence() {
        assert_eq!(
            DetailMode::parse_list("mesh,weather,adsb,mesh,sysstat").unwrap(),
            vec![MeshStats, AdsbStats, SysStat]
        );
        assert_eq!(DetailMode::parse_list("sysstat").unwrap(), vec![SysStat]);
    }

    #[test]
    fn parse_is_exact_match() {
        assert_eq!(DetailMode::parse_list(" adsb,mesh").unwrap(), vec![MeshStats]);
        assert!(DetailMode::parse_list("ADSB").is_err());
        assert!(DetailMode::parse_list("").is_err());
    }

    #[test]
    fn all_unknown_is_config_error() {
        let err = DetailMode::parse_list("clock,weather").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("detail"));
    }

    #[test]
    fn rotates_every_period_ticks() {
        let mut rotator = ModeRotator::new(vec![SysStat, AdsbStats], 5).unwrap();
        let seen: Vec<_> = (0..10).map(|_| rotator.tick()).collect();
        assert_eq!(&seen[..4], &[SysStat; 4]);
        assert_eq!(&seen[4..9], &[AdsbStats; 5]);
        assert_eq!(seen[9], SysStat);
        assert_eq!(rotator.ticks(), 10);
    }

    #[test]
    fn single_mode_never_moves() {
        let mut rotator = ModeRotator::from_config_str("mesh", 5).unwrap();
        for _ in 0..23 {
            assert_eq!(rotator.tick(), MeshStats);
        }
    }

    #[test]
    fn rejects_empty_modes_and_zero_period() {
        assert!(ModeRotator::new(Vec::new(), 5).is_err());
        assert!(ModeRotator::new(vec![SysStat], 0).is_err());
    }

    fn reference_filter(raw: &str) -> Vec<DetailMode> {
        let mut out = Vec::new();
        for token in raw.split(',') {
            let mode = match token {
                "adsb" => AdsbStats,
                "mesh" => MeshStats,
                "sysstat" => SysStat,
                _ => continue,
            };
            if !out.contains(&mode) {
                out.push(mode);
            }
        }
        out
    }

    fn token() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("adsb".to_string()),
            Just("mesh".to_string()),
            Just("sysstat".to_string()),
            "[a-z ]{0,8}",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn parse_matches_split_filter_dedupe(tokens in prop::collection::vec(token(), 0..8)) {
            let raw = tokens.join(",");
            let expected = reference_filter(&raw);
            match DetailMode::parse_list(&raw) {
                Ok(modes) => prop_assert_eq!(modes, expected),
                Err(err) => {
                    prop_assert!(expected.is_empty());
                    prop_assert!(err.is_config_error());
                }
            }
        }

        #[test]
        fn rotation_returns_home_after_full_cycle(n in 1usize..=3, period in 1u64..8) {
            let modes = DetailMode::ALL[..n].to_vec();
            let mut rotator = ModeRotator::new(modes.clone(), period).unwrap();
            let mut last = rotator.current();
            for _ in 0..period {
                last = rotator.tick();
            }
            prop_assert_eq!(last, modes[1 % n]);
            for _ in period..period * n as u64 {
                last = rotator.tick();
            }
            prop_assert_eq!(last, modes[0]);
        }
    }
}
