//! Typed readings from peripheral data sources and the single placeholder path.
//!
//! Every accessor that talks to a file, sensor, or interface returns a
//! [`Reading`]. Failures carry a named [`Unavailable`] reason instead of a
//! magic string, and renderers turn them into display text only through
//! [`Placeholder::render`].

#![allow(missing_docs)]

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A value from a peripheral source, or the reason it could not be read.
pub type Reading<T> = std::result::Result<T, Unavailable>;

/// Why a data source produced no value this tick.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unavailable {
    #[error("source {source_name} is missing")]
    MissingSource { source_name: String },

    #[error("source {source_name} is malformed: {details}")]
    Malformed {
        source_name: String,
        details: String,
    },

    #[error("field {field} absent in {source_name}")]
    MissingField { source_name: String, field: String },

    #[error("sampling window saw no elapsed jiffies")]
    ZeroWindow,

    #[error("kernel counter {field} went backwards")]
    CounterRegression { field: usize },

    #[error("memory total reported as zero")]
    ZeroMemoryTotal,

    #[error("interface {interface} has no IPv4 address")]
    NoAddress { interface: String },
}

impl Unavailable {
    /// Short machine label used by the activity log.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingSource { .. } => "missing_source",
            Self::Malformed { .. } => "malformed",
            Self::MissingField { .. } => "missing_field",
            Self::ZeroWindow => "zero_window",
            Self::CounterRegression { .. } => "counter_regression",
            Self::ZeroMemoryTotal => "zero_memory_total",
            Self::NoAddress { .. } => "no_address",
        }
    }

    pub(crate) fn missing(source_name: impl Into<String>) -> Self {
        Self::MissingSource {
            source_name: source_name.into(),
        }
    }

    pub(crate) fn malformed(source_name: impl Into<String>, details: impl fmt::Display) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            details: details.to_string(),
        }
    }
}

/// Fixed display strings substituted for unavailable readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Aircraft counts from the receiver status files.
    AircraftCount,
    /// Peak signal, CPU/memory percentages and temperature.
    Missing,
    /// Header address line.
    Address,
    /// Absent tracker queue slot.
    TrackerSlot,
}

impl Placeholder {
    /// Literal shown on the display.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::AircraftCount => "xxx",
            Self::Missing => "None",
            Self::Address => "No IP addr",
            Self::TrackerSlot => "--",
        }
    }

    /// Format a reading with `fmt`, or this placeholder if it is unavailable.
    pub fn render<T, F>(self, reading: &Reading<T>, fmt: F) -> String
    where
        F: FnOnce(&T) -> String,
    {
        match reading {
            Ok(value) => fmt(value),
            Err(_) => self.text().to_string(),
        }
    }
}
