//! Read-only accessors over the ADS-B receiver's JSON status documents.
//!
//! Files are re-read on every call; the receiver daemons rewrite them in
//! place and may not have created them yet at boot.

#![allow(missing_docs)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Number, Value};

use crate::core::config::SourcesConfig;
use crate::monitor::reading::{Reading, Unavailable};

/// JSON pointer to the aircraft-with-position count in `status.json`.
pub const AIRCRAFT_WITH_POS: &str = "/aircraft_with_pos";
/// JSON pointer to the last-minute peak signal in `stats.json`.
pub const PEAK_SIGNAL: &str = "/last1min/local/peak_signal";

/// Read one numeric field, addressed by JSON pointer, from a JSON file.
pub fn read_number(path: &Path, pointer: &str) -> Reading<Number> {
    let source_name = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Unavailable::missing(source_name.clone()),
        _ => Unavailable::malformed(source_name.clone(), err),
    })?;
    let doc: Value =
        serde_json::from_str(&raw).map_err(|err| Unavailable::malformed(source_name.clone(), err))?;
    match doc.pointer(pointer) {
        Some(Value::Number(n)) => Ok(n.clone()),
        Some(other) => Err(Unavailable::malformed(
            source_name,
            format!("{pointer} is not a number: {other}"),
        )),
        None => Err(Unavailable::MissingField {
            source_name,
            field: pointer.to_string(),
        }),
    }
}

/// The three receiver figures shown on the ADS-B page.
#[derive(Debug, Clone)]
pub struct ReceiverStats {
    stats_1090: PathBuf,
    stats_978: PathBuf,
    detail_stats: PathBuf,
}

impl ReceiverStats {
    #[must_use]
    pub fn new(sources: &SourcesConfig) -> Self {
        Self {
            stats_1090: sources.stats_1090.clone(),
            stats_978: sources.stats_978.clone(),
            detail_stats: sources.detail_stats.clone(),
        }
    }

    pub fn aircraft_1090(&self) -> Reading<Number> {
        read_number(&self.stats_1090, AIRCRAFT_WITH_POS)
    }

    pub fn aircraft_978(&self) -> Reading<Number> {
        read_number(&self.stats_978, AIRCRAFT_WITH_POS)
    }

    pub fn peak_signal(&self) -> Reading<Number> {
        read_number(&self.detail_stats, PEAK_SIGNAL)
    }
}
