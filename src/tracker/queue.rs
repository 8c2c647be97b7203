//! Bounded queue of recent mesh-network tracker entries, loaded read-only
//! from the tracker's persisted JSON file.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::monitor::reading::{Placeholder, Reading, Unavailable};

/// One heard node. Only `node` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerEntry {
    /// Node id, e.g. `!a1b2c3d4`.
    pub node: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub snr: Option<f64>,
    /// Unix seconds.
    #[serde(default)]
    pub last_heard: Option<i64>,
}

impl TrackerEntry {
    /// Compact label: the short name, or the last four characters of the id.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = self.short_name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return name.to_string();
        }
        let id = self.node.trim_start_matches('!');
        let skip = id.chars().count().saturating_sub(4);
        id.chars().skip(skip).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrackerFile {
    List(Vec<TrackerEntry>),
    Wrapped { entries: Vec<TrackerEntry> },
}

/// Bounded queue; oldest entries fall off the front.
#[derive(Debug, Clone)]
pub struct TrackerQueue {
    capacity: usize,
    entries: VecDeque<TrackerEntry>,
}

impl TrackerQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: TrackerEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Replace the whole queue with the file's contents (newest last in file).
    ///
    /// On failure the queue is left empty. Returns the number of entries kept.
    pub fn load_from_file(&mut self, path: &Path) -> Reading<usize> {
        self.entries.clear();
        let source_name = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => Unavailable::missing(source_name.clone()),
            _ => Unavailable::malformed(source_name.clone(), err),
        })?;
        let parsed: TrackerFile =
            serde_json::from_str(&raw).map_err(|err| Unavailable::malformed(source_name, err))?;
        let entries = match parsed {
            TrackerFile::List(entries) | TrackerFile::Wrapped { entries } => entries,
        };
        for entry in entries {
            self.push(entry);
        }
        Ok(self.entries.len())
    }

    /// The `index`-th most recent entry (0 = newest).
    #[must_use]
    pub fn nth_recent(&self, index: usize) -> Option<&TrackerEntry> {
        self.entries.iter().rev().nth(index)
    }

    /// Display text for the `index`-th most recent entry, or a placeholder.
    #[must_use]
    pub fn format_entry(&self, index: usize) -> String {
        self.nth_recent(index)
            .map_or_else(|| Placeholder::TrackerSlot.text().to_string(), TrackerEntry::label)
    }
}
