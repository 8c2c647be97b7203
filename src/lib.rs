#![forbid(unsafe_code)]

//! oled_status: status-display daemon for single-board computers.
//!
//! Samples CPU load, memory, board temperature, ADS-B receiver statistics and
//! mesh tracker entries, and renders a rotating set of text pages onto a
//! 128×64 monochrome OLED:
//! 1. **Header**: the IPv4 address of the configured interface
//! 2. **Page body**: `adsb`, `mesh` or `sysstat`, rotated every few ticks
//! 3. **Footer**: board temperature and a liveness spinner
//!
//! # Library usage
//!
//! ```rust,no_run
//! use oled_status::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use oled_status::core::config::Config;
//! use oled_status::daemon::rotation::{DetailMode, ModeRotator};
//! ```

pub mod prelude;

pub mod core;
pub mod daemon;
pub mod display;
pub mod logger;
pub mod monitor;
pub mod platform;
pub mod tracker;
