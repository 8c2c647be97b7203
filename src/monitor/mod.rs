//! Peripheral readings: kernel counters, temperature, receiver JSON status files.

pub mod json_stats;
pub mod reading;
pub mod stat_sampler;
pub mod temperature;
