//! Core types: errors, configuration, timing seams.

pub mod clock;
pub mod config;
pub mod errors;
