//! Daemon subsystem: detail-mode rotation, page composition, pacing and the
//! main render loop.

pub mod loop_main;
pub mod pacing;
pub mod pages;
pub mod rotation;
pub mod spinner;
