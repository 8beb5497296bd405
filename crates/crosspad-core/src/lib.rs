//! CrossPad Core - real-time audio mixing and routing engine
//!
//! Three inputs (IN1, IN2, SYNTH) are mixed into two stereo output buses
//! (OUT1, OUT2) through a 3×2 routing matrix on a dedicated mixing thread.

pub mod audio;
pub mod config;
pub mod control;
pub mod engine;
pub mod persist;
pub mod types;

pub use types::*;
