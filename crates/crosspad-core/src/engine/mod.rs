//! Mixing engine - routing matrix, channel strips, output buses
//!
//! - [`MixerState`]: lock-free control fields shared with control surfaces
//! - [`ChunkMixer`]: Q8.8 fixed-point mix of one chunk
//! - [`MixerEngine`]: owns the state and runs the mixing thread

mod engine;
mod error;
mod mixer;
mod state;

pub use engine::*;
pub use error::{EngineError, EngineResult};
pub use mixer::{gain_to_fixed, ChunkMixer, GAIN_ONE, GAIN_SHIFT};
pub use state::*;
