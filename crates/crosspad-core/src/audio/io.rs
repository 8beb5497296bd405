//! Source and sink interfaces consumed by the mixer thread
//!
//! All buffers are interleaved stereo `i16` (L, R, L, R, ...). Frame counts
//! are always whole frames: a buffer of `n` samples holds `n / 2` frames.

use crate::types::Sample;

/// Hardware capture input (IN1/IN2)
pub trait CaptureSource: Send {
    /// Fill `dest` with up to `dest.len() / 2` frames
    ///
    /// Returns the number of whole frames actually delivered. The mixer
    /// zero-fills whatever was not delivered.
    fn read(&mut self, dest: &mut [Sample]) -> usize;
}

/// Output bus sink (OUT1/OUT2)
pub trait PlaybackSink: Send {
    /// Accept up to `frames.len() / 2` frames, returning how many were taken
    fn write(&mut self, frames: &[Sample]) -> usize;

    /// Current device sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Whether the underlying device stream is open
    fn is_open(&self) -> bool;
}

/// Pull-based synthesizer voice engine
pub trait SynthProcessor: Send {
    /// Render exactly `dest.len() / 2` frames into `dest`
    fn process(&mut self, dest: &mut [Sample]);
}
