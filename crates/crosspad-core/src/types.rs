//! Common types for the CrossPad mixer
//!
//! Input/output identifiers, fixed channel counts and the interleaved
//! stereo sample helpers shared by the engine and the device adapters.

/// Default processing sample rate when no output device reports one
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Number of mixer inputs (IN1, IN2, SYNTH)
pub const NUM_INPUTS: usize = 3;

/// Number of mixer output buses (OUT1, OUT2)
pub const NUM_OUTPUTS: usize = 2;

/// Number of hardware capture inputs (IN1, IN2)
pub const NUM_CAPTURE_INPUTS: usize = 2;

/// Frames processed per mixer iteration
pub const CHUNK_FRAMES: usize = 256;

/// Samples per frame (interleaved stereo)
pub const CHANNELS: usize = 2;

/// Audio sample type for the whole pipeline (signed 16-bit PCM)
pub type Sample = i16;

/// Mixer input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum MixerInput {
    In1 = 0,
    In2 = 1,
    Synth = 2,
}

impl MixerInput {
    /// All inputs in matrix order
    pub const ALL: [MixerInput; NUM_INPUTS] = [MixerInput::In1, MixerInput::In2, MixerInput::Synth];

    /// Convert from index (0-2) to an input
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(MixerInput::In1),
            1 => Some(MixerInput::In2),
            2 => Some(MixerInput::Synth),
            _ => None,
        }
    }

    /// Matrix index of this input
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            MixerInput::In1 => "IN1",
            MixerInput::In2 => "IN2",
            MixerInput::Synth => "SYNTH",
        }
    }

    /// Parse a case-insensitive name ("in1", "IN2", "synth", "syn")
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "in1" | "1" => Some(MixerInput::In1),
            "in2" | "2" => Some(MixerInput::In2),
            "synth" | "syn" => Some(MixerInput::Synth),
            _ => None,
        }
    }
}

impl std::fmt::Display for MixerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mixer output bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum MixerOutput {
    Out1 = 0,
    Out2 = 1,
}

impl MixerOutput {
    /// All outputs in matrix order
    pub const ALL: [MixerOutput; NUM_OUTPUTS] = [MixerOutput::Out1, MixerOutput::Out2];

    /// Convert from index (0-1) to an output
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(MixerOutput::Out1),
            1 => Some(MixerOutput::Out2),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            MixerOutput::Out1 => "OUT1",
            MixerOutput::Out2 => "OUT2",
        }
    }

    /// Parse a case-insensitive name ("out1", "OUT2")
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "out1" => Some(MixerOutput::Out1),
            "out2" => Some(MixerOutput::Out2),
            _ => None,
        }
    }
}

impl std::fmt::Display for MixerOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Peak absolute magnitude per channel of an interleaved stereo buffer
///
/// `i16::MIN` saturates to `i16::MAX`. A trailing odd sample is ignored.
pub fn stereo_peak(samples: &[Sample]) -> (Sample, Sample) {
    let mut max_l: Sample = 0;
    let mut max_r: Sample = 0;
    for frame in samples.chunks_exact(CHANNELS) {
        max_l = max_l.max(frame[0].saturating_abs());
        max_r = max_r.max(frame[1].saturating_abs());
    }
    (max_l, max_r)
}
