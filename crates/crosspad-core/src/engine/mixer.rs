//! Fixed-point chunk mixer
//!
//! Sums the three input channels into the two output buses using Q8.8
//! integer gains, so a given set of inputs and controls always produces the
//! same output bits on every platform.
//!
//! Per chunk:
//! 1. Per-input peak (pre-gain, independent of mute/solo/routing)
//! 2. Solo resolution (once)
//! 3. Accumulators cleared
//! 4. Every unmuted, solo-eligible channel is added to each enabled route:
//!    `acc += (sample * gain_fp) >> 8`, `gain_fp = channel_vol * route_vol * 256`
//! 5. Output gain (or zero when muted), saturation to i16, post-gain peak

use std::sync::atomic::Ordering;

use super::state::MixerState;
use crate::types::{stereo_peak, MixerInput, MixerOutput, Sample, CHANNELS, NUM_INPUTS, NUM_OUTPUTS};

/// Fixed-point scale for gains (Q8.8)
pub const GAIN_ONE: i32 = 1 << GAIN_SHIFT;

/// Right shift that undoes [`GAIN_ONE`]
pub const GAIN_SHIFT: u32 = 8;

/// Convert a linear gain to Q8.8
///
/// Truncates toward zero; out-of-range values saturate and NaN becomes 0.
#[inline]
pub fn gain_to_fixed(gain: f32) -> i32 {
    (gain * GAIN_ONE as f32) as i32
}

/// `(value * gain_fp) >> 8`, computed wide and saturated to i32
#[inline]
fn apply_gain(value: i32, gain_fp: i32) -> i32 {
    let scaled = (value as i64 * gain_fp as i64) >> GAIN_SHIFT;
    scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Pre-allocated buffers for one chunk
///
/// Inputs and outputs are interleaved stereo `chunk_frames * 2` samples.
pub struct ChunkMixer {
    chunk_frames: usize,
    inputs: [Vec<Sample>; NUM_INPUTS],
    accum: [Vec<i32>; NUM_OUTPUTS],
    outputs: [Vec<Sample>; NUM_OUTPUTS],
}

impl ChunkMixer {
    pub fn new(chunk_frames: usize) -> Self {
        let samples = chunk_frames * CHANNELS;
        Self {
            chunk_frames,
            inputs: std::array::from_fn(|_| vec![0; samples]),
            accum: std::array::from_fn(|_| vec![0; samples]),
            outputs: std::array::from_fn(|_| vec![0; samples]),
        }
    }

    #[inline]
    pub fn chunk_frames(&self) -> usize {
        self.chunk_frames
    }

    /// Input buffer to be filled before [`mix`](Self::mix)
    #[inline]
    pub fn input_mut(&mut self, input: MixerInput) -> &mut [Sample] {
        &mut self.inputs[input.index()]
    }

    #[inline]
    pub fn input(&self, input: MixerInput) -> &[Sample] {
        &self.inputs[input.index()]
    }

    /// Final saturated output of the last [`mix`](Self::mix)
    #[inline]
    pub fn output(&self, output: MixerOutput) -> &[Sample] {
        &self.outputs[output.index()]
    }

    /// Mix the current input buffers according to `state`
    ///
    /// Updates channel and output peak meters in `state`.
    pub fn mix(&mut self, state: &MixerState) {
        for input in MixerInput::ALL {
            state
                .channel(input)
                .peak
                .store(stereo_peak(&self.inputs[input.index()]));
        }

        let any_soloed = state.any_soloed();

        for acc in &mut self.accum {
            acc.fill(0);
        }

        for input in MixerInput::ALL {
            let channel = state.channel(input);
            if channel.muted.load(Ordering::Relaxed) {
                continue;
            }
            if any_soloed && !channel.soloed.load(Ordering::Relaxed) {
                continue;
            }

            let channel_volume = channel.volume.load();
            let source = &self.inputs[input.index()];

            for output in MixerOutput::ALL {
                let route = state.route(input, output);
                if !route.enabled.load(Ordering::Relaxed) {
                    continue;
                }

                let gain_fp = gain_to_fixed(channel_volume * route.volume.load());
                if gain_fp == 0 {
                    continue;
                }

                for (acc, sample) in self.accum[output.index()].iter_mut().zip(source) {
                    *acc = acc.saturating_add(apply_gain(*sample as i32, gain_fp));
                }
            }
        }

        for output in MixerOutput::ALL {
            let bus = state.output(output);
            let muted = bus.muted.load(Ordering::Relaxed);
            let gain_fp = if muted { 0 } else { gain_to_fixed(bus.volume.load()) };

            let out = &mut self.outputs[output.index()];
            for (dst, acc) in out.iter_mut().zip(&self.accum[output.index()]) {
                let value = apply_gain(*acc, gain_fp);
                *dst = value.clamp(Sample::MIN as i32, Sample::MAX as i32) as Sample;
            }

            bus.peak.store(stereo_peak(out));
        }
    }
}
