//! Mixer state shared between control threads and the mixer thread
//!
//! Every field is an independent relaxed atomic. Control surfaces write
//! them from any thread; the mixer thread reads them once per chunk. There
//! is no guarantee that several fields changed "together" are observed
//! together, only that each change lands within one chunk.

use std::sync::atomic::{AtomicBool, AtomicI16, AtomicU32, Ordering};

use crate::types::{MixerInput, MixerOutput, Sample, NUM_INPUTS, NUM_OUTPUTS};

/// Atomic f32 stored as its bit pattern
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Stereo peak pair for metering
#[derive(Debug, Default)]
pub struct PeakMeter {
    left: AtomicI16,
    right: AtomicI16,
}

impl PeakMeter {
    #[inline]
    pub fn store(&self, (left, right): (Sample, Sample)) {
        self.left.store(left, Ordering::Relaxed);
        self.right.store(right, Ordering::Relaxed);
    }

    #[inline]
    pub fn load(&self) -> (Sample, Sample) {
        (
            self.left.load(Ordering::Relaxed),
            self.right.load(Ordering::Relaxed),
        )
    }
}

/// One input→output path
#[derive(Debug, Default)]
pub struct RouteState {
    /// Linear gain for this path (1.0 = unity)
    pub volume: AtomicF32,
    pub enabled: AtomicBool,
}

/// Per-input channel strip
#[derive(Debug, Default)]
pub struct ChannelState {
    /// Linear channel gain (1.0 = unity)
    pub volume: AtomicF32,
    pub muted: AtomicBool,
    pub soloed: AtomicBool,
    /// Pre-gain peak of the last chunk
    pub peak: PeakMeter,
}

/// Per-output master strip
#[derive(Debug, Default)]
pub struct OutputBusState {
    /// Linear bus gain (1.0 = unity)
    pub volume: AtomicF32,
    pub muted: AtomicBool,
    /// Post-gain peak of the last chunk
    pub peak: PeakMeter,
}

/// Plain copy of one route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSettings {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            volume: 1.0,
        }
    }
}

/// Plain copy of one channel's controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSettings {
    pub volume: f32,
    pub muted: bool,
    pub soloed: bool,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            soloed: false,
        }
    }
}

/// Plain copy of one output bus's controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSettings {
    pub volume: f32,
    pub muted: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

/// Non-atomic copy of every persisted control
///
/// `Default` is the factory layout: SYNTH→OUT1 enabled, everything else
/// off, all gains at unity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerSnapshot {
    pub routes: [[RouteSettings; NUM_OUTPUTS]; NUM_INPUTS],
    pub channels: [ChannelSettings; NUM_INPUTS],
    pub outputs: [OutputSettings; NUM_OUTPUTS],
}

impl Default for MixerSnapshot {
    fn default() -> Self {
        let mut routes = [[RouteSettings::default(); NUM_OUTPUTS]; NUM_INPUTS];
        routes[MixerInput::Synth.index()][MixerOutput::Out1.index()].enabled = true;
        Self {
            routes,
            channels: [ChannelSettings::default(); NUM_INPUTS],
            outputs: [OutputSettings::default(); NUM_OUTPUTS],
        }
    }
}

/// Route matrix, channel strips and output buses
#[derive(Debug, Default)]
pub struct MixerState {
    routes: [[RouteState; NUM_OUTPUTS]; NUM_INPUTS],
    channels: [ChannelState; NUM_INPUTS],
    outputs: [OutputBusState; NUM_OUTPUTS],
}

impl MixerState {
    /// Create state with the factory layout applied
    pub fn new() -> Self {
        let state = Self::default();
        state.apply(&MixerSnapshot::default());
        state
    }

    #[inline]
    pub fn route(&self, input: MixerInput, output: MixerOutput) -> &RouteState {
        &self.routes[input.index()][output.index()]
    }

    #[inline]
    pub fn channel(&self, input: MixerInput) -> &ChannelState {
        &self.channels[input.index()]
    }

    #[inline]
    pub fn output(&self, output: MixerOutput) -> &OutputBusState {
        &self.outputs[output.index()]
    }

    /// True if at least one channel is soloed
    pub fn any_soloed(&self) -> bool {
        self.channels
            .iter()
            .any(|ch| ch.soloed.load(Ordering::Relaxed))
    }

    /// Copy every control field out
    pub fn snapshot(&self) -> MixerSnapshot {
        let mut snap = MixerSnapshot::default();
        for input in MixerInput::ALL {
            for output in MixerOutput::ALL {
                let route = self.route(input, output);
                snap.routes[input.index()][output.index()] = RouteSettings {
                    enabled: route.enabled.load(Ordering::Relaxed),
                    volume: route.volume.load(),
                };
            }
            let ch = self.channel(input);
            snap.channels[input.index()] = ChannelSettings {
                volume: ch.volume.load(),
                muted: ch.muted.load(Ordering::Relaxed),
                soloed: ch.soloed.load(Ordering::Relaxed),
            };
        }
        for output in MixerOutput::ALL {
            let bus = self.output(output);
            snap.outputs[output.index()] = OutputSettings {
                volume: bus.volume.load(),
                muted: bus.muted.load(Ordering::Relaxed),
            };
        }
        snap
    }

    /// Store every control field from `snap` (peaks are left untouched)
    pub fn apply(&self, snap: &MixerSnapshot) {
        for input in MixerInput::ALL {
            for output in MixerOutput::ALL {
                let src = snap.routes[input.index()][output.index()];
                let route = self.route(input, output);
                route.enabled.store(src.enabled, Ordering::Relaxed);
                route.volume.store(src.volume);
            }
            let src = snap.channels[input.index()];
            let ch = self.channel(input);
            ch.volume.store(src.volume);
            ch.muted.store(src.muted, Ordering::Relaxed);
            ch.soloed.store(src.soloed, Ordering::Relaxed);
        }
        for output in MixerOutput::ALL {
            let src = snap.outputs[output.index()];
            let bus = self.output(output);
            bus.volume.store(src.volume);
            bus.muted.store(src.muted, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_layout() {
        let state = MixerState::new();
        for input in MixerInput::ALL {
            for output in MixerOutput::ALL {
                let expected = input == MixerInput::Synth && output == MixerOutput::Out1;
                assert_eq!(
                    state.route(input, output).enabled.load(Ordering::Relaxed),
                    expected,
                    "{} -> {}",
                    input,
                    output
                );
                assert_eq!(state.route(input, output).volume.load(), 1.0);
            }
            assert_eq!(state.channel(input).volume.load(), 1.0);
            assert!(!state.channel(input).muted.load(Ordering::Relaxed));
        }
        assert!(!state.any_soloed());
    }

    #[test]
    fn test_snapshot_apply_roundtrip() {
        let state = MixerState::new();
        let mut snap = MixerSnapshot::default();
        snap.routes[0][1] = RouteSettings { enabled: true, volume: 0.25 };
        snap.channels[1] = ChannelSettings { volume: 0.5, muted: true, soloed: true };
        snap.outputs[1] = OutputSettings { volume: 1.5, muted: true };

        state.apply(&snap);
        assert_eq!(state.snapshot(), snap);
        assert!(state.any_soloed());
    }

    #[test]
    fn test_atomic_f32_bits() {
        let v = AtomicF32::new(0.1);
        assert_eq!(v.load(), 0.1);
        v.store(-3.75);
        assert_eq!(v.load(), -3.75);
    }
}
