//! Sine test tone for the SYNTH channel
//!
//! Stands in for a real voice engine so the SYNTH strip, its routes and
//! meters can be exercised without one.

use std::f32::consts::TAU;

use crosspad_core::audio::SynthProcessor;
use crosspad_core::{Sample, CHANNELS};

use crate::config::ToneConfig;

pub struct ToneSynth {
    phase: f32,
    step: f32,
    amplitude: f32,
}

impl ToneSynth {
    pub fn new(config: &ToneConfig, sample_rate: u32) -> Self {
        let rate = sample_rate.max(1) as f32;
        Self {
            phase: 0.0,
            step: TAU * config.frequency_hz.max(0.0) / rate,
            amplitude: config.level.clamp(0.0, 1.0) * i16::MAX as f32,
        }
    }
}

impl SynthProcessor for ToneSynth {
    fn process(&mut self, dest: &mut [Sample]) {
        for frame in dest.chunks_exact_mut(CHANNELS) {
            let value = (self.phase.sin() * self.amplitude) as Sample;
            frame.fill(value);
            self.phase += self.step;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(frequency_hz: f32, level: f32) -> ToneConfig {
        ToneConfig {
            enabled: true,
            frequency_hz,
            level,
        }
    }

    #[test]
    fn test_stereo_frames_match() {
        let mut synth = ToneSynth::new(&tone(1000.0, 0.5), 48000);
        let mut buf = vec![0; 96 * CHANNELS];
        synth.process(&mut buf);

        for frame in buf.chunks_exact(CHANNELS) {
            assert_eq!(frame[0], frame[1]);
        }
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn test_level_bounds_peak() {
        let mut synth = ToneSynth::new(&tone(1000.0, 0.5), 48000);
        let mut buf = vec![0; 480 * CHANNELS];
        synth.process(&mut buf);

        let peak = buf.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak <= 16384, "peak {}", peak);
        assert!(peak > 16000, "peak {}", peak);
    }

    #[test]
    fn test_phase_continues_across_chunks() {
        let mut whole = ToneSynth::new(&tone(440.0, 1.0), 44100);
        let mut split = ToneSynth::new(&tone(440.0, 1.0), 44100);

        let mut a = vec![0; 128 * CHANNELS];
        whole.process(&mut a);

        let mut b = vec![0; 128 * CHANNELS];
        let (first, second) = b.split_at_mut(64 * CHANNELS);
        split.process(first);
        split.process(second);

        assert_eq!(a, b);
    }

    #[test]
    fn test_silent_level() {
        let mut synth = ToneSynth::new(&tone(440.0, 0.0), 48000);
        let mut buf = vec![7; 64 * CHANNELS];
        synth.process(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }
}
