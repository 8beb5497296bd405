//! Hardware ports for crosspad-mixer
//!
//! Opens the capture and playback devices enabled in the host config and
//! wires them, plus the optional test tone, into a [`MixerIo`].
//!
//! A port that fails to open is logged and left empty: the mixer treats a
//! missing capture as silence and skips a missing sink.

use crosspad_core::audio::{open_capture, open_playback, AudioConfig, StreamDirection, StreamHandle};
use crosspad_core::engine::MixerIo;
use crosspad_core::{MixerInput, MixerOutput};

use crate::config::MixerHostConfig;
use crate::tone::ToneSynth;

/// Open device streams; dropping this closes them all
#[derive(Default)]
pub struct AudioPorts {
    handles: Vec<(String, StreamHandle)>,
}

impl AudioPorts {
    /// `(port, handle)` pairs in opening order
    pub fn handles(&self) -> impl Iterator<Item = (&str, &StreamHandle)> {
        self.handles.iter().map(|(port, handle)| (port.as_str(), handle))
    }

    /// Sample rate of the first open playback port
    fn playback_rate(&self) -> Option<u32> {
        self.handles
            .iter()
            .map(|(_, handle)| handle)
            .find(|handle| handle.direction() == StreamDirection::Playback && handle.is_open())
            .map(StreamHandle::sample_rate)
    }

    /// Stop every stream, playback first
    pub fn close(&mut self) {
        for (port, handle) in self.handles.iter_mut().rev() {
            log::debug!("[Audio] Closing {}", port);
            handle.close();
        }
        self.handles.clear();
    }
}

/// Open every enabled port and build the mixer's I/O set
pub fn open_ports(config: &MixerHostConfig) -> (AudioPorts, MixerIo) {
    let audio: &AudioConfig = &config.audio;
    let mut ports = AudioPorts::default();
    let mut io = MixerIo::new();

    for input in [MixerInput::In1, MixerInput::In2] {
        let Some(port) = audio.capture_port(input).filter(|p| p.enabled) else {
            continue;
        };
        match open_capture(port.device.as_ref(), audio) {
            Ok((handle, capture)) => {
                log::info!(
                    "[Audio] {} <- {} ({} Hz)",
                    input,
                    handle.device_name(),
                    handle.sample_rate()
                );
                io = io.with_capture(input, Box::new(capture));
                ports.handles.push((input.name().to_string(), handle));
            }
            Err(e) => log::warn!("[Audio] {} unavailable: {}", input, e),
        }
    }

    for output in MixerOutput::ALL {
        let port = audio.playback_port(output);
        if !port.enabled {
            continue;
        }
        match open_playback(port.device.as_ref(), audio) {
            Ok((handle, playback)) => {
                log::info!(
                    "[Audio] {} -> {} ({} Hz)",
                    output,
                    handle.device_name(),
                    handle.sample_rate()
                );
                io = io.with_sink(output, Box::new(playback));
                ports.handles.push((output.name().to_string(), handle));
            }
            Err(e) => log::warn!("[Audio] {} unavailable: {}", output, e),
        }
    }

    if config.tone.enabled {
        let rate = ports
            .playback_rate()
            .unwrap_or(config.engine.fallback_sample_rate);
        log::info!(
            "[Audio] SYNTH test tone {:.1} Hz at level {:.2}",
            config.tone.frequency_hz,
            config.tone.level
        );
        io = io.with_synth(Box::new(ToneSynth::new(&config.tone, rate)));
    }

    (ports, io)
}
