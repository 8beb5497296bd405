//! Audio port configuration
//!
//! Selects a device for each hardware port (IN1, IN2, OUT1, OUT2) plus the
//! preferred sample rate and device buffer size.

use serde::{Deserialize, Serialize};

use crate::types::{MixerInput, MixerOutput};

/// Smallest device buffer we will request (frames)
pub const MIN_BUFFER_FRAMES: u32 = 64;

/// Largest device buffer we will request (frames)
pub const MAX_BUFFER_FRAMES: u32 = 8192;

/// Device buffer used when the config does not name one (frames)
pub const DEFAULT_BUFFER_FRAMES: u32 = 256;

/// Audio device identifier
///
/// The host (e.g. "ALSA", "JACK", "WASAPI") disambiguates devices with the
/// same name on systems with several audio backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceId {
    /// Device name as reported by the system
    pub name: String,
    /// Audio host name; `None` searches every host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl DeviceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: None,
        }
    }

    pub fn with_host(name: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            host: Some(host.to_string()),
        }
    }

    /// `[host] name`, or just the name without a host
    pub fn display_label(&self) -> String {
        match &self.host {
            Some(host) => format!("[{}] {}", host, self.name),
            None => self.name.clone(),
        }
    }
}

/// One hardware port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    /// Open this port at startup
    pub enabled: bool,
    /// Device to open (None = host default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceId>,
}

impl PortConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            device: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            device: None,
        }
    }

    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Audio configuration for all hardware ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub in1: PortConfig,
    pub in2: PortConfig,
    pub out1: PortConfig,
    pub out2: PortConfig,

    /// Preferred sample rate (None = 48 kHz if the device supports it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Requested device buffer size in frames
    pub buffer_frames: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            in1: PortConfig::enabled(),
            in2: PortConfig::disabled(),
            out1: PortConfig::enabled(),
            out2: PortConfig::disabled(),
            sample_rate: None,
            buffer_frames: DEFAULT_BUFFER_FRAMES,
        }
    }
}

impl AudioConfig {
    /// Port feeding a capture input; `None` for SYNTH
    pub fn capture_port(&self, input: MixerInput) -> Option<&PortConfig> {
        match input {
            MixerInput::In1 => Some(&self.in1),
            MixerInput::In2 => Some(&self.in2),
            MixerInput::Synth => None,
        }
    }

    pub fn playback_port(&self, output: MixerOutput) -> &PortConfig {
        match output {
            MixerOutput::Out1 => &self.out1,
            MixerOutput::Out2 => &self.out2,
        }
    }

    /// Buffer size clamped to what we are willing to request
    pub fn effective_buffer_frames(&self) -> u32 {
        self.buffer_frames.clamp(MIN_BUFFER_FRAMES, MAX_BUFFER_FRAMES)
    }

    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    pub fn with_buffer_frames(mut self, frames: u32) -> Self {
        self.buffer_frames = frames;
        self
    }
}
