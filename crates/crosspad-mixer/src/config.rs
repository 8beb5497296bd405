//! Host configuration for crosspad-mixer
//!
//! Stored as YAML in the CrossPad config directory.
//! Default location: ~/.config/crosspad/mixer.yaml

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crosspad_core::audio::AudioConfig;
use crosspad_core::config::{default_host_config_path, default_state_path, load_config, save_config};
use crosspad_core::engine::EngineConfig;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerHostConfig {
    /// Device selection per port
    pub audio: AudioConfig,
    /// Mixing thread parameters
    pub engine: EngineConfig,
    /// Mixer state file (default: ~/.config/crosspad/mixer_state.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
    /// Built-in synth stand-in
    pub tone: ToneConfig,
}

impl MixerHostConfig {
    pub fn state_path(&self) -> PathBuf {
        self.state_path.clone().unwrap_or_else(default_state_path)
    }
}

/// Sine test tone fed into the SYNTH channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub enabled: bool,
    pub frequency_hz: f32,
    /// Linear amplitude (0.0 - 1.0 of full scale)
    pub level: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency_hz: 440.0,
            level: 0.25,
        }
    }
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    default_host_config_path()
}

/// Load configuration, falling back to defaults
pub fn load_host_config(path: &Path) -> MixerHostConfig {
    load_config(path)
}

/// Write configuration, creating the directory if needed
#[allow(dead_code)]
pub fn save_host_config(config: &MixerHostConfig, path: &Path) -> Result<()> {
    save_config(config, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml() {
        let config: MixerHostConfig = serde_yaml::from_str(
            "tone:\n  enabled: true\nengine:\n  chunk_frames: 128\nstate_path: /tmp/mix.yaml\n",
        )
        .unwrap();
        assert!(config.tone.enabled);
        assert_eq!(config.tone.frequency_hz, 440.0);
        assert_eq!(config.engine.chunk_frames, 128);
        assert_eq!(config.engine.fallback_sample_rate, 48000);
        assert_eq!(config.state_path(), PathBuf::from("/tmp/mix.yaml"));
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_default_state_path() {
        assert!(MixerHostConfig::default()
            .state_path()
            .ends_with("mixer_state.json"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixer.yaml");
        let mut config = MixerHostConfig::default();
        config.tone.enabled = true;
        config.audio.out2.enabled = true;

        save_host_config(&config, &path).unwrap();
        assert_eq!(load_host_config(&path), config);
    }
}
