//! YAML config files
//!
//! Works with any serde type that has a sensible `Default`, so a missing or
//! damaged file never stops the application from starting.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Load a YAML config file
///
/// - file missing: `T::default()`
/// - file unreadable or not valid for `T`: warning, then `T::default()`
///
/// ```ignore
/// let config: MixerHostConfig = load_config(&default_host_config_path());
/// ```
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("[Config] {:?} not found, using defaults", path);
        return T::default();
    }

    let parsed = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))
        .and_then(|text| {
            serde_yaml::from_str::<T>(&text)
                .with_context(|| format!("Failed to parse config file: {:?}", path))
        });

    match parsed {
        Ok(config) => {
            log::info!("[Config] Loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("[Config] {:#}, using defaults", e);
            T::default()
        }
    }
}

/// Write `config` as YAML, creating parent directories as needed
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("[Config] Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioConfig;
    use crate::engine::EngineConfig;

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config: EngineConfig = load_config(&dir.path().join("absent.yaml"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_yaml_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "chunk_frames: [not, a, number]\n").unwrap();

        let config: EngineConfig = load_config(&path);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_roundtrip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("audio.yaml");

        let config = AudioConfig::default()
            .with_sample_rate(44100)
            .with_buffer_frames(512);
        save_config(&config, &path).unwrap();

        let loaded: AudioConfig = load_config(&path);
        assert_eq!(loaded, config);
    }
}
