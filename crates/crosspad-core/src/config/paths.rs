//! Standard locations for CrossPad files

use std::path::PathBuf;

/// Mixer state file name inside [`config_dir`]
pub const STATE_FILE_NAME: &str = "mixer_state.json";

/// Host config file name inside [`config_dir`]
pub const HOST_CONFIG_FILE_NAME: &str = "mixer.yaml";

/// Per-user CrossPad directory
///
/// Returns `~/.config/crosspad` on Linux (the platform config dir
/// elsewhere), or `./crosspad` when no config dir is known.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crosspad")
}

/// `<config_dir>/mixer_state.json`
pub fn default_state_path() -> PathBuf {
    config_dir().join(STATE_FILE_NAME)
}

/// `<config_dir>/mixer.yaml`
pub fn default_host_config_path() -> PathBuf {
    config_dir().join(HOST_CONFIG_FILE_NAME)
}
