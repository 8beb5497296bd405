//! Saving and loading mixer state files

use std::path::Path;

use super::document::MixerDocument;
use super::error::{StateError, StateResult};
use super::format::StateFormat;
use crate::engine::{MixerSnapshot, MixerState};

/// Where the state came from after [`load_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File was parsed and applied
    Loaded,
    /// File was missing or unusable; factory layout applied
    Defaults,
}

/// Write the persisted fields of `state` to `path`
///
/// Creates parent directories as needed. Peaks are not saved.
pub fn try_save_state(state: &MixerState, path: &Path) -> StateResult<()> {
    let doc = MixerDocument::from_snapshot(&state.snapshot());
    let text = StateFormat::for_path(path).encode(&doc)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, text).map_err(|source| StateError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("[State] Saved mixer state to {:?}", path);
    Ok(())
}

/// Like [`try_save_state`] but only logs failures
pub fn save_state(state: &MixerState, path: &Path) {
    if let Err(e) = try_save_state(state, path) {
        log::error!("[State] {}", e);
    }
}

/// Read and decode a state file without applying it
pub fn read_document(path: &Path) -> StateResult<MixerDocument> {
    let text = std::fs::read_to_string(path).map_err(|source| StateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    StateFormat::for_path(path).decode(&text)
}

/// Apply a saved state file onto `state`
///
/// Entries present in the file override the current values. If the file is
/// missing or cannot be parsed, the factory layout is applied instead.
pub fn load_state(state: &MixerState, path: &Path) -> LoadOutcome {
    if !path.exists() {
        log::info!("[State] No mixer state at {:?}, using defaults", path);
        state.apply(&MixerSnapshot::default());
        return LoadOutcome::Defaults;
    }

    match read_document(path) {
        Ok(doc) => {
            state.apply(&doc.apply_to(&state.snapshot()));
            log::info!("[State] Loaded mixer state from {:?}", path);
            LoadOutcome::Loaded
        }
        Err(e) => {
            log::warn!("[State] {}, using defaults", e);
            state.apply(&MixerSnapshot::default());
            LoadOutcome::Defaults
        }
    }
}
