//! Text encodings for the mixer document

use std::path::Path;

use super::document::MixerDocument;
use super::error::StateResult;

/// Encoding used for a state file
///
/// Picked from the file extension: `.yaml`/`.yml` is YAML, anything else
/// is JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFormat {
    #[default]
    Json,
    Yaml,
}

impl StateFormat {
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => StateFormat::Yaml,
            _ => StateFormat::Json,
        }
    }

    pub fn encode(self, doc: &MixerDocument) -> StateResult<String> {
        Ok(match self {
            StateFormat::Json => serde_json::to_string_pretty(doc)?,
            StateFormat::Yaml => serde_yaml::to_string(doc)?,
        })
    }

    pub fn decode(self, text: &str) -> StateResult<MixerDocument> {
        Ok(match self {
            StateFormat::Json => serde_json::from_str(text)?,
            StateFormat::Yaml => serde_yaml::from_str(text)?,
        })
    }
}
