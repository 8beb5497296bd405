//! On-disk shape of the mixer state
//!
//! ```json
//! {
//!   "routes":   [{ "in": 2, "out": 0, "enabled": true, "volume": 1.0 }, ...],
//!   "channels": [{ "volume": 1.0, "muted": false, "soloed": false }, ...],
//!   "outputs":  [{ "volume": 1.0, "muted": false }, ...]
//! }
//! ```
//!
//! Channels and outputs are matched by position. Within an entry every
//! field is optional (`volume` falls back to 1.0, flags to false); entries
//! that are absent altogether leave the current value alone.

use serde::{Deserialize, Serialize};

use crate::engine::{ChannelSettings, MixerSnapshot, OutputSettings, RouteSettings};
use crate::types::{MixerInput, MixerOutput, NUM_INPUTS, NUM_OUTPUTS};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MixerDocument {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    #[serde(default)]
    pub channels: Vec<ChannelEntry>,
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
}

fn unity() -> f32 {
    1.0
}

/// Non-finite gains have no JSON form; they are stored as unity
fn finite_gain(volume: f32) -> f32 {
    if volume.is_finite() {
        volume
    } else {
        unity()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(rename = "in", default)]
    pub input: i64,
    #[serde(rename = "out", default)]
    pub output: i64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "unity")]
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEntry {
    #[serde(default = "unity")]
    pub volume: f32,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub soloed: bool,
}

impl Default for ChannelEntry {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            soloed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
    #[serde(default = "unity")]
    pub volume: f32,
    #[serde(default)]
    pub muted: bool,
}

impl Default for OutputEntry {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

impl MixerDocument {
    /// Full document: all 6 routes, 3 channels, 2 outputs
    pub fn from_snapshot(snap: &MixerSnapshot) -> Self {
        let mut routes = Vec::with_capacity(NUM_INPUTS * NUM_OUTPUTS);
        for input in MixerInput::ALL {
            for output in MixerOutput::ALL {
                let route = snap.routes[input.index()][output.index()];
                routes.push(RouteEntry {
                    input: input.index() as i64,
                    output: output.index() as i64,
                    enabled: route.enabled,
                    volume: finite_gain(route.volume),
                });
            }
        }

        let channels = snap
            .channels
            .iter()
            .map(|ch| ChannelEntry {
                volume: finite_gain(ch.volume),
                muted: ch.muted,
                soloed: ch.soloed,
            })
            .collect();

        let outputs = snap
            .outputs
            .iter()
            .map(|out| OutputEntry {
                volume: finite_gain(out.volume),
                muted: out.muted,
            })
            .collect();

        Self { routes, channels, outputs }
    }

    /// Overlay the document on `base`
    ///
    /// Route entries with an `in`/`out` outside the matrix are skipped, as
    /// are channel and output entries past the last strip.
    pub fn apply_to(&self, base: &MixerSnapshot) -> MixerSnapshot {
        let mut snap = *base;

        for entry in &self.routes {
            let Some(route) = route_slot(&mut snap, entry.input, entry.output) else {
                log::debug!(
                    "[State] Skipping route entry {} -> {} (out of range)",
                    entry.input,
                    entry.output
                );
                continue;
            };
            *route = RouteSettings {
                enabled: entry.enabled,
                volume: finite_gain(entry.volume),
            };
        }

        for (slot, entry) in snap.channels.iter_mut().zip(&self.channels) {
            *slot = ChannelSettings {
                volume: finite_gain(entry.volume),
                muted: entry.muted,
                soloed: entry.soloed,
            };
        }

        for (slot, entry) in snap.outputs.iter_mut().zip(&self.outputs) {
            *slot = OutputSettings {
                volume: finite_gain(entry.volume),
                muted: entry.muted,
            };
        }

        snap
    }
}

fn route_slot(snap: &mut MixerSnapshot, input: i64, output: i64) -> Option<&mut RouteSettings> {
    let input = usize::try_from(input).ok().and_then(MixerInput::from_index)?;
    let output = usize::try_from(output).ok().and_then(MixerOutput::from_index)?;
    Some(&mut snap.routes[input.index()][output.index()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document_has_every_slot() {
        let doc = MixerDocument::from_snapshot(&MixerSnapshot::default());
        assert_eq!(doc.routes.len(), 6);
        assert_eq!(doc.channels.len(), 3);
        assert_eq!(doc.outputs.len(), 2);

        let synth_out1 = doc
            .routes
            .iter()
            .find(|r| r.input == 2 && r.output == 0)
            .unwrap();
        assert!(synth_out1.enabled);
    }

    #[test]
    fn test_absent_fields_take_defaults() {
        let doc: MixerDocument = serde_json::from_str(
            r#"{
                "routes": [{ "in": 0, "out": 1, "enabled": true }],
                "channels": [{}, { "volume": 0.4 }]
            }"#,
        )
        .unwrap();

        let mut base = MixerSnapshot::default();
        base.channels[0].muted = true;
        base.outputs[1].volume = 0.2;
        let snap = doc.apply_to(&base);

        assert!(snap.routes[0][1].enabled);
        assert_eq!(snap.routes[0][1].volume, 1.0);
        // Present but empty entry resets to field defaults
        assert!(!snap.channels[0].muted);
        assert_eq!(snap.channels[1].volume, 0.4);
        // Entries absent from the document keep the base values
        assert_eq!(snap.outputs, base.outputs);
        assert!(snap.routes[2][0].enabled);
    }

    #[test]
    fn test_out_of_range_routes_are_skipped() {
        let doc: MixerDocument = serde_json::from_str(
            r#"{ "routes": [
                { "in": 3, "out": 0, "enabled": true, "volume": 9.0 },
                { "in": 0, "out": -1, "enabled": true, "volume": 9.0 },
                { "in": 1, "out": 2, "enabled": true, "volume": 9.0 }
            ] }"#,
        )
        .unwrap();

        let base = MixerSnapshot::default();
        assert_eq!(doc.apply_to(&base), base);
    }

    #[test]
    fn test_extra_strips_are_ignored() {
        let mut outputs = vec![OutputEntry::default(); 2];
        outputs.push(OutputEntry { volume: 0.0, muted: true });
        let doc = MixerDocument { outputs, ..Default::default() };

        let base = MixerSnapshot::default();
        assert_eq!(doc.apply_to(&base), base);
    }

    #[test]
    fn test_missing_route_keys_default_to_first_slot() {
        let doc: MixerDocument =
            serde_json::from_str(r#"{ "routes": [{ "enabled": true, "volume": 0.5 }] }"#).unwrap();
        let snap = doc.apply_to(&MixerSnapshot::default());
        assert!(snap.routes[0][0].enabled);
        assert_eq!(snap.routes[0][0].volume, 0.5);
    }
}
