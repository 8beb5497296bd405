//! Pad grid control surface
//!
//! Maps the 4×4 pad grid onto mixer toggles and computes the LED colour of
//! every pad from the current mixer state:
//!
//! ```text
//!   Row 3:  12 IN1→OUT2   13 IN2→OUT2   14 SYN→OUT2   15 OUT2 mute
//!   Row 2:   8 IN1→OUT1    9 IN2→OUT1   10 SYN→OUT1   11 OUT1 mute
//!   Row 1:   4 IN1 solo    5 IN2 solo    6 SYN solo    7 (unused)
//!   Row 0:   0 IN1 mute    1 IN2 mute    2 SYN mute    3 (unused)
//! ```
//!
//! Every change made through [`ControlSurface`] is written to the state file
//! straight away, so the mixer comes back exactly as it was left.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::MixerEngine;
use crate::types::{MixerInput, MixerOutput};

/// Pads on the grid
pub const NUM_PADS: usize = 16;

/// What pressing a pad does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAction {
    ToggleMute(MixerInput),
    ToggleSolo(MixerInput),
    ToggleRoute(MixerInput, MixerOutput),
    ToggleOutputMute(MixerOutput),
}

impl PadAction {
    /// Action bound to `pad`, `None` for unused or out-of-range pads
    pub fn from_pad(pad: u8) -> Option<Self> {
        let column = (pad % 4) as usize;
        let channel = MixerInput::from_index(column);
        match pad {
            0..=2 => channel.map(PadAction::ToggleMute),
            4..=6 => channel.map(PadAction::ToggleSolo),
            8..=10 => channel.map(|ch| PadAction::ToggleRoute(ch, MixerOutput::Out1)),
            11 => Some(PadAction::ToggleOutputMute(MixerOutput::Out1)),
            12..=14 => channel.map(|ch| PadAction::ToggleRoute(ch, MixerOutput::Out2)),
            15 => Some(PadAction::ToggleOutputMute(MixerOutput::Out2)),
            _ => None,
        }
    }
}

/// RGB pad LED colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PadColor {
    pub const OFF: PadColor = PadColor::rgb(0, 0, 0);
    pub const RED: PadColor = PadColor::rgb(80, 0, 0);
    pub const GREEN: PadColor = PadColor::rgb(0, 80, 0);
    pub const YELLOW: PadColor = PadColor::rgb(80, 80, 0);
    pub const CYAN: PadColor = PadColor::rgb(0, 60, 80);
    pub const DIM: PadColor = PadColor::rgb(15, 15, 15);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// LED colour for every pad
///
/// Mutes are green when live and red when muted, solos yellow when active,
/// enabled routes cyan; inactive solos and routes are dim.
pub fn pad_colors(engine: &MixerEngine) -> [PadColor; NUM_PADS] {
    let mut colors = [PadColor::OFF; NUM_PADS];
    for (pad, color) in colors.iter_mut().enumerate() {
        let Some(action) = PadAction::from_pad(pad as u8) else {
            continue;
        };
        *color = match action {
            PadAction::ToggleMute(ch) if engine.is_channel_muted(ch) => PadColor::RED,
            PadAction::ToggleMute(_) => PadColor::GREEN,
            PadAction::ToggleSolo(ch) if engine.is_channel_soloed(ch) => PadColor::YELLOW,
            PadAction::ToggleSolo(_) => PadColor::DIM,
            PadAction::ToggleRoute(ch, out) if engine.is_route_enabled(ch, out) => PadColor::CYAN,
            PadAction::ToggleRoute(..) => PadColor::DIM,
            PadAction::ToggleOutputMute(out) if engine.is_output_muted(out) => PadColor::RED,
            PadAction::ToggleOutputMute(_) => PadColor::GREEN,
        };
    }
    colors
}

/// User-facing mixer controls with save-on-change
pub struct ControlSurface {
    engine: Arc<MixerEngine>,
    state_path: Option<PathBuf>,
}

impl ControlSurface {
    /// `state_path = None` disables autosave
    pub fn new(engine: Arc<MixerEngine>, state_path: Option<PathBuf>) -> Self {
        Self { engine, state_path }
    }

    pub fn engine(&self) -> &Arc<MixerEngine> {
        &self.engine
    }

    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }

    /// Handle a pad press; unused pads do nothing
    pub fn press_pad(&self, pad: u8) -> Option<PadAction> {
        let action = PadAction::from_pad(pad)?;
        self.apply(action);
        Some(action)
    }

    pub fn apply(&self, action: PadAction) {
        match action {
            PadAction::ToggleMute(ch) => {
                self.toggle_mute(ch);
            }
            PadAction::ToggleSolo(ch) => {
                self.toggle_solo(ch);
            }
            PadAction::ToggleRoute(ch, out) => {
                self.toggle_route(ch, out);
            }
            PadAction::ToggleOutputMute(out) => {
                self.toggle_output_mute(out);
            }
        }
    }

    /// Returns the new mute state
    pub fn toggle_mute(&self, input: MixerInput) -> bool {
        let muted = !self.engine.is_channel_muted(input);
        self.engine.set_channel_mute(input, muted);
        log::info!("[Control] {} {}", input, if muted { "muted" } else { "unmuted" });
        self.save();
        muted
    }

    /// Returns the new solo state
    pub fn toggle_solo(&self, input: MixerInput) -> bool {
        let soloed = !self.engine.is_channel_soloed(input);
        self.engine.set_channel_solo(input, soloed);
        log::info!("[Control] {} solo {}", input, if soloed { "on" } else { "off" });
        self.save();
        soloed
    }

    /// Returns whether the route is now enabled
    pub fn toggle_route(&self, input: MixerInput, output: MixerOutput) -> bool {
        let enabled = !self.engine.is_route_enabled(input, output);
        self.set_route(input, output, enabled);
        enabled
    }

    pub fn set_route(&self, input: MixerInput, output: MixerOutput, enabled: bool) {
        self.engine.set_route_enabled(input, output, enabled);
        log::info!(
            "[Control] {} -> {} {}",
            input,
            output,
            if enabled { "on" } else { "off" }
        );
        self.save();
    }

    /// Returns the new output mute state
    pub fn toggle_output_mute(&self, output: MixerOutput) -> bool {
        let muted = !self.engine.is_output_muted(output);
        self.engine.set_output_mute(output, muted);
        log::info!("[Control] {} {}", output, if muted { "muted" } else { "unmuted" });
        self.save();
        muted
    }

    pub fn set_channel_volume(&self, input: MixerInput, volume: f32) {
        self.engine.set_channel_volume(input, volume);
        log::info!("[Control] {} volume {:.2}", input, volume);
        self.save();
    }

    pub fn set_route_volume(&self, input: MixerInput, output: MixerOutput, volume: f32) {
        self.engine.set_route_volume(input, output, volume);
        log::info!("[Control] {} -> {} volume {:.2}", input, output, volume);
        self.save();
    }

    pub fn set_output_volume(&self, output: MixerOutput, volume: f32) {
        self.engine.set_output_volume(output, volume);
        log::info!("[Control] {} volume {:.2}", output, volume);
        self.save();
    }

    /// Current LED colours
    pub fn pad_colors(&self) -> [PadColor; NUM_PADS] {
        pad_colors(&self.engine)
    }

    /// Write the state file now (no-op without a state path)
    pub fn save(&self) {
        if let Some(path) = &self.state_path {
            self.engine.save_state(path);
        }
    }
}
