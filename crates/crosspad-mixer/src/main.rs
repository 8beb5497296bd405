//! CrossPad Mixer - three-input, two-bus real-time audio mixer
//!
//! This is the main entry point. It:
//! 1. Loads the host config and opens the configured audio ports
//! 2. Restores the saved mixer state and starts the mixing thread
//! 3. Reads control commands from stdin until `quit` or EOF
//!
//! ## Command line flags
//!
//! - `--config <path>`: Use a host config other than ~/.config/crosspad/mixer.yaml
//! - `--list-devices`: Print the available audio devices and exit

mod audio;
mod commands;
mod config;
mod tone;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crosspad_core::audio::{list_devices, StreamDirection};
use crosspad_core::control::ControlSurface;
use crosspad_core::engine::MixerEngine;
use crosspad_core::persist::LoadOutcome;
use crosspad_core::{MixerInput, MixerOutput, Sample};

use commands::{Command, GainTarget};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let list_only = args.iter().any(|arg| arg == "--list-devices");
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);

    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if list_only {
        print_devices();
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                       CrossPad Mixer                         ║");
    println!("║            IN1 · IN2 · SYNTH  →  OUT1 · OUT2                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    log::info!("crosspad-mixer starting up");
    let config = config::load_host_config(&config_path);
    let state_path = config.state_path();

    let (mut ports, io) = audio::open_ports(&config);
    if ports.handles().next().is_none() {
        eprintln!("Warning: no audio ports could be opened, mixing into silence");
    }

    let engine = Arc::new(MixerEngine::new(config.engine));
    engine
        .set_io(io)
        .context("mixer I/O must be attached before start")?;

    match engine.load_state(&state_path) {
        LoadOutcome::Loaded => println!("Restored mixer state from {}", state_path.display()),
        LoadOutcome::Defaults => println!("Using default mixer state"),
    }

    engine.start().context("failed to start mixer thread")?;
    println!("Mixer running. Type 'help' for commands.");

    let surface = ControlSurface::new(Arc::clone(&engine), Some(state_path));
    let result = run_console(&surface);

    engine.stop();
    surface.save();
    ports.close();
    log::info!("crosspad-mixer stopped");

    result
}

/// Read and execute commands until `quit` or end of input
fn run_console(surface: &ControlSurface) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line.context("failed to read stdin")?;

        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => return Ok(()),
            Ok(Some(command)) => execute(surface, command),
            Ok(None) => {}
            Err(e) => println!("error: {:#}", e),
        }
    }
}

fn execute(surface: &ControlSurface, command: Command) {
    let engine = surface.engine();
    match command {
        Command::Mute(input) => {
            let muted = surface.toggle_mute(input);
            println!("{} {}", input, if muted { "muted" } else { "live" });
        }
        Command::Solo(input) => {
            let soloed = surface.toggle_solo(input);
            println!("{} solo {}", input, on_off(soloed));
        }
        Command::Route(input, output, Some(enabled)) => {
            surface.set_route(input, output, enabled);
            println!("{} -> {} {}", input, output, on_off(enabled));
        }
        Command::Route(input, output, None) => {
            let enabled = surface.toggle_route(input, output);
            println!("{} -> {} {}", input, output, on_off(enabled));
        }
        Command::Volume(GainTarget::Channel(input), gain) => {
            surface.set_channel_volume(input, gain);
            println!("{} volume {:.2}", input, gain);
        }
        Command::Volume(GainTarget::Output(output), gain) => {
            surface.set_output_volume(output, gain);
            println!("{} volume {:.2}", output, gain);
        }
        Command::RouteVolume(input, output, gain) => {
            surface.set_route_volume(input, output, gain);
            println!("{} -> {} volume {:.2}", input, output, gain);
        }
        Command::OutputMute(output) => {
            let muted = surface.toggle_output_mute(output);
            println!("{} {}", output, if muted { "muted" } else { "live" });
        }
        Command::Pad(pad) => match surface.press_pad(pad) {
            Some(action) => println!("pad {}: {:?}", pad, action),
            None => println!("pad {} is not assigned", pad),
        },
        Command::Levels => print_levels(engine),
        Command::Pads => print_pads(surface),
        Command::Devices => print_devices(),
        Command::Save => match surface.state_path() {
            Some(path) => match engine.try_save_state(path) {
                Ok(()) => println!("saved {}", path.display()),
                Err(e) => println!("error: {}", e),
            },
            None => println!("no state file configured"),
        },
        Command::Help => println!("{}", commands::HELP),
        Command::Quit => {}
    }
}

fn on_off(state: bool) -> &'static str {
    if state {
        "on"
    } else {
        "off"
    }
}

fn print_levels(engine: &MixerEngine) {
    for input in MixerInput::ALL {
        let flags = format!(
            "{}{}",
            if engine.is_channel_muted(input) { " M" } else { "" },
            if engine.is_channel_soloed(input) { " S" } else { "" },
        );
        println!(
            "{:<6} {} vol {:.2}{}",
            input.name(),
            meter(engine.channel_level(input)),
            engine.channel_volume(input),
            flags
        );
    }
    for output in MixerOutput::ALL {
        println!(
            "{:<6} {} vol {:.2}{}",
            output.name(),
            meter(engine.output_level(output)),
            engine.output_volume(output),
            if engine.is_output_muted(output) { " M" } else { "" }
        );
    }
}

/// Two 20-step bars for a stereo peak pair
fn meter((left, right): (Sample, Sample)) -> String {
    const STEPS: usize = 20;
    let bar = |peak: Sample| {
        let lit = (peak.unsigned_abs() as usize * STEPS) / 32768;
        format!("{}{}", "#".repeat(lit), ".".repeat(STEPS - lit))
    };
    format!("L[{}] R[{}]", bar(left), bar(right))
}

fn print_pads(surface: &ControlSurface) {
    let colors = surface.pad_colors();
    for row in (0..4).rev() {
        let cells: Vec<String> = (0..4)
            .map(|col| {
                let c = colors[row * 4 + col];
                format!("{:2}:{:02x}{:02x}{:02x}", row * 4 + col, c.r, c.g, c.b)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

fn print_devices() {
    for direction in [StreamDirection::Capture, StreamDirection::Playback] {
        println!("{} devices:", direction);
        match list_devices(direction) {
            Ok(devices) => {
                for device in devices {
                    println!("  {}", device);
                }
            }
            Err(e) => println!("  {}", e),
        }
    }
}
