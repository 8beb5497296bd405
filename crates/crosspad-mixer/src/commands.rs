//! Line commands read from stdin
//!
//! ```text
//! mute <in>                toggle channel mute
//! solo <in>                toggle channel solo
//! route <in> <out> [on|off]
//! vol <in|out> <gain>      channel or output bus volume
//! rvol <in> <out> <gain>   route send volume
//! omute <out>              toggle output bus mute
//! pad <0-15>               press a grid pad
//! levels | pads | devices | save | help | quit
//! ```
//!
//! `<in>` is `in1`, `in2` or `synth`; `<out>` is `out1` or `out2`.

use anyhow::{anyhow, bail, Context, Result};

use crosspad_core::{MixerInput, MixerOutput};

/// Highest accepted gain for any volume command
pub const MAX_GAIN: f32 = 4.0;

pub const HELP: &str = "\
commands:
  mute <in>                 toggle channel mute
  solo <in>                 toggle channel solo
  route <in> <out> [on|off] toggle or set a route
  vol <in|out> <gain>       channel or output volume (0.0 - 4.0)
  rvol <in> <out> <gain>    route volume (0.0 - 4.0)
  omute <out>               toggle output mute
  pad <0-15>                press a grid pad
  levels                    show peak meters
  pads                      show pad LED colours
  devices                   list audio devices
  save                      write the state file now
  quit                      save and exit
inputs: in1 in2 synth   outputs: out1 out2";

/// Strip or bus a `vol` command applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainTarget {
    Channel(MixerInput),
    Output(MixerOutput),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Mute(MixerInput),
    Solo(MixerInput),
    /// `None` toggles
    Route(MixerInput, MixerOutput, Option<bool>),
    Volume(GainTarget, f32),
    RouteVolume(MixerInput, MixerOutput, f32),
    OutputMute(MixerOutput),
    Pad(u8),
    Levels,
    Pads,
    Devices,
    Save,
    Help,
    Quit,
}

/// Parse one input line; blank lines and `#` comments yield `None`
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match (verb.as_str(), args.as_slice()) {
        ("mute" | "m", [input]) => Command::Mute(input_arg(input)?),
        ("solo" | "s", [input]) => Command::Solo(input_arg(input)?),
        ("route" | "r", [input, output]) => {
            Command::Route(input_arg(input)?, output_arg(output)?, None)
        }
        ("route" | "r", [input, output, state]) => {
            Command::Route(input_arg(input)?, output_arg(output)?, Some(switch_arg(state)?))
        }
        ("vol" | "v", [target, gain]) => {
            let target = match (MixerInput::parse(target), MixerOutput::parse(target)) {
                (Some(input), _) => GainTarget::Channel(input),
                (None, Some(output)) => GainTarget::Output(output),
                (None, None) => bail!("unknown channel or output '{}'", target),
            };
            Command::Volume(target, gain_arg(gain)?)
        }
        ("rvol", [input, output, gain]) => {
            Command::RouteVolume(input_arg(input)?, output_arg(output)?, gain_arg(gain)?)
        }
        ("omute", [output]) => Command::OutputMute(output_arg(output)?),
        ("pad" | "p", [pad]) => {
            let pad: u8 = pad.parse().with_context(|| format!("invalid pad '{}'", pad))?;
            if pad as usize >= crosspad_core::control::NUM_PADS {
                bail!("pad {} out of range (0-15)", pad);
            }
            Command::Pad(pad)
        }
        ("levels" | "l", []) => Command::Levels,
        ("pads", []) => Command::Pads,
        ("devices", []) => Command::Devices,
        ("save", []) => Command::Save,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (verb, _) => bail!("unrecognised command '{}' (try 'help')", verb),
    };
    Ok(Some(command))
}

fn input_arg(word: &str) -> Result<MixerInput> {
    MixerInput::parse(word).ok_or_else(|| anyhow!("unknown channel '{}'", word))
}

fn output_arg(word: &str) -> Result<MixerOutput> {
    MixerOutput::parse(word).ok_or_else(|| anyhow!("unknown output '{}'", word))
}

fn switch_arg(word: &str) -> Result<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        _ => bail!("expected on/off, got '{}'", word),
    }
}

fn gain_arg(word: &str) -> Result<f32> {
    let gain: f32 = word
        .parse()
        .with_context(|| format!("invalid gain '{}'", word))?;
    if !gain.is_finite() || !(0.0..=MAX_GAIN).contains(&gain) {
        bail!("gain {} out of range (0.0 - {})", word, MAX_GAIN);
    }
    Ok(gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use MixerInput::*;
    use MixerOutput::*;

    fn ok(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comment() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("# note").unwrap(), None);
    }

    #[test]
    fn test_channel_commands() {
        assert_eq!(ok("mute in1"), Command::Mute(In1));
        assert_eq!(ok("SOLO synth"), Command::Solo(Synth));
        assert_eq!(ok("omute out2"), Command::OutputMute(Out2));
    }

    #[test]
    fn test_route_commands() {
        assert_eq!(ok("route in2 out1"), Command::Route(In2, Out1, None));
        assert_eq!(ok("route syn out2 off"), Command::Route(Synth, Out2, Some(false)));
        assert_eq!(ok("rvol in1 out2 0.5"), Command::RouteVolume(In1, Out2, 0.5));
    }

    #[test]
    fn test_volume_targets() {
        assert_eq!(ok("vol in2 1.5"), Command::Volume(GainTarget::Channel(In2), 1.5));
        assert_eq!(ok("v out1 0"), Command::Volume(GainTarget::Output(Out1), 0.0));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(ok("pad 15"), Command::Pad(15));
        assert_eq!(ok("levels"), Command::Levels);
        assert_eq!(ok("pads"), Command::Pads);
        assert_eq!(ok("devices"), Command::Devices);
        assert_eq!(ok("save"), Command::Save);
        assert_eq!(ok("?"), Command::Help);
        assert_eq!(ok("q"), Command::Quit);
    }

    #[test]
    fn test_rejects_bad_input() {
        for line in [
            "mute in3",
            "route in1 out3",
            "route in1 out1 maybe",
            "vol in1 loud",
            "vol in1 5.0",
            "vol in1 -1",
            "vol in1 NaN",
            "pad 16",
            "pad -1",
            "levels now",
            "dance",
        ] {
            assert!(parse(line).is_err(), "{}", line);
        }
    }
}
