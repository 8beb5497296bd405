//! Audio device enumeration and lookup
//!
//! Devices are searched across ALL available cpal hosts (JACK, ALSA,
//! PulseAudio, WASAPI, CoreAudio...). A [`DeviceId`] with a host restricts
//! the search to that host.

use std::fmt;

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host, HostId};

use super::config::DeviceId;
use super::error::{AudioError, AudioResult};

/// Capture or playback side of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDirection {
    Capture,
    Playback,
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamDirection::Capture => write!(f, "input"),
            StreamDirection::Playback => write!(f, "output"),
        }
    }
}

/// Human-readable host name ("ALSA", "JACK", "WASAPI", ...)
fn host_name(host_id: HostId) -> String {
    let name = format!("{:?}", host_id);
    match name.as_str() {
        "Alsa" => "ALSA".to_string(),
        "Jack" => "JACK".to_string(),
        "Wasapi" => "WASAPI".to_string(),
        _ => name,
    }
}

fn host_by_name(name: &str) -> Option<Host> {
    cpal::available_hosts()
        .into_iter()
        .find(|id| host_name(*id).eq_ignore_ascii_case(name))
        .and_then(|id| cpal::host_from_id(id).ok())
}

fn devices_of(host: &Host, direction: StreamDirection) -> Vec<Device> {
    let devices = match direction {
        StreamDirection::Capture => host.input_devices().map(|d| d.collect::<Vec<_>>()),
        StreamDirection::Playback => host.output_devices().map(|d| d.collect::<Vec<_>>()),
    };
    match devices {
        Ok(devices) => devices,
        Err(e) => {
            log::debug!("Could not enumerate {} devices: {}", direction, e);
            Vec::new()
        }
    }
}

fn default_of(host: &Host, direction: StreamDirection) -> Option<Device> {
    match direction {
        StreamDirection::Capture => host.default_input_device(),
        StreamDirection::Playback => host.default_output_device(),
    }
}

/// A device as listed for the user
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Identifier usable in [`AudioConfig`](super::AudioConfig)
    pub id: DeviceId,
    /// Whether this is its host's default device for the direction
    pub is_default: bool,
}

impl fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id.display_label())?;
        if self.is_default {
            write!(f, " (default)")?;
        }
        Ok(())
    }
}

/// List every device for `direction` on every host
///
/// Default devices come first, then by host and name.
pub fn list_devices(direction: StreamDirection) -> AudioResult<Vec<AudioDevice>> {
    let mut all: Vec<AudioDevice> = Vec::new();

    for host_id in cpal::available_hosts() {
        let host = match cpal::host_from_id(host_id) {
            Ok(h) => h,
            Err(e) => {
                log::debug!("Could not initialize host {:?}: {}", host_id, e);
                continue;
            }
        };
        let host_label = host_name(host_id);
        let default_name = default_of(&host, direction).and_then(|d| d.name().ok());

        for device in devices_of(&host, direction) {
            let Ok(name) = device.name() else {
                continue;
            };
            all.push(AudioDevice {
                is_default: default_name.as_deref() == Some(name.as_str()),
                id: DeviceId::with_host(&name, &host_label),
            });
        }
    }

    if all.is_empty() {
        return Err(AudioError::NoDevices(direction));
    }

    all.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| a.id.host.cmp(&b.id.host))
            .then_with(|| a.id.name.cmp(&b.id.name))
    });

    Ok(all)
}

/// Resolve a configured device, or the default host's default device
pub fn find_device(id: Option<&DeviceId>, direction: StreamDirection) -> AudioResult<Device> {
    let Some(id) = id else {
        return default_of(&cpal::default_host(), direction)
            .ok_or(AudioError::NoDefaultDevice(direction));
    };

    let by_name = |device: &Device| device.name().ok().as_deref() == Some(id.name.as_str());

    if let Some(host) = id.host.as_deref().and_then(host_by_name) {
        return devices_of(&host, direction)
            .into_iter()
            .find(by_name)
            .ok_or_else(|| AudioError::DeviceNotFound {
                direction,
                name: id.display_label(),
            });
    }

    cpal::available_hosts()
        .into_iter()
        .filter_map(|host_id| cpal::host_from_id(host_id).ok())
        .find_map(|host| devices_of(&host, direction).into_iter().find(by_name))
        .ok_or_else(|| AudioError::DeviceNotFound {
            direction,
            name: id.display_label(),
        })
}
