//! Audio device error types

use thiserror::Error;

use super::device::StreamDirection;

/// Errors that can occur while opening or running device streams
#[derive(Error, Debug)]
pub enum AudioError {
    /// No devices at all for this direction
    #[error("No audio {0} devices found")]
    NoDevices(StreamDirection),

    /// Host has no default device for this direction
    #[error("No default audio {0} device")]
    NoDefaultDevice(StreamDirection),

    /// Named device not found on any host
    #[error("Audio {direction} device not found: {name}")]
    DeviceNotFound {
        direction: StreamDirection,
        name: String,
    },

    /// Failed to get device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),

    /// Device only offers sample formats we cannot convert
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
