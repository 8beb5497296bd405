//! Audio I/O for the mixer
//!
//! # Architecture
//!
//! The mixer thread never touches a device directly. Every hardware port is
//! a cpal stream whose callback exchanges samples with the mixer through a
//! lock-free SPSC [`RingBuffer`]:
//!
//! - **Capture callback** (IN1/IN2): converts to stereo i16 and writes the ring
//! - **Mixer thread**: reads capture rings via [`CaptureSource`], writes
//!   playback rings via [`PlaybackSink`]
//! - **Playback callback** (OUT1/OUT2): reads the ring, zero-filling underruns
//!
//! Hardware callbacks never lock, allocate or log per sample.
//!
//! # Example Usage
//!
//! ```ignore
//! use crosspad_core::audio::{open_capture, open_playback, AudioConfig};
//!
//! let config = AudioConfig::default();
//! let (in1_handle, in1) = open_capture(config.in1.device.as_ref(), &config)?;
//! let (out1_handle, out1) = open_playback(config.out1.device.as_ref(), &config)?;
//! // hand `in1`/`out1` to the engine, keep the handles alive
//! ```

mod config;
mod cpal_backend;
mod device;
mod error;
mod io;
mod ring_buffer;
mod stream;

pub use config::{
    AudioConfig, DeviceId, PortConfig, DEFAULT_BUFFER_FRAMES, MAX_BUFFER_FRAMES, MIN_BUFFER_FRAMES,
};
pub use cpal_backend::{open_capture, open_playback, StreamHandle};
pub use device::{find_device, list_devices, AudioDevice, StreamDirection};
pub use error::{AudioError, AudioResult};
pub use io::{CaptureSource, PlaybackSink, SynthProcessor};
pub use ring_buffer::{RingBuffer, RingConsumer, RingProducer};
pub use stream::{
    capture_ring, playback_ring, ring_capacity, CaptureFeed, PlaybackDrain, RingCapture,
    RingPlayback, StreamStatus, RING_BUFFERS,
};
