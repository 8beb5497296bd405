//! Ring-backed capture and playback adapters
//!
//! Each hardware stream owns one end of a [`RingBuffer`] inside its device
//! callback and the mixer thread owns the other end through a
//! [`CaptureSource`] or [`PlaybackSink`]:
//!
//! ```text
//!  ┌────────────────┐  CaptureFeed   ┌──────────┐  RingCapture   ┌──────────────┐
//!  │ input callback │───write()─────►│   ring   │───read()──────►│ mixer thread │
//!  └────────────────┘                └──────────┘                └──────┬───────┘
//!                                                                       │
//!  ┌─────────────────┐  PlaybackDrain ┌──────────┐  RingPlayback        │
//!  │ output callback │◄───read()──────│   ring   │◄───write()───────────┘
//!  └─────────────────┘                └──────────┘
//! ```
//!
//! Reads and writes are clamped to whole frames so a left/right pair is
//! never split across two calls.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use super::io::{CaptureSource, PlaybackSink};
use super::ring_buffer::{RingBuffer, RingConsumer, RingProducer};
use crate::types::{Sample, CHANNELS};

/// Device buffers worth of audio held by each ring
pub const RING_BUFFERS: usize = 8;

/// Ring size in samples for a device buffer of `buffer_frames`
pub fn ring_capacity(buffer_frames: u32) -> usize {
    buffer_frames as usize * CHANNELS * RING_BUFFERS
}

#[inline]
fn frame_aligned(samples: usize) -> usize {
    samples & !(CHANNELS - 1)
}

/// Open/closed flag and sample rate shared by a stream handle and its adapter
#[derive(Debug)]
pub struct StreamStatus {
    open: AtomicBool,
    sample_rate: AtomicU32,
}

impl StreamStatus {
    pub fn new(sample_rate: u32) -> Arc<Self> {
        Arc::new(Self {
            open: AtomicBool::new(true),
            sample_rate: AtomicU32::new(sample_rate),
        })
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capture (device → mixer)
// ─────────────────────────────────────────────────────────────────────────────

/// Callback end of a capture ring
pub struct CaptureFeed {
    producer: RingProducer<Sample>,
}

impl CaptureFeed {
    /// Push interleaved stereo frames, dropping what does not fit
    ///
    /// Returns the number of frames stored.
    pub fn push_frames(&mut self, samples: &[Sample]) -> usize {
        let room = frame_aligned(self.producer.space());
        let len = frame_aligned(samples.len()).min(room);
        self.producer.write(&samples[..len]) / CHANNELS
    }
}

/// Mixer end of a capture ring
pub struct RingCapture {
    consumer: RingConsumer<Sample>,
    status: Arc<StreamStatus>,
}

impl CaptureSource for RingCapture {
    fn read(&mut self, dest: &mut [Sample]) -> usize {
        if !self.status.is_open() {
            return 0;
        }
        let avail = frame_aligned(self.consumer.available());
        let len = frame_aligned(dest.len()).min(avail);
        self.consumer.read(&mut dest[..len]) / CHANNELS
    }
}

/// Create a capture ring sized for `buffer_frames` device buffers
pub fn capture_ring(buffer_frames: u32, status: Arc<StreamStatus>) -> (CaptureFeed, RingCapture) {
    let (producer, consumer) = RingBuffer::new(ring_capacity(buffer_frames)).split();
    (CaptureFeed { producer }, RingCapture { consumer, status })
}

// ─────────────────────────────────────────────────────────────────────────────
// Playback (mixer → device)
// ─────────────────────────────────────────────────────────────────────────────

/// Mixer end of a playback ring
pub struct RingPlayback {
    producer: RingProducer<Sample>,
    status: Arc<StreamStatus>,
}

impl PlaybackSink for RingPlayback {
    fn write(&mut self, frames: &[Sample]) -> usize {
        if !self.status.is_open() {
            return 0;
        }
        let room = frame_aligned(self.producer.space());
        let len = frame_aligned(frames.len()).min(room);
        self.producer.write(&frames[..len]) / CHANNELS
    }

    fn sample_rate(&self) -> u32 {
        self.status.sample_rate()
    }

    fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

/// Callback end of a playback ring
pub struct PlaybackDrain {
    consumer: RingConsumer<Sample>,
}

impl PlaybackDrain {
    /// Fill `out` with buffered frames, zero-filling any underrun
    ///
    /// Returns the number of frames that came from the ring.
    pub fn pull_frames(&mut self, out: &mut [Sample]) -> usize {
        let avail = frame_aligned(self.consumer.available());
        let len = frame_aligned(out.len()).min(avail);
        let read = self.consumer.read(&mut out[..len]);
        out[read..].fill(0);
        read / CHANNELS
    }
}

/// Create a playback ring sized for `buffer_frames` device buffers
pub fn playback_ring(buffer_frames: u32, status: Arc<StreamStatus>) -> (RingPlayback, PlaybackDrain) {
    let (producer, consumer) = RingBuffer::new(ring_capacity(buffer_frames)).split();
    (RingPlayback { producer, status }, PlaybackDrain { consumer })
}
