//! cpal device streams for the mixer's hardware ports
//!
//! Each opened port is a cpal stream whose callback only touches one end of
//! an SPSC ring; the other end is handed to the mixer thread as a
//! [`RingCapture`] or [`RingPlayback`].
//!
//! ```text
//! ┌──────────────────────┐                     ┌─────────────────────┐
//! │ cpal input callback  │──push_frames()─────►│  ring (8 buffers)   │──► RingCapture
//! │ (any format, N ch)   │  first 2 ch → i16   └─────────────────────┘
//! └──────────────────────┘
//!
//!                         ┌─────────────────────┐                     ┌──────────────────────┐
//!        RingPlayback ───►│  ring (8 buffers)   │──pull_frames()─────►│ cpal output callback │
//!                         └─────────────────────┘  zero-fill underrun └──────────────────────┘
//! ```
//!
//! The handle returned alongside the adapter keeps the stream alive.
//! Closing or dropping it stops the stream and marks the adapter closed.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::Sample as _;
use cpal::{
    BufferSize as CpalBufferSize, Device, FromSample, SampleFormat, SampleRate, SizedSample,
    Stream, StreamConfig, SupportedStreamConfigRange,
};

use super::config::{AudioConfig, DeviceId};
use super::device::{find_device, StreamDirection};
use super::error::{AudioError, AudioResult};
use super::stream::{
    capture_ring, playback_ring, CaptureFeed, PlaybackDrain, RingCapture, RingPlayback, StreamStatus,
};
use crate::types::{Sample, CHANNELS, DEFAULT_SAMPLE_RATE};

/// Frames converted per pass inside a callback (scratch buffer size)
const SCRATCH_FRAMES: usize = 1024;

/// Sample formats we can convert, in order of preference
const FORMATS: [SampleFormat; 3] = [SampleFormat::F32, SampleFormat::I16, SampleFormat::U16];

/// Negotiated stream parameters
#[derive(Debug, Clone)]
struct Negotiated {
    config: StreamConfig,
    format: SampleFormat,
    buffer_frames: u32,
}

/// Keeps one device stream alive
pub struct StreamHandle {
    stream: Option<Stream>,
    status: Arc<StreamStatus>,
    direction: StreamDirection,
    device_name: String,
    buffer_frames: u32,
}

impl StreamHandle {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn direction(&self) -> StreamDirection {
        self.direction
    }

    pub fn sample_rate(&self) -> u32 {
        self.status.sample_rate()
    }

    pub fn buffer_frames(&self) -> u32 {
        self.buffer_frames
    }

    /// False after [`close`](Self::close) or a device-lost error
    pub fn is_open(&self) -> bool {
        self.stream.is_some() && self.status.is_open()
    }

    /// Stop the stream and mark the ring adapter closed
    pub fn close(&mut self) {
        self.status.close();
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::debug!("[Audio] Pausing {} stream failed: {}", self.device_name, e);
            }
            drop(stream);
            log::info!("[Audio] Closed {} device: {}", self.direction, self.device_name);
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Open a capture device and return its handle and mixer-side adapter
pub fn open_capture(
    device: Option<&DeviceId>,
    config: &AudioConfig,
) -> AudioResult<(StreamHandle, RingCapture)> {
    let direction = StreamDirection::Capture;
    let device = find_device(device, direction)?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

    let supported: Vec<_> = device
        .supported_input_configs()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?
        .collect();
    let negotiated = negotiate(&supported, config)?;
    log_negotiated(direction, &device_name, &negotiated);

    let status = StreamStatus::new(negotiated.config.sample_rate.0);
    let (feed, capture) = capture_ring(negotiated.buffer_frames, Arc::clone(&status));

    let stream = match negotiated.format {
        SampleFormat::F32 => build_capture::<f32>(&device, &negotiated.config, feed, &status),
        SampleFormat::I16 => build_capture::<i16>(&device, &negotiated.config, feed, &status),
        SampleFormat::U16 => build_capture::<u16>(&device, &negotiated.config, feed, &status),
        other => Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
    }?;

    stream
        .play()
        .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;
    log::info!("[Audio] Opened input device: {}", device_name);

    let handle = StreamHandle {
        stream: Some(stream),
        status,
        direction,
        device_name,
        buffer_frames: negotiated.buffer_frames,
    };
    Ok((handle, capture))
}

/// Open a playback device and return its handle and mixer-side adapter
pub fn open_playback(
    device: Option<&DeviceId>,
    config: &AudioConfig,
) -> AudioResult<(StreamHandle, RingPlayback)> {
    let direction = StreamDirection::Playback;
    let device = find_device(device, direction)?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

    let supported: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?
        .collect();
    let negotiated = negotiate(&supported, config)?;
    log_negotiated(direction, &device_name, &negotiated);

    let status = StreamStatus::new(negotiated.config.sample_rate.0);
    let (playback, drain) = playback_ring(negotiated.buffer_frames, Arc::clone(&status));

    let stream = match negotiated.format {
        SampleFormat::F32 => build_playback::<f32>(&device, &negotiated.config, drain, &status),
        SampleFormat::I16 => build_playback::<i16>(&device, &negotiated.config, drain, &status),
        SampleFormat::U16 => build_playback::<u16>(&device, &negotiated.config, drain, &status),
        other => Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
    }?;

    stream
        .play()
        .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;
    log::info!("[Audio] Opened output device: {}", device_name);

    let handle = StreamHandle {
        stream: Some(stream),
        status,
        direction,
        device_name,
        buffer_frames: negotiated.buffer_frames,
    };
    Ok((handle, playback))
}

fn log_negotiated(direction: StreamDirection, device_name: &str, n: &Negotiated) {
    log::debug!(
        "[Audio] {} {}: {} ch {:?} @ {} Hz, {} frames",
        direction,
        device_name,
        n.config.channels,
        n.format,
        n.config.sample_rate.0,
        n.buffer_frames
    );
}

fn supports_rate(range: &SupportedStreamConfigRange, rate: u32) -> bool {
    rate >= range.min_sample_rate().0 && rate <= range.max_sample_rate().0
}

/// Pick a format, channel layout and rate from the device's ranges
///
/// Preference: supports the requested rate, then at least two channels,
/// then format (f32 > i16 > u16). A device that cannot run at the requested
/// rate runs at its maximum instead.
fn negotiate(supported: &[SupportedStreamConfigRange], config: &AudioConfig) -> AudioResult<Negotiated> {
    let target = config.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);

    let usable: Vec<&SupportedStreamConfigRange> = supported
        .iter()
        .filter(|c| FORMATS.contains(&c.sample_format()) && c.channels() > 0)
        .collect();

    if usable.is_empty() {
        return match supported.first() {
            Some(c) => Err(AudioError::UnsupportedFormat(format!("{:?}", c.sample_format()))),
            None => Err(AudioError::ConfigError(
                "No supported stream configurations".to_string(),
            )),
        };
    }

    let rank = |c: &SupportedStreamConfigRange| {
        let format_rank = FORMATS
            .iter()
            .position(|f| *f == c.sample_format())
            .unwrap_or(FORMATS.len());
        (
            !supports_rate(c, target),
            c.channels() < CHANNELS as u16,
            format_rank,
        )
    };

    let best = usable
        .iter()
        .copied()
        .min_by_key(|c| rank(c))
        .ok_or_else(|| AudioError::ConfigError("No suitable stream configuration".to_string()))?;

    let sample_rate = if supports_rate(best, target) {
        SampleRate(target)
    } else {
        let fallback = best.max_sample_rate();
        log::warn!(
            "[Audio] Device doesn't support {} Hz, using {} Hz",
            target,
            fallback.0
        );
        fallback
    };

    let buffer_frames = config.effective_buffer_frames();
    let stream_config = StreamConfig {
        channels: best.channels(),
        sample_rate,
        buffer_size: CpalBufferSize::Fixed(buffer_frames),
    };

    Ok(Negotiated {
        config: stream_config,
        format: best.sample_format(),
        buffer_frames,
    })
}

/// Convert `device_channels`-wide frames to interleaved stereo i16
///
/// The first two channels are kept; a mono device is duplicated.
fn to_stereo<T>(input: &[T], device_channels: usize, out: &mut [Sample]) -> usize
where
    T: SizedSample,
    Sample: FromSample<T>,
{
    let mut frames = 0;
    for (frame, dst) in input
        .chunks_exact(device_channels)
        .zip(out.chunks_exact_mut(CHANNELS))
    {
        let left = Sample::from_sample(frame[0]);
        let right = match frame.get(1) {
            Some(r) => Sample::from_sample(*r),
            None => left,
        };
        dst[0] = left;
        dst[1] = right;
        frames += 1;
    }
    frames
}

/// Write stereo i16 frames into `device_channels`-wide device frames
///
/// Extra device channels get silence; a mono device gets the L/R average.
fn from_stereo<T>(input: &[Sample], output: &mut [T], device_channels: usize)
where
    T: SizedSample + FromSample<Sample>,
{
    for (src, frame) in input
        .chunks_exact(CHANNELS)
        .zip(output.chunks_exact_mut(device_channels))
    {
        if device_channels == 1 {
            let mono = ((src[0] as i32 + src[1] as i32) / 2) as Sample;
            frame[0] = T::from_sample(mono);
            continue;
        }
        frame[0] = T::from_sample(src[0]);
        frame[1] = T::from_sample(src[1]);
        for extra in frame.iter_mut().skip(CHANNELS) {
            *extra = T::EQUILIBRIUM;
        }
    }
}

fn stream_error_handler(
    direction: StreamDirection,
    status: &Arc<StreamStatus>,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    let status = Arc::clone(status);
    move |err| {
        log::error!("[Audio] {} stream error: {}", direction, err);
        if matches!(err, cpal::StreamError::DeviceNotAvailable) {
            status.close();
        }
    }
}

fn build_capture<T>(
    device: &Device,
    config: &StreamConfig,
    mut feed: CaptureFeed,
    status: &Arc<StreamStatus>,
) -> AudioResult<Stream>
where
    T: SizedSample + Send + 'static,
    Sample: FromSample<T>,
{
    let channels = (config.channels as usize).max(1);
    let mut scratch = vec![0 as Sample; SCRATCH_FRAMES * CHANNELS];

    device
        .build_input_stream(
            config,
            move |data: &[T], _info: &cpal::InputCallbackInfo| {
                for block in data.chunks(SCRATCH_FRAMES * channels) {
                    let frames = to_stereo(block, channels, &mut scratch);
                    // Overflow drops the newest frames
                    feed.push_frames(&scratch[..frames * CHANNELS]);
                }
            },
            stream_error_handler(StreamDirection::Capture, status),
            None,
        )
        .map_err(|e| AudioError::StreamBuildError(e.to_string()))
}

fn build_playback<T>(
    device: &Device,
    config: &StreamConfig,
    mut drain: PlaybackDrain,
    status: &Arc<StreamStatus>,
) -> AudioResult<Stream>
where
    T: SizedSample + FromSample<Sample> + Send + 'static,
{
    let channels = (config.channels as usize).max(1);
    let mut scratch = vec![0 as Sample; SCRATCH_FRAMES * CHANNELS];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
                for block in data.chunks_mut(SCRATCH_FRAMES * channels) {
                    let frames = block.len() / channels;
                    let stereo = &mut scratch[..frames * CHANNELS];
                    drain.pull_frames(stereo);
                    from_stereo(stereo, block, channels);
                    // Trailing partial frame, if any
                    for sample in block.iter_mut().skip(frames * channels) {
                        *sample = T::EQUILIBRIUM;
                    }
                }
            },
            stream_error_handler(StreamDirection::Playback, status),
            None,
        )
        .map_err(|e| AudioError::StreamBuildError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::SupportedBufferSize;

    fn range(channels: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn test_negotiate_prefers_rate_then_stereo_then_f32() {
        let supported = vec![
            range(2, 44100, 44100, SampleFormat::F32),
            range(1, 8000, 96000, SampleFormat::F32),
            range(2, 8000, 96000, SampleFormat::I16),
        ];
        let n = negotiate(&supported, &AudioConfig::default()).unwrap();
        assert_eq!(n.format, SampleFormat::I16);
        assert_eq!(n.config.channels, 2);
        assert_eq!(n.config.sample_rate.0, 48000);
        assert_eq!(n.buffer_frames, 256);
    }

    #[test]
    fn test_negotiate_falls_back_to_max_rate() {
        let supported = vec![range(2, 22050, 44100, SampleFormat::F32)];
        let n = negotiate(&supported, &AudioConfig::default().with_sample_rate(96000)).unwrap();
        assert_eq!(n.config.sample_rate.0, 44100);
    }

    #[test]
    fn test_negotiate_rejects_unconvertible_formats() {
        let supported = vec![range(2, 8000, 96000, SampleFormat::I32)];
        assert!(matches!(
            negotiate(&supported, &AudioConfig::default()),
            Err(AudioError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            negotiate(&[], &AudioConfig::default()),
            Err(AudioError::ConfigError(_))
        ));
    }

    #[test]
    fn test_to_stereo_keeps_first_two_channels() {
        let input: [i16; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut out = [0i16; 4];
        assert_eq!(to_stereo(&input, 4, &mut out), 2);
        assert_eq!(out, [1, 2, 5, 6]);
    }

    #[test]
    fn test_to_stereo_duplicates_mono() {
        let input: [i16; 3] = [10, -20, 30];
        let mut out = [0i16; 6];
        assert_eq!(to_stereo(&input, 1, &mut out), 3);
        assert_eq!(out, [10, 10, -20, -20, 30, 30]);
    }

    #[test]
    fn test_from_stereo_silences_extra_channels() {
        let input: [i16; 4] = [100, 200, 300, 400];
        let mut out = [9i16; 8];
        from_stereo(&input, &mut out, 4);
        assert_eq!(out, [100, 200, 0, 0, 300, 400, 0, 0]);
    }

    #[test]
    fn test_from_stereo_mono_average() {
        let input: [i16; 2] = [1000, 3000];
        let mut out = [0i16; 1];
        from_stereo(&input, &mut out, 1);
        assert_eq!(out, [2000]);
    }

    #[test]
    fn test_from_stereo_converts_to_f32() {
        let input: [i16; 2] = [0, i16::MIN];
        let mut out = [1.0f32; 2];
        from_stereo(&input, &mut out, 2);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], -1.0);
    }
}
