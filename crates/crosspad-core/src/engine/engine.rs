//! Mixer engine - owns the mixer state and the background mixing thread

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use super::mixer::ChunkMixer;
use super::state::{MixerSnapshot, MixerState};
use crate::audio::{CaptureSource, PlaybackSink, SynthProcessor};
use crate::persist::{self, LoadOutcome, StateResult};
use crate::types::{
    MixerInput, MixerOutput, Sample, CHANNELS, CHUNK_FRAMES, DEFAULT_SAMPLE_RATE,
    NUM_CAPTURE_INPUTS, NUM_OUTPUTS,
};

/// Smallest chunk the mixing thread will run (frames)
pub const MIN_CHUNK_FRAMES: usize = 16;

/// Largest chunk the mixing thread will run (frames)
pub const MAX_CHUNK_FRAMES: usize = 8192;

/// Mixing thread parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frames mixed per iteration (clamped to `MIN_CHUNK_FRAMES..=MAX_CHUNK_FRAMES`)
    pub chunk_frames: usize,
    /// Pacing rate when no open sink reports one
    pub fallback_sample_rate: u32,
    /// Sleep between attempts to hand a partially accepted chunk to a sink
    pub sink_retry_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_frames: CHUNK_FRAMES,
            fallback_sample_rate: DEFAULT_SAMPLE_RATE,
            sink_retry_ms: 1,
        }
    }
}

impl EngineConfig {
    fn sink_retry(&self) -> Duration {
        Duration::from_millis(self.sink_retry_ms)
    }

    /// Chunk size the mixing thread actually uses
    pub fn effective_chunk_frames(&self) -> usize {
        self.chunk_frames.clamp(MIN_CHUNK_FRAMES, MAX_CHUNK_FRAMES)
    }

    /// Wall-clock length of one chunk at `sample_rate`, never zero
    pub fn chunk_duration(&self, sample_rate: u32) -> Duration {
        let rate = if sample_rate == 0 {
            self.fallback_sample_rate.max(1)
        } else {
            sample_rate
        };
        let micros = self.effective_chunk_frames() as u64 * 1_000_000 / rate as u64;
        Duration::from_micros(micros.max(1))
    }
}

/// Collaborators attached to the mixer
///
/// Any slot may be empty: a missing capture or synth contributes silence and
/// a missing sink is skipped.
#[derive(Default)]
pub struct MixerIo {
    /// IN1 and IN2
    pub captures: [Option<Box<dyn CaptureSource>>; NUM_CAPTURE_INPUTS],
    pub synth: Option<Box<dyn SynthProcessor>>,
    /// OUT1 and OUT2
    pub sinks: [Option<Box<dyn PlaybackSink>>; NUM_OUTPUTS],
}

impl MixerIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a capture source to IN1 or IN2
    ///
    /// SYNTH is fed by [`with_synth`](Self::with_synth); passing it here is
    /// logged and ignored.
    pub fn with_capture(mut self, input: MixerInput, source: Box<dyn CaptureSource>) -> Self {
        match capture_slot(input) {
            Some(slot) => self.captures[slot] = Some(source),
            None => log::warn!("[Mixer] {} is not a capture input, ignoring source", input),
        }
        self
    }

    pub fn with_synth(mut self, synth: Box<dyn SynthProcessor>) -> Self {
        self.synth = Some(synth);
        self
    }

    pub fn with_sink(mut self, output: MixerOutput, sink: Box<dyn PlaybackSink>) -> Self {
        self.sinks[output.index()] = Some(sink);
        self
    }

    /// Sample rate of the first open sink, OUT1 before OUT2
    fn pacing_sample_rate(&self) -> Option<u32> {
        self.sinks
            .iter()
            .flatten()
            .find(|sink| sink.is_open() && sink.sample_rate() > 0)
            .map(|sink| sink.sample_rate())
    }

    /// Acquire one chunk from every input, zero-filling shortfalls
    fn fill_inputs(&mut self, chunk: &mut ChunkMixer) {
        for (slot, input) in [MixerInput::In1, MixerInput::In2].into_iter().enumerate() {
            let dest = chunk.input_mut(input);
            let frames = match self.captures[slot].as_mut() {
                Some(source) => source.read(dest).min(dest.len() / CHANNELS),
                None => 0,
            };
            dest[frames * CHANNELS..].fill(0);
        }

        let dest = chunk.input_mut(MixerInput::Synth);
        match self.synth.as_mut() {
            Some(synth) => synth.process(dest),
            None => dest.fill(0),
        }
    }

    /// Hand each output bus to its sink, retrying until fully accepted
    ///
    /// Gives up on a sink once it closes or the engine is stopping.
    fn deliver_outputs(&mut self, chunk: &ChunkMixer, running: &AtomicBool, retry: Duration) {
        for output in MixerOutput::ALL {
            let Some(sink) = self.sinks[output.index()].as_mut() else {
                continue;
            };
            if !sink.is_open() {
                continue;
            }
            write_fully(&mut **sink, chunk.output(output), running, retry);
        }
    }
}

fn write_fully(sink: &mut dyn PlaybackSink, data: &[Sample], running: &AtomicBool, retry: Duration) {
    let mut offset = 0;
    while offset < data.len() {
        let frames = sink.write(&data[offset..]);
        offset = (offset + frames * CHANNELS).min(data.len());
        if offset >= data.len() || !running.load(Ordering::Acquire) || !sink.is_open() {
            break;
        }
        thread::sleep(retry);
    }
}

fn capture_slot(input: MixerInput) -> Option<usize> {
    match input {
        MixerInput::In1 => Some(0),
        MixerInput::In2 => Some(1),
        MixerInput::Synth => None,
    }
}

/// Recover the guard from a poisoned lock; the data has no invariants that a
/// panicking holder could break.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Routing matrix, channel strips and output buses driven by a mixing thread
///
/// All control methods take `&self`, touch a single relaxed atomic and are
/// safe to call from any thread while the engine runs. A change becomes
/// audible from the next chunk.
pub struct MixerEngine {
    state: Arc<MixerState>,
    config: EngineConfig,
    running: Arc<AtomicBool>,
    io: Arc<Mutex<MixerIo>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl MixerEngine {
    /// Create an engine with the factory mixer layout and no collaborators
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: Arc::new(MixerState::new()),
            config,
            running: Arc::new(AtomicBool::new(false)),
            io: Arc::new(Mutex::new(MixerIo::new())),
            thread: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared mixer state, e.g. for meters polled from another thread
    pub fn state(&self) -> &Arc<MixerState> {
        &self.state
    }

    /// Replace the attached collaborators
    ///
    /// Only allowed while stopped; returns the previous set.
    pub fn set_io(&self, io: MixerIo) -> EngineResult<MixerIo> {
        // Held across the check so start() cannot hand the I/O to a new thread in between
        let _slot = lock(&self.thread);
        if self.is_running() {
            return Err(EngineError::Running);
        }
        Ok(std::mem::replace(&mut *lock(&self.io), io))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Launch the mixing thread (no-op if already running)
    pub fn start(&self) -> EngineResult<()> {
        let mut slot = lock(&self.thread);
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        // A previous loop may have exited on its own; reap it.
        if let Some(stale) = slot.take() {
            let _ = stale.join();
        }

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let io = Arc::clone(&self.io);
        let config = self.config;

        let spawned = thread::Builder::new()
            .name("crosspad-mixer".to_string())
            .spawn(move || {
                let mut guard = lock(&io);
                mix_loop(&state, &running, &mut guard, &config);
            });

        match spawned {
            Ok(handle) => {
                *slot = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                log::error!("[Mixer] Failed to spawn mixer thread: {}", e);
                Err(EngineError::ThreadSpawn(e))
            }
        }
    }

    /// Signal the mixing thread to exit and wait for it (no-op if stopped)
    ///
    /// Returns once the thread has stopped touching sources and sinks.
    pub fn stop(&self) {
        let mut slot = lock(&self.thread);
        self.running.store(false, Ordering::Release);
        if let Some(handle) = slot.take() {
            log::debug!("[Mixer] Waiting for mixer thread to stop...");
            if handle.join().is_err() {
                log::error!("[Mixer] Mixer thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_route_enabled(&self, input: MixerInput, output: MixerOutput, enabled: bool) {
        self.state.route(input, output).enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_route_enabled(&self, input: MixerInput, output: MixerOutput) -> bool {
        self.state.route(input, output).enabled.load(Ordering::Relaxed)
    }

    /// Set a route's linear gain (stored as given, no clamping)
    pub fn set_route_volume(&self, input: MixerInput, output: MixerOutput, volume: f32) {
        self.state.route(input, output).volume.store(volume);
    }

    pub fn route_volume(&self, input: MixerInput, output: MixerOutput) -> f32 {
        self.state.route(input, output).volume.load()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Channel strips
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_channel_volume(&self, input: MixerInput, volume: f32) {
        self.state.channel(input).volume.store(volume);
    }

    pub fn channel_volume(&self, input: MixerInput) -> f32 {
        self.state.channel(input).volume.load()
    }

    pub fn set_channel_mute(&self, input: MixerInput, muted: bool) {
        self.state.channel(input).muted.store(muted, Ordering::Relaxed);
    }

    pub fn is_channel_muted(&self, input: MixerInput) -> bool {
        self.state.channel(input).muted.load(Ordering::Relaxed)
    }

    pub fn set_channel_solo(&self, input: MixerInput, soloed: bool) {
        self.state.channel(input).soloed.store(soloed, Ordering::Relaxed);
    }

    pub fn is_channel_soloed(&self, input: MixerInput) -> bool {
        self.state.channel(input).soloed.load(Ordering::Relaxed)
    }

    /// True if any channel is soloed
    pub fn is_any_soloed(&self) -> bool {
        self.state.any_soloed()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Output buses
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_output_volume(&self, output: MixerOutput, volume: f32) {
        self.state.output(output).volume.store(volume);
    }

    pub fn output_volume(&self, output: MixerOutput) -> f32 {
        self.state.output(output).volume.load()
    }

    pub fn set_output_mute(&self, output: MixerOutput, muted: bool) {
        self.state.output(output).muted.store(muted, Ordering::Relaxed);
    }

    pub fn is_output_muted(&self, output: MixerOutput) -> bool {
        self.state.output(output).muted.load(Ordering::Relaxed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metering
    // ─────────────────────────────────────────────────────────────────────────

    /// Pre-gain (left, right) peak of the last chunk
    pub fn channel_level(&self, input: MixerInput) -> (Sample, Sample) {
        self.state.channel(input).peak.load()
    }

    /// Post-gain (left, right) peak of the last chunk
    pub fn output_level(&self, output: MixerOutput) -> (Sample, Sample) {
        self.state.output(output).peak.load()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots & persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Restore the factory layout: only SYNTH→OUT1 enabled, unity gains
    pub fn set_defaults(&self) {
        self.state.apply(&MixerSnapshot::default());
    }

    pub fn snapshot(&self) -> MixerSnapshot {
        self.state.snapshot()
    }

    pub fn apply_snapshot(&self, snapshot: &MixerSnapshot) {
        self.state.apply(snapshot);
    }

    /// Persist routing and levels; failures are logged, not returned
    pub fn save_state(&self, path: &Path) {
        persist::save_state(&self.state, path);
    }

    /// Persist routing and levels, reporting failures
    pub fn try_save_state(&self, path: &Path) -> StateResult<()> {
        persist::try_save_state(&self.state, path)
    }

    /// Restore routing and levels saved by [`save_state`](Self::save_state)
    ///
    /// A missing or unreadable file leaves the factory layout in place.
    pub fn load_state(&self, path: &Path) -> LoadOutcome {
        persist::load_state(&self.state, path)
    }
}

impl Default for MixerEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for MixerEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One chunk: acquire, mix, deliver
fn process_chunk(
    state: &MixerState,
    io: &mut MixerIo,
    chunk: &mut ChunkMixer,
    running: &AtomicBool,
    retry: Duration,
) {
    io.fill_inputs(chunk);
    chunk.mix(state);
    io.deliver_outputs(chunk, running, retry);
}

fn mix_loop(state: &MixerState, running: &AtomicBool, io: &mut MixerIo, config: &EngineConfig) {
    let sample_rate = io
        .pacing_sample_rate()
        .unwrap_or(config.fallback_sample_rate);
    let period = config.chunk_duration(sample_rate);
    let retry = config.sink_retry();
    let chunk_frames = config.effective_chunk_frames();
    let mut chunk = ChunkMixer::new(chunk_frames);

    log::info!(
        "[Mixer] Thread started: {} frames/chunk @ {} Hz ({:?} per chunk)",
        chunk_frames,
        sample_rate,
        period
    );

    while running.load(Ordering::Acquire) {
        let started = Instant::now();
        process_chunk(state, io, &mut chunk, running, retry);

        if let Some(remaining) = period.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log::info!("[Mixer] Thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const FRAMES: usize = 8;

    /// Capture source producing a constant frame, optionally short
    struct ConstSource {
        frame: [Sample; 2],
        max_frames: usize,
    }

    impl CaptureSource for ConstSource {
        fn read(&mut self, dest: &mut [Sample]) -> usize {
            let frames = (dest.len() / CHANNELS).min(self.max_frames);
            for frame in dest[..frames * CHANNELS].chunks_exact_mut(CHANNELS) {
                frame.copy_from_slice(&self.frame);
            }
            frames
        }
    }

    struct ConstSynth(Sample);

    impl SynthProcessor for ConstSynth {
        fn process(&mut self, dest: &mut [Sample]) {
            dest.fill(self.0);
        }
    }

    /// Sink that records everything written, accepting at most `per_call` frames
    struct RecordingSink {
        written: Arc<Mutex<Vec<Sample>>>,
        per_call: usize,
        calls: Arc<AtomicUsize>,
        open: bool,
        rate: u32,
    }

    impl RecordingSink {
        fn new(per_call: usize) -> (Self, Arc<Mutex<Vec<Sample>>>, Arc<AtomicUsize>) {
            let written = Arc::new(Mutex::new(Vec::new()));
            let calls = Arc::new(AtomicUsize::new(0));
            let sink = Self {
                written: Arc::clone(&written),
                per_call,
                calls: Arc::clone(&calls),
                open: true,
                rate: 48000,
            };
            (sink, written, calls)
        }
    }

    impl PlaybackSink for RecordingSink {
        fn write(&mut self, frames: &[Sample]) -> usize {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let n = (frames.len() / CHANNELS).min(self.per_call);
            self.written.lock().unwrap().extend_from_slice(&frames[..n * CHANNELS]);
            n
        }

        fn sample_rate(&self) -> u32 {
            self.rate
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    fn run_one(engine: &MixerEngine, io: &mut MixerIo) -> ChunkMixer {
        let mut chunk = ChunkMixer::new(FRAMES);
        let running = AtomicBool::new(true);
        process_chunk(engine.state(), io, &mut chunk, &running, Duration::ZERO);
        chunk
    }

    #[test]
    fn test_short_capture_is_zero_filled() {
        let engine = MixerEngine::default();
        engine.set_route_enabled(MixerInput::In1, MixerOutput::Out2, true);
        let mut io = MixerIo::new().with_capture(
            MixerInput::In1,
            Box::new(ConstSource { frame: [500, 600], max_frames: 3 }),
        );

        let chunk = run_one(&engine, &mut io);

        let out = chunk.output(MixerOutput::Out2);
        assert_eq!(&out[..6], &[500, 600, 500, 600, 500, 600]);
        assert!(out[6..].iter().all(|s| *s == 0));
        assert_eq!(engine.channel_level(MixerInput::In1), (500, 600));
    }

    #[test]
    fn test_missing_synth_is_silent() {
        let engine = MixerEngine::default();
        let mut io = MixerIo::new();
        let chunk = run_one(&engine, &mut io);
        assert!(chunk.output(MixerOutput::Out1).iter().all(|s| *s == 0));
        assert_eq!(engine.output_level(MixerOutput::Out1), (0, 0));
    }

    #[test]
    fn test_synth_reaches_out1_by_default() {
        let engine = MixerEngine::default();
        let (sink, written, _) = RecordingSink::new(usize::MAX);
        let mut io = MixerIo::new()
            .with_synth(Box::new(ConstSynth(1234)))
            .with_sink(MixerOutput::Out1, Box::new(sink));

        run_one(&engine, &mut io);

        let written = written.lock().unwrap();
        assert_eq!(written.len(), FRAMES * CHANNELS);
        assert!(written.iter().all(|s| *s == 1234));
    }

    #[test]
    fn test_partial_sink_writes_are_retried() {
        let engine = MixerEngine::default();
        let (sink, written, calls) = RecordingSink::new(3);
        let mut io = MixerIo::new()
            .with_synth(Box::new(ConstSynth(7)))
            .with_sink(MixerOutput::Out1, Box::new(sink));

        run_one(&engine, &mut io);

        assert_eq!(written.lock().unwrap().len(), FRAMES * CHANNELS);
        // 8 frames at 3 per call
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_closed_sink_is_skipped() {
        let engine = MixerEngine::default();
        let (mut sink, written, calls) = RecordingSink::new(usize::MAX);
        sink.open = false;
        let mut io = MixerIo::new()
            .with_synth(Box::new(ConstSynth(7)))
            .with_sink(MixerOutput::Out1, Box::new(sink));

        run_one(&engine, &mut io);

        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pacing_rate_prefers_first_open_sink() {
        let (mut out1, _, _) = RecordingSink::new(1);
        out1.open = false;
        out1.rate = 96000;
        let (mut out2, _, _) = RecordingSink::new(1);
        out2.rate = 44100;
        let io = MixerIo::new()
            .with_sink(MixerOutput::Out1, Box::new(out1))
            .with_sink(MixerOutput::Out2, Box::new(out2));
        assert_eq!(io.pacing_sample_rate(), Some(44100));
        assert_eq!(MixerIo::new().pacing_sample_rate(), None);
    }

    #[test]
    fn test_chunk_duration() {
        let config = EngineConfig::default();
        assert_eq!(config.chunk_duration(48000), Duration::from_micros(5333));
        assert_eq!(config.chunk_duration(0), Duration::from_micros(5333));
    }

    #[test]
    fn test_chunk_frames_are_clamped() {
        let config: EngineConfig = serde_yaml::from_str("chunk_frames: 0").unwrap();
        assert_eq!(config.effective_chunk_frames(), MIN_CHUNK_FRAMES);
        // 16 frames at 48 kHz
        assert_eq!(config.chunk_duration(48000), Duration::from_micros(333));
        assert!(config.chunk_duration(u32::MAX) > Duration::ZERO);

        let config: EngineConfig = serde_yaml::from_str("chunk_frames: 100000000").unwrap();
        assert_eq!(config.effective_chunk_frames(), MAX_CHUNK_FRAMES);
    }

    #[test]
    fn test_zero_chunk_config_still_paces() {
        let config: EngineConfig = serde_yaml::from_str("chunk_frames: 0").unwrap();
        let engine = MixerEngine::new(config);
        let (sink, written, _) = RecordingSink::new(usize::MAX);
        engine
            .set_io(
                MixerIo::new()
                    .with_synth(Box::new(ConstSynth(1)))
                    .with_sink(MixerOutput::Out1, Box::new(sink)),
            )
            .unwrap();

        engine.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        engine.stop();

        // 50 ms of real time is ~150 chunks of 16 frames; unpaced it would be orders more
        let chunks = written.lock().unwrap().len() / (MIN_CHUNK_FRAMES * CHANNELS);
        assert!(chunks > 0);
        assert!(chunks < 2000, "{} chunks in 50 ms", chunks);
    }

    #[test]
    fn test_set_io_waits_for_start_to_finish() {
        let engine = Arc::new(MixerEngine::default());
        let starter = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.start())
        };

        // Either set_io wins before start, or start wins and set_io is refused;
        // it must never block on the running thread's I/O lock
        let result = engine.set_io(MixerIo::new());
        starter.join().unwrap().unwrap();
        assert!(engine.is_running());
        assert!(result.is_ok() || matches!(result, Err(EngineError::Running)));

        engine.stop();
    }

    #[test]
    fn test_control_round_trip() {
        let engine = MixerEngine::default();
        engine.set_route_volume(MixerInput::In2, MixerOutput::Out1, 0.3);
        engine.set_channel_solo(MixerInput::In2, true);
        engine.set_output_mute(MixerOutput::Out2, true);

        assert_eq!(engine.route_volume(MixerInput::In2, MixerOutput::Out1), 0.3);
        assert!(engine.is_channel_soloed(MixerInput::In2));
        assert!(engine.is_any_soloed());
        assert!(engine.is_output_muted(MixerOutput::Out2));

        engine.set_defaults();
        assert!(!engine.is_any_soloed());
        assert!(engine.is_route_enabled(MixerInput::Synth, MixerOutput::Out1));
        assert!(!engine.is_output_muted(MixerOutput::Out2));
    }

    #[test]
    fn test_start_stop_joins_thread() {
        let engine = MixerEngine::default();
        let (sink, written, _) = RecordingSink::new(usize::MAX);
        engine
            .set_io(
                MixerIo::new()
                    .with_synth(Box::new(ConstSynth(100)))
                    .with_sink(MixerOutput::Out1, Box::new(sink)),
            )
            .unwrap();

        engine.start().unwrap();
        engine.start().unwrap();
        assert!(engine.is_running());
        assert!(matches!(engine.set_io(MixerIo::new()), Err(EngineError::Running)));

        let deadline = Instant::now() + Duration::from_secs(5);
        while written.lock().unwrap().is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        engine.stop();
        assert!(!engine.is_running());

        // Nothing is written once stop() has returned
        let len = written.lock().unwrap().len();
        assert!(len > 0);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(written.lock().unwrap().len(), len);

        engine.stop();
        assert!(engine.set_io(MixerIo::new()).is_ok());
    }
}
