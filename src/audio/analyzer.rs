use log::{debug, trace, warn};

use crate::audio::bands::band_scores;
use crate::audio::config::{AnalyzerConfig, ChannelSelector, ConfigHandle};
use crate::audio::constants::{frame_len_for_rate, CORRELATION_WINDOW, RING_CAPACITY, VU_METER_RANGE};
use crate::audio::meter::{LoudnessTracker, PeakLevels};
use crate::audio::ring_buffer::RingBuffer;
use crate::audio::source::{AttachError, AudioSource, SongPosition, TapSubscription};
use crate::audio::spectrum::SpectralTransform;
use crate::audio::stereo;
use crate::audio::tables::ResultTables;
use crate::audio::window_functions::WindowBank;

/// Externally visible analyzer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    /// No tap subscribed; nothing is analyzed
    Idle,
    /// Attached to a source and waiting for tick boundaries
    Armed,
}

/// Tap-side state. Emitting is only ever held for the duration of one
/// tick's analysis inside the callback, then falls back to Armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapState {
    Armed,
    Emitting,
}

/// Orchestrates per-tick analysis of one tapped signal.
///
/// `attach` installs a tap on an [`AudioSource`] and hands the whole
/// analysis engine (ring buffer, FFT, window bank, scratch) to that tap
/// callback, which then owns it exclusively — the audio path takes no lock.
/// Results leave the callback only through atomic cells: the six per-tick
/// [`ResultTables`] and the continuous [`PeakLevels`]. Configuration flows
/// the other way as per-tick snapshots through a [`ConfigHandle`].
pub struct TickAnalyzer {
    config: ConfigHandle,
    peak_levels: PeakLevels,
    tables: ResultTables,
    subscription: Option<Box<dyn TapSubscription>>,
}

impl TickAnalyzer {
    pub fn new() -> Self {
        Self {
            config: ConfigHandle::new(AnalyzerConfig::default()),
            peak_levels: PeakLevels::new(),
            tables: ResultTables::new(0),
            subscription: None,
        }
    }

    /// Attach to `source`, analyzing a timeline of `timeline_len` ticks at
    /// `sample_rate`.
    ///
    /// Any previous tap is cancelled first and the result tables are
    /// reallocated for the new timeline length, so no tap delivery can race
    /// the reallocation. On failure the analyzer stays Idle with its old
    /// tables intact.
    pub fn attach(
        &mut self,
        source: &mut dyn AudioSource,
        timeline_len: usize,
        sample_rate: u32,
    ) -> Result<(), AttachError> {
        self.detach();

        let tables = ResultTables::new(timeline_len);
        let mut engine = TapEngine::new(
            sample_rate,
            tables.clone(),
            self.config.clone(),
            self.peak_levels.clone(),
        );
        let subscription = source.subscribe(Box::new(move |samples, stereo, position| {
            engine.on_block(samples, stereo, position);
        }))?;

        self.tables = tables;
        self.subscription = Some(subscription);
        debug!(
            "attached: timeline {timeline_len} ticks, {sample_rate} Hz, frame {}",
            frame_len_for_rate(sample_rate)
        );
        Ok(())
    }

    /// Cancel the current tap, if any. Safe to call repeatedly; after it
    /// returns no further table writes occur.
    pub fn detach(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            debug!("detached");
        }
    }

    pub fn state(&self) -> AnalyzerState {
        if self.subscription.is_some() {
            AnalyzerState::Armed
        } else {
            AnalyzerState::Idle
        }
    }

    /// Handle over the six per-tick result tables. Reallocation only happens
    /// on `attach`, so consumers re-fetch this after attaching.
    pub fn tables(&self) -> ResultTables {
        self.tables.clone()
    }

    /// Continuous peak levels for meter displays; survives re-attachment.
    pub fn peak_levels(&self) -> PeakLevels {
        self.peak_levels.clone()
    }

    /// Configuration handle; snapshots published here apply from the next
    /// tick onward.
    pub fn config(&self) -> ConfigHandle {
        self.config.clone()
    }
}

impl Default for TickAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickAnalyzer {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Everything the tap callback owns exclusively.
///
/// Moving this whole struct into the callback closure is what keeps the
/// audio path lock-free: ring writes and per-tick analysis are strictly
/// ordered by the callback's own sequencing, and every output crosses to
/// other threads through an atomic cell.
struct TapEngine {
    sample_rate: u32,
    ring: RingBuffer,
    windows: WindowBank,
    transform: SpectralTransform,
    loudness: LoudnessTracker,
    tables: ResultTables,
    config: ConfigHandle,
    /// Mono analysis frame scratch, one FFT frame long
    frame: Vec<f32>,
    /// Correlation window scratch, left/right
    corr_left: Vec<f32>,
    corr_right: Vec<f32>,
    state: TapState,
    /// Last tick index an emission happened for; -1 before the first one
    prev_tick: i32,
}

impl TapEngine {
    fn new(
        sample_rate: u32,
        tables: ResultTables,
        config: ConfigHandle,
        levels: PeakLevels,
    ) -> Self {
        let frame_len = frame_len_for_rate(sample_rate);
        let ring = RingBuffer::new(RING_CAPACITY);
        let corr_window = CORRELATION_WINDOW.min(ring.max_window());

        Self {
            sample_rate,
            windows: WindowBank::new(frame_len),
            transform: SpectralTransform::new(frame_len),
            loudness: LoudnessTracker::new(ring.max_window(), levels),
            frame: vec![0.0; frame_len],
            corr_left: vec![0.0; corr_window],
            corr_right: vec![0.0; corr_window],
            ring,
            tables,
            config,
            state: TapState::Armed,
            prev_tick: -1,
        }
    }

    /// One tap delivery: buffer the block, then emit once if this delivery
    /// marks the exact start of a new tick.
    fn on_block(&mut self, samples: &[f32], stereo: bool, position: &SongPosition) {
        if !position.playing {
            return;
        }

        if stereo {
            self.ring.write(samples);
        } else {
            // Duplicate a mono tap into both lanes so the stereo invariants
            // downstream hold unconditionally
            for &sample in samples {
                self.ring.write(&[sample, sample]);
            }
        }

        let at_tick_start = position.current_tick != self.prev_tick
            && position.current_sub_tick == 0
            && position.pos_in_sub_tick == 0;
        if at_tick_start {
            self.prev_tick = position.current_tick;
            self.state = TapState::Emitting;
            self.emit(position);
            self.state = TapState::Armed;
        }
    }

    /// One tick's analysis: frame -> window -> spectrum -> bands, then
    /// loudness, balance, correlation and volume, all written at the tick's
    /// table index.
    fn emit(&mut self, position: &SongPosition) {
        debug_assert_eq!(self.state, TapState::Emitting);
        let Ok(index) = usize::try_from(position.current_tick) else {
            return;
        };
        if index >= self.tables.len() {
            // Timeline shorter than the playback position; skip quietly
            return;
        }

        let config = self.config.snapshot();

        self.ring
            .read_frame(position.pos_in_tick, config.channel, &mut self.frame);
        self.windows.apply(config.window, &mut self.frame);

        match self.transform.power_spectrum(&self.frame) {
            Ok(power) => {
                let scores = band_scores(power, self.sample_rate, config.low_hz, config.high_hz);
                self.tables.low.set(index, scores.low / VU_METER_RANGE);
                self.tables.mid.set(index, scores.mid / VU_METER_RANGE);
                self.tables.high.set(index, scores.high / VU_METER_RANGE);
            }
            Err(err) => warn!("spectral transform failed, skipping bands for tick {index}: {err}"),
        }

        self.loudness.accumulate(
            &self.ring,
            position.pos_in_tick,
            config.vol_smooth_ms,
            self.sample_rate,
        );

        // Balance reads the running maxima before the emission resets them,
        // so it reflects the same window the volume value does
        let balance = stereo::balance(self.loudness.max_left(), self.loudness.max_right());
        self.tables.balance.set(index, balance);

        self.ring.read_stereo(
            position.pos_in_tick,
            &mut self.corr_left,
            &mut self.corr_right,
        );
        let correlation = stereo::correlation(&self.corr_left, &self.corr_right);
        self.tables
            .correlation
            .set(index, (correlation + 1.0) / 2.0);

        let (level_left, level_right) = self.loudness.emit();
        let volume = match config.channel {
            ChannelSelector::Left => level_left,
            ChannelSelector::Right => level_right,
            ChannelSelector::Mix => (level_left + level_right) / 2.0,
        };
        self.tables.volume.set(index, volume);

        trace!("tick {index}: volume {volume:.3} balance {balance:.3} correlation {correlation:.3}");
    }
}
