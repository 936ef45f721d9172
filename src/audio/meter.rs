use atomic_float::AtomicF32;
use std::sync::{atomic::Ordering, Arc};

use crate::audio::constants::{db_from_amplitude, db_to_vu_level, FULL_SCALE};
use crate::audio::ring_buffer::RingBuffer;

/// Sentinel meaning "no sample scored since the last emission"
const UNSET: f32 = -1.0;

/// Most recent normalized peak levels, shared with meter displays.
///
/// The tap side stores, consumers load; both ends are lock-free and a stale
/// read is at worst one tick old.
#[derive(Clone)]
pub struct PeakLevels {
    left: Arc<AtomicF32>,
    right: Arc<AtomicF32>,
}

impl PeakLevels {
    pub(crate) fn new() -> Self {
        Self {
            left: Arc::new(AtomicF32::new(0.0)),
            right: Arc::new(AtomicF32::new(0.0)),
        }
    }

    /// Left channel level in [0, 1] (0 = -80 dB or below, 1 = full scale)
    pub fn left(&self) -> f32 {
        self.left.load(Ordering::Relaxed)
    }

    /// Right channel level in [0, 1]
    pub fn right(&self) -> f32 {
        self.right.load(Ordering::Relaxed)
    }

    fn store(&self, left: f32, right: f32) {
        self.left.store(left, Ordering::Relaxed);
        self.right.store(right, Ordering::Relaxed);
    }
}

/// Tracks the peak amplitude of each channel between tick boundaries.
///
/// Each tick the analyzer scans a smoothing window of the freshest samples
/// and folds its absolute peaks into per-channel running maxima. The maxima
/// persist until [`LoudnessTracker::emit`] converts them to VU levels and
/// resets them to a sentinel, so no sample is scored twice and no peak is
/// lost between ticks.
pub struct LoudnessTracker {
    max_left: f32,
    max_right: f32,
    levels: PeakLevels,
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
}

impl LoudnessTracker {
    /// `max_window` bounds the smoothing window in stereo frames; scratch
    /// buffers are sized once so scans never allocate.
    pub fn new(max_window: usize, levels: PeakLevels) -> Self {
        Self {
            max_left: UNSET,
            max_right: UNSET,
            levels,
            scratch_left: vec![0.0; max_window],
            scratch_right: vec![0.0; max_window],
        }
    }

    /// Scan a `window_ms` stereo window ending `offset` interleaved samples
    /// behind the write cursor and fold its peaks into the running maxima,
    /// normalized to full scale.
    pub fn accumulate(&mut self, ring: &RingBuffer, offset: usize, window_ms: u32, sample_rate: u32) {
        let frames = (window_ms as u64 * sample_rate as u64 / 1000) as usize;
        let frames = frames.min(ring.max_window()).min(self.scratch_left.len());
        if frames == 0 {
            return;
        }

        let left = &mut self.scratch_left[..frames];
        let right = &mut self.scratch_right[..frames];
        ring.read_stereo(offset, left, right);

        self.max_left = self.max_left.max(abs_max(left) / FULL_SCALE);
        self.max_right = self.max_right.max(abs_max(right) / FULL_SCALE);
    }

    /// Running maximum for the left channel since the last emission
    /// (sentinel -1.0 when no window has been scanned yet).
    pub fn max_left(&self) -> f32 {
        self.max_left
    }

    /// Running maximum for the right channel since the last emission.
    pub fn max_right(&self) -> f32 {
        self.max_right
    }

    /// Convert the running maxima to normalized VU levels, publish them to
    /// the shared [`PeakLevels`] and reset the maxima.
    ///
    /// A channel whose maximum is still unset keeps its previous level.
    pub fn emit(&mut self) -> (f32, f32) {
        let left = if self.max_left >= 0.0 {
            db_to_vu_level(db_from_amplitude(self.max_left))
        } else {
            self.levels.left()
        };
        let right = if self.max_right >= 0.0 {
            db_to_vu_level(db_from_amplitude(self.max_right))
        } else {
            self.levels.right()
        };

        self.levels.store(left, right);
        self.max_left = UNSET;
        self.max_right = UNSET;

        (left, right)
    }
}

fn abs_max(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0, |peak, &sample| peak.max(sample.abs()))
}
