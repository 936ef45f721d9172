use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::audio::window_functions::WindowKind;

/// Which lane(s) of the tapped stereo stream feed the analysis frame and
/// the volume table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSelector {
    Left,
    Right,
    #[default]
    Mix,
}

/// Snapshot of the externally controlled analysis parameters.
///
/// Controllers publish whole snapshots through a [`ConfigHandle`]; the
/// analysis engine loads exactly one snapshot per tick, so a multi-field
/// change can never be observed half-applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub channel: ChannelSelector,
    /// Windowing applied to the frame prior to FFT analysis
    pub window: WindowKind,
    /// Low band ceiling in Hz (0..=22050)
    pub low_hz: u32,
    /// High band floor in Hz (0..=22050)
    pub high_hz: u32,
    /// Volume smoothing window length in ms (1..=100)
    pub vol_smooth_ms: u32,
    /// Display zoom for graph consumers (1..=100); not read by the analysis
    pub scale: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            channel: ChannelSelector::Mix,
            window: WindowKind::None,
            low_hz: 300,
            high_hz: 2400,
            vol_smooth_ms: 10,
            scale: 10,
        }
    }
}

impl AnalyzerConfig {
    /// Clamp every field to its parameter range.
    fn clamped(mut self) -> Self {
        self.low_hz = self.low_hz.min(22_050);
        self.high_hz = self.high_hz.min(22_050);
        self.vol_smooth_ms = self.vol_smooth_ms.clamp(1, 100);
        self.scale = self.scale.clamp(1, 100);
        self
    }
}

/// Clone-able handle over the active configuration snapshot.
///
/// `store` swaps the snapshot pointer atomically; the engine's per-tick
/// `snapshot` is a lock-free load, safe against the audio thread.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<AnalyzerConfig>>,
}

impl ConfigHandle {
    pub(crate) fn new(config: AnalyzerConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config.clamped())),
        }
    }

    /// Publish a new snapshot; it takes effect on the next tick's analysis.
    pub fn store(&self, config: AnalyzerConfig) {
        self.inner.store(Arc::new(config.clamped()));
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<AnalyzerConfig> {
        self.inner.load_full()
    }
}
