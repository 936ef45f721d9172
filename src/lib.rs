//! Per-tick spectrum, loudness and stereo analysis of a tapped audio signal.
//!
//! A [`TickAnalyzer`] subscribes to an [`AudioSource`] — any point in an
//! audio graph that can deliver raw interleaved stereo blocks together with
//! playback timing. While the transport runs, each tick boundary produces
//! one windowed FFT snapshot aggregated into low/mid/high band scores, a
//! smoothed peak volume, a stereo balance and a stereo correlation
//! coefficient, written into six per-tick [`ResultTables`] that a
//! visualization layer reads concurrently and lock-free.
//!
//! ```no_run
//! use spectrum_tap::{AnalyzerConfig, TickAnalyzer, WindowKind};
//! # use spectrum_tap::{AttachError, AudioSource, TapCallback, TapSubscription};
//! # struct MasterSource;
//! # impl AudioSource for MasterSource {
//! #     fn subscribe(&mut self, _tap: TapCallback)
//! #         -> Result<Box<dyn TapSubscription>, AttachError> {
//! #         Err(AttachError::TargetNotFound { name: "Master".into() })
//! #     }
//! # }
//!
//! let mut source = MasterSource;
//! let mut analyzer = TickAnalyzer::new();
//! analyzer.config().store(AnalyzerConfig {
//!     window: WindowKind::Hanning,
//!     ..AnalyzerConfig::default()
//! });
//! analyzer.attach(&mut source, 64, 44_100)?;
//!
//! let tables = analyzer.tables();
//! let meters = analyzer.peak_levels();
//! // ... render tables.snapshot()s and meters at display rate ...
//! analyzer.detach();
//! # Ok::<(), spectrum_tap::AttachError>(())
//! ```

pub mod audio;

pub use audio::analyzer::{AnalyzerState, TickAnalyzer};
pub use audio::bands::{band_scores, BandScores};
pub use audio::config::{AnalyzerConfig, ChannelSelector, ConfigHandle};
pub use audio::constants::{timeline_seconds, vu_level_to_db, VU_METER_RANGE};
pub use audio::meter::PeakLevels;
pub use audio::source::{AttachError, AudioSource, SongPosition, TapCallback, TapSubscription};
pub use audio::tables::{ResultTable, ResultTables};
pub use audio::window_functions::WindowKind;
