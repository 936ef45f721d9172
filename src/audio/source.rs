use thiserror::Error;

/// Playback timing delivered alongside every tap block.
///
/// `current_tick` is relative to the attached timeline (the host resolves
/// its song position to a timeline tick before invoking the tap).
/// `pos_in_tick` counts interleaved samples between the start of that tick
/// and the block's end at the write cursor, so frame extraction can be
/// aligned to the tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SongPosition {
    /// False while the transport is stopped; the tap then does no work
    pub playing: bool,
    pub current_tick: i32,
    pub pos_in_tick: usize,
    pub current_sub_tick: u32,
    pub pos_in_sub_tick: u32,
}

/// Block callback a source invokes from its audio context: interleaved
/// samples, a stereo flag (mono taps are duplicated into both lanes), and
/// the playback position.
pub type TapCallback = Box<dyn FnMut(&[f32], bool, &SongPosition) + Send>;

/// A point in the audio graph that can deliver raw sample blocks to a
/// listener without altering the signal.
///
/// This is the analyzer's only inbound boundary: how the tap point is
/// located (a named master bus, a specific connection, anything else) is
/// entirely the implementor's concern.
pub trait AudioSource {
    /// Install `tap`. The returned subscription keeps the tap alive until
    /// it is cancelled.
    fn subscribe(&mut self, tap: TapCallback) -> Result<Box<dyn TapSubscription>, AttachError>;
}

/// Handle to an installed tap.
///
/// `cancel` must be idempotent, and no further tap invocations may begin
/// after it returns; the analyzer relies on that ordering when it detaches
/// before reallocating state.
pub trait TapSubscription: Send {
    fn cancel(&mut self);
}

/// Failure to attach the analyzer to a source.
#[derive(Debug, Error)]
pub enum AttachError {
    /// The named tap target does not exist in the audio graph.
    #[error("tap target {name:?} not found in the audio graph")]
    TargetNotFound { name: String },
}
