//! Common types for Scope
//!
//! Shared vocabulary between the capture side (audio thread) and the trace
//! side (render thread): sample type, channel identifiers, and the session
//! constants both sides agree on.

/// Audio sample type (32-bit float throughout the pipeline)
pub type Sample = f32;

/// Number of scope channels (stereo pair)
pub const NUM_SCOPE_CHANNELS: usize = 2;

/// Default capture ring capacity in samples per channel
///
/// 4096 samples is ~85ms at 48kHz - enough history for the slowest time
/// scale the controls expose, small enough that a full render-tick copy
/// stays cheap.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default sample rate assumed before a session is prepared (48kHz)
/// The actual rate is read from the audio device at stream start.
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// Scope channel identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ScopeChannel {
    Left = 0,
    Right = 1,
}

impl ScopeChannel {
    /// All channels in index order
    pub const ALL: [ScopeChannel; NUM_SCOPE_CHANNELS] = [ScopeChannel::Left, ScopeChannel::Right];

    /// Convert from index (0-1) to ScopeChannel
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(ScopeChannel::Left),
            1 => Some(ScopeChannel::Right),
            _ => None,
        }
    }

    /// Index of this channel (0-1)
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get the name of this channel
    pub fn name(&self) -> &'static str {
        match self {
            ScopeChannel::Left => "Left",
            ScopeChannel::Right => "Right",
        }
    }
}
