//! Freeze snapshots
//!
//! Freezing stops the *display* without touching the writer: on the
//! unfrozen->frozen edge every lane is copied (raw circular order, cursor
//! included) into owned frames, and the pipeline reads those until unfreeze.
//! The captured cursor doubles as the fixed start point - no trigger search
//! runs against a frozen frame, so it cannot jitter between ticks.
//!
//! The capture itself races the live writer and may tear, same as any other
//! read of the ring; a frozen frame is best-effort consistent, not atomic.

use scope_core::capture::CaptureBuffer;
use scope_core::types::{Sample, ScopeChannel, NUM_SCOPE_CHANNELS};

/// One channel's frozen copy: full lane contents plus the cursor at capture.
struct FrozenFrame {
    samples: Vec<Sample>,
    cursor: usize,
}

/// Edge-triggered freeze bookkeeping for all channels.
pub struct FreezeState {
    frames: [FrozenFrame; NUM_SCOPE_CHANNELS],
    active: bool,
}

impl FreezeState {
    pub fn new() -> Self {
        Self {
            frames: std::array::from_fn(|_| FrozenFrame {
                samples: Vec::new(),
                cursor: 0,
            }),
            active: false,
        }
    }

    /// Apply the freeze flag for this tick.
    ///
    /// Only the unfrozen->frozen edge captures; repeated `true` while already
    /// frozen is a no-op, so the displayed frame never silently recaptures.
    /// The frozen->unfrozen edge just resumes live reads (frames are
    /// overwritten by the next capture).
    pub fn update(&mut self, frozen: bool, buffer: &CaptureBuffer) {
        if frozen && !self.active {
            for channel in ScopeChannel::ALL {
                let frame = &mut self.frames[channel.index()];
                frame.cursor = buffer.read_into(channel, &mut frame.samples);
            }
            log::debug!("Freeze captured at cursors {:?}", self.cursors());
        }
        self.active = frozen;
    }

    /// Whether the display is currently frozen
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The frozen lane and its fixed start cursor, if frozen.
    pub fn frame(&self, channel: ScopeChannel) -> Option<(&[Sample], usize)> {
        if !self.active {
            return None;
        }
        let frame = &self.frames[channel.index()];
        Some((&frame.samples, frame.cursor))
    }

    fn cursors(&self) -> [usize; NUM_SCOPE_CHANNELS] {
        std::array::from_fn(|i| self.frames[i].cursor)
    }
}

impl Default for FreezeState {
    fn default() -> Self {
        Self::new()
    }
}
