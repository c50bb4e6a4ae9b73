//! The per-tick read -> locate -> sample pipeline
//!
//! Owns everything the render thread needs between ticks: the shared ring
//! handle, the freeze state, and reusable scratch/polyline buffers so the
//! steady state allocates nothing once warmed up.

use std::sync::Arc;

use scope_core::capture::CaptureBuffer;
use scope_core::types::{Sample, ScopeChannel};

use crate::display::{DisplayConfig, Viewport};
use crate::freeze::FreezeState;
use crate::trace::{sample_trace, ChannelTrace};
use crate::trigger::locate_rising_edge;

/// Render-thread pipeline state.
///
/// `render` is a pure function of (ring contents, config, viewport); all
/// fields are reused buffers, not hidden inputs.
pub struct TracePipeline {
    buffer: Arc<CaptureBuffer>,
    freeze: FreezeState,
    scratch: Vec<Sample>,
    traces: [ChannelTrace; scope_core::types::NUM_SCOPE_CHANNELS],
}

impl TracePipeline {
    pub fn new(buffer: Arc<CaptureBuffer>) -> Self {
        Self {
            buffer,
            freeze: FreezeState::new(),
            scratch: Vec::new(),
            traces: [
                ChannelTrace::new(ScopeChannel::Left),
                ChannelTrace::new(ScopeChannel::Right),
            ],
        }
    }

    /// Run one render pass and return the rebuilt traces.
    ///
    /// All channels are present in the result; channels hidden by the
    /// channel mode (and everything, on a degenerate viewport) come back
    /// with empty polylines rather than being omitted, so consumers can
    /// index by channel unconditionally.
    pub fn render(&mut self, config: &DisplayConfig, viewport: Viewport) -> &[ChannelTrace] {
        // Freeze edge first so a freshly-raised flag freezes this very tick.
        self.freeze.update(config.frozen, &self.buffer);

        for channel in ScopeChannel::ALL {
            let trace = &mut self.traces[channel.index()];

            if !viewport.is_drawable() || !config.channel_mode.shows(channel) {
                trace.clear();
                continue;
            }

            let (data, start) = match self.freeze.frame(channel) {
                // Frozen: fixed pre-captured cursor, no trigger search, so
                // the trace cannot jitter between ticks.
                Some((frame, cursor)) => (frame, cursor),
                None => {
                    let cursor = self.buffer.read_into(channel, &mut self.scratch);
                    let start = if config.trigger_enabled {
                        locate_rising_edge(&self.scratch, config.trigger_level, cursor)
                    } else {
                        cursor
                    };
                    (self.scratch.as_slice(), start)
                }
            };

            sample_trace(
                data,
                start,
                viewport,
                config.time_scale,
                config.amplitude_scale,
                &mut trace.points,
            );
        }

        &self.traces
    }

    /// Whether the display is currently frozen
    pub fn is_frozen(&self) -> bool {
        self.freeze.is_active()
    }

    /// The ring this pipeline reads from
    pub fn buffer(&self) -> &Arc<CaptureBuffer> {
        &self.buffer
    }
}
