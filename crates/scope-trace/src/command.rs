//! Lock-free control commands for the render thread
//!
//! UI controls never touch render state directly: they push small commands
//! onto a bounded SPSC queue, and the scheduler drains the queue at the top
//! of each tick. Pushing never blocks; a full queue drops the command with a
//! warning, because losing one slider nudge at UI rate is harmless while a
//! blocked UI thread is not.

use rtrb::PushError;

use crate::display::ChannelMode;

/// Commands sent from the UI thread to the render scheduler
///
/// Applied between ticks, so a tick never observes a half-applied control
/// change. Scale and level values are clamped on application to the ranges
/// the controls expose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceCommand {
    /// Samples-per-pixel multiplier (clamped to 0.1..=5.0)
    SetTimeScale(f32),
    /// Vertical gain (clamped to 0.1..=10.0)
    SetAmplitudeScale(f32),
    /// Rising-edge threshold (clamped to -1.0..=1.0)
    SetTriggerLevel(f32),
    /// Toggle trigger stabilization; off means "start at newest sample"
    SetTriggerEnabled(bool),
    /// Select which channel traces are computed
    SetChannelMode(ChannelMode),
    /// Freeze/unfreeze the display (writer keeps running either way)
    SetFrozen(bool),
    /// New display surface dimensions; the first one arms the scheduler
    SetViewport { width: f32, height: f32 },
    /// Hide/show the display; hidden displays skip ticks entirely
    SetVisible(bool),
}

/// Capacity of the command queue
///
/// Control changes arrive at UI interaction rate; even a fast slider drag
/// produces a few dozen commands between 60Hz ticks. 64 gives headroom
/// without meaningful memory cost.
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Create a new command channel (producer/consumer pair)
///
/// The producer side belongs to the UI (wrapped in [`TraceControls`]), the
/// consumer side to the render scheduler.
pub fn command_channel() -> (rtrb::Producer<TraceCommand>, rtrb::Consumer<TraceCommand>) {
    rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY)
}

/// Non-blocking send side of the control surface.
pub struct TraceControls {
    producer: rtrb::Producer<TraceCommand>,
}

impl TraceControls {
    pub fn new(producer: rtrb::Producer<TraceCommand>) -> Self {
        Self { producer }
    }

    /// Push a command; drops it with a warning if the queue is full.
    pub fn send(&mut self, command: TraceCommand) {
        if let Err(PushError::Full(dropped)) = self.producer.push(command) {
            log::warn!("Control queue full, dropped {:?}", dropped);
        }
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.send(TraceCommand::SetTimeScale(scale));
    }

    pub fn set_amplitude_scale(&mut self, scale: f32) {
        self.send(TraceCommand::SetAmplitudeScale(scale));
    }

    pub fn set_trigger_level(&mut self, level: f32) {
        self.send(TraceCommand::SetTriggerLevel(level));
    }

    pub fn set_trigger_enabled(&mut self, enabled: bool) {
        self.send(TraceCommand::SetTriggerEnabled(enabled));
    }

    pub fn set_channel_mode(&mut self, mode: ChannelMode) {
        self.send(TraceCommand::SetChannelMode(mode));
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.send(TraceCommand::SetFrozen(frozen));
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.send(TraceCommand::SetViewport { width, height });
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.send(TraceCommand::SetVisible(visible));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_roundtrip() {
        let (tx, mut rx) = command_channel();
        let mut controls = TraceControls::new(tx);

        controls.set_frozen(true);
        controls.set_viewport(800.0, 600.0);

        assert_eq!(rx.pop().unwrap(), TraceCommand::SetFrozen(true));
        assert_eq!(
            rx.pop().unwrap(),
            TraceCommand::SetViewport {
                width: 800.0,
                height: 600.0
            }
        );
        assert!(rx.pop().is_err());
    }

    #[test]
    fn test_overflow_drops_instead_of_blocking() {
        let (tx, _rx) = command_channel();
        let mut controls = TraceControls::new(tx);

        // Twice the capacity: the excess must be dropped, not deadlock.
        for _ in 0..COMMAND_QUEUE_CAPACITY * 2 {
            controls.set_trigger_level(0.5);
        }
    }

    #[test]
    fn test_command_size() {
        // Keep the enum small for cache-efficient lock-free queueing;
        // the largest variant is SetViewport (two f32s + discriminant).
        let size = std::mem::size_of::<TraceCommand>();
        assert!(size <= 16, "TraceCommand is {} bytes, expected <= 16", size);
    }
}
