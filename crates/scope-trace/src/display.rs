//! Display state for the trace pipeline
//!
//! Everything the render pass needs to know about how to draw is collected
//! in [`DisplayConfig`] and passed in explicitly each tick - there is no
//! ambient mutable state, so the pipeline is a pure function of (ring
//! contents, config, viewport) and unit-testable without a UI.

use scope_core::types::ScopeChannel;

/// Time scale slider range (samples-per-pixel multiplier)
pub const TIME_SCALE_RANGE: std::ops::RangeInclusive<f32> = 0.1..=5.0;

/// Amplitude scale slider range (vertical gain)
pub const AMPLITUDE_SCALE_RANGE: std::ops::RangeInclusive<f32> = 0.1..=10.0;

/// Trigger level slider range (normalized display-amplitude units)
pub const TRIGGER_LEVEL_RANGE: std::ops::RangeInclusive<f32> = -1.0..=1.0;

/// Which channel traces to compute and publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    Left,
    Right,
    #[default]
    Stereo,
}

impl ChannelMode {
    /// Whether this mode includes the given channel
    pub fn shows(&self, channel: ScopeChannel) -> bool {
        match self {
            ChannelMode::Left => channel == ScopeChannel::Left,
            ChannelMode::Right => channel == ScopeChannel::Right,
            ChannelMode::Stereo => true,
        }
    }
}

/// Per-tick render parameters, mutated only by control commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    /// Samples-per-pixel multiplier; 1.0 shows one sample per column
    pub time_scale: f32,
    /// Vertical gain; 1.0 maps full scale to 80% of half-height
    pub amplitude_scale: f32,
    /// Normalized threshold the rising-edge search compares against
    pub trigger_level: f32,
    /// When false, traces start at the newest sample instead of a trigger
    pub trigger_enabled: bool,
    /// Which channels are computed
    pub channel_mode: ChannelMode,
    /// Freeze the display on the current capture contents
    pub frozen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            amplitude_scale: 1.0,
            trigger_level: 0.0,
            trigger_enabled: true,
            channel_mode: ChannelMode::default(),
            frozen: false,
        }
    }
}

impl DisplayConfig {
    /// Set the time scale, clamped to the control range
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(*TIME_SCALE_RANGE.start(), *TIME_SCALE_RANGE.end());
    }

    /// Set the amplitude scale, clamped to the control range
    pub fn set_amplitude_scale(&mut self, scale: f32) {
        self.amplitude_scale =
            scale.clamp(*AMPLITUDE_SCALE_RANGE.start(), *AMPLITUDE_SCALE_RANGE.end());
    }

    /// Set the trigger level, clamped to the control range
    pub fn set_trigger_level(&mut self, level: f32) {
        self.trigger_level =
            level.clamp(*TRIGGER_LEVEL_RANGE.start(), *TRIGGER_LEVEL_RANGE.end());
    }
}

/// Display surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport can be drawn into once both dimensions are positive
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_startup_controls() {
        let config = DisplayConfig::default();
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.amplitude_scale, 1.0);
        assert_eq!(config.trigger_level, 0.0);
        assert!(config.trigger_enabled);
        assert_eq!(config.channel_mode, ChannelMode::Stereo);
        assert!(!config.frozen);
    }

    #[test]
    fn test_setters_clamp_to_control_ranges() {
        let mut config = DisplayConfig::default();
        config.set_time_scale(100.0);
        assert_eq!(config.time_scale, 5.0);
        config.set_time_scale(0.0);
        assert_eq!(config.time_scale, 0.1);
        config.set_amplitude_scale(50.0);
        assert_eq!(config.amplitude_scale, 10.0);
        config.set_trigger_level(-3.0);
        assert_eq!(config.trigger_level, -1.0);
    }

    #[test]
    fn test_channel_mode_gating() {
        assert!(ChannelMode::Stereo.shows(ScopeChannel::Left));
        assert!(ChannelMode::Stereo.shows(ScopeChannel::Right));
        assert!(ChannelMode::Left.shows(ScopeChannel::Left));
        assert!(!ChannelMode::Left.shows(ScopeChannel::Right));
        assert!(!ChannelMode::Right.shows(ScopeChannel::Left));
    }

    #[test]
    fn test_viewport_drawable() {
        assert!(!Viewport::default().is_drawable());
        assert!(!Viewport::new(100.0, 0.0).is_drawable());
        assert!(!Viewport::new(-1.0, 50.0).is_drawable());
        assert!(Viewport::new(100.0, 50.0).is_drawable());
    }
}
