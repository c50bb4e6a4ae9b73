//! Scope Trace - render side of the oscilloscope
//!
//! Consumes the capture ring maintained by `scope-core` and turns it into
//! stable display-space polylines: a bounded rising-edge trigger search
//! aligns successive windows, the sampler maps them onto viewport columns,
//! freeze snapshots pin the display without pausing capture, and a 60Hz
//! scheduler thread runs the whole pass and publishes trace frames.
//!
//! Drawing the polylines (lines, grid, colors) is the embedding front end's
//! job; this crate stops at geometry.

pub mod command;
pub mod display;
pub mod freeze;
pub mod pipeline;
pub mod scheduler;
pub mod trace;
pub mod trigger;

pub use command::{command_channel, TraceCommand, TraceControls};
pub use display::{ChannelMode, DisplayConfig, Viewport};
pub use pipeline::TracePipeline;
pub use scheduler::{RenderScheduler, SchedulerHandle, TraceFrame, TICK_HZ};
pub use trace::{ChannelTrace, TracePoint};
