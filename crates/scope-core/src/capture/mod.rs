//! Sample capture: the audio-rate half of the scope
//!
//! Two independent rate domains meet here. The audio thread owns the write
//! side ([`ScopeWriter`] -> [`CaptureBuffer`]); the render thread observes
//! through [`CaptureBuffer::read_into`] at tick rate. There is deliberately
//! no mutual exclusion between them - see the ring module docs for the
//! weak-consistency contract.

mod ring;
mod writer;

pub use ring::CaptureBuffer;
pub use writer::ScopeWriter;
