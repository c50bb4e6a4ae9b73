//! Scope Core - capture side of the oscilloscope
//!
//! An audio-rate producer (the device callback, or any embedding audio
//! processor) writes samples into a lock-free per-channel ring; render-rate
//! consumers read the freshest window from it. This crate owns the shared
//! ring, the block write path, the CPAL input feed, and the persisted
//! capture configuration. Everything display-facing lives in `scope-trace`.

pub mod capture;
pub mod config;
pub mod feed;
pub mod types;

pub use types::*;
