//! Input feed error types

use thiserror::Error;

/// Errors that can occur while opening the capture input stream
#[derive(Error, Debug)]
pub enum FeedError {
    /// No default input device available
    #[error("No audio input device available")]
    NoDefaultDevice,

    /// Named device not found
    #[error("Audio input device not found: {0}")]
    DeviceNotFound(String),

    /// Failed to enumerate devices
    #[error("Failed to enumerate input devices: {0}")]
    DeviceEnumeration(String),

    /// Failed to get device configuration
    #[error("Failed to get input config: {0}")]
    ConfigError(String),

    /// Failed to build the input stream
    #[error("Failed to build input stream: {0}")]
    StreamBuildError(String),

    /// Failed to start the input stream
    #[error("Failed to start input stream: {0}")]
    StreamPlayError(String),
}

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
