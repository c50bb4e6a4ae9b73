//! Input feed configuration

use serde::{Deserialize, Serialize};

/// Configuration for the capture input stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Input device name or numeric index; `None` uses the system default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Requested sample rate in Hz; the device may negotiate a different one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Requested stream buffer size in frames; `None` lets the system choose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<u32>,
}
