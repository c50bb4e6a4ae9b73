//! CPAL input stream feeding the capture ring
//!
//! Opens the configured (or default) input device, negotiates an f32 config
//! as close to the requested sample rate as the device allows, prepares the
//! capture buffer with the negotiated rate, and runs the stream whose
//! callback de-interleaves frames into the ring. The callback itself does
//! not allocate, lock, or log.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;

use super::config::FeedConfig;
use super::error::{FeedError, FeedResult};
use crate::capture::{CaptureBuffer, ScopeWriter};
use crate::types::NUM_SCOPE_CHANNELS;

/// Handle that keeps the input stream alive.
///
/// Dropping the handle stops capture; the buffer keeps its last contents.
pub struct FeedHandle {
    _stream: cpal::Stream,
    sample_rate: u32,
    channels: usize,
}

impl FeedHandle {
    /// Negotiated device sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of device channels actually captured (1 or 2)
    pub fn channels(&self) -> usize {
        self.channels
    }
}

/// Open the input device and start feeding `buffer`.
///
/// Prepares the buffer (clearing any previous session) with the negotiated
/// sample rate before the first callback fires.
pub fn start_input_feed(config: &FeedConfig, buffer: Arc<CaptureBuffer>) -> FeedResult<FeedHandle> {
    let host = cpal::default_host();

    let device = match &config.device {
        None => host
            .default_input_device()
            .ok_or(FeedError::NoDefaultDevice)?,
        Some(name) => find_input_device(&host, name)?,
    };

    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
    log::info!("Capture device: {}", device_name);

    let (stream_config, sample_rate) = get_input_config(&device, config)?;
    let channels = (stream_config.channels as usize).min(NUM_SCOPE_CHANNELS);
    log::info!(
        "Capture config: {} channels, {}Hz",
        stream_config.channels,
        sample_rate
    );

    // Clear the ring and publish the session rate before any write lands.
    buffer.prepare(sample_rate as f64);

    let writer = ScopeWriter::new(buffer);
    let callback_channels = stream_config.channels as usize;

    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                writer.process_interleaved(data, callback_channels);
            },
            |err| {
                log::error!("Input stream error: {}", err);
            },
            None,
        )
        .map_err(|e| FeedError::StreamBuildError(e.to_string()))?;

    stream
        .play()
        .map_err(|e| FeedError::StreamPlayError(e.to_string()))?;

    log::info!("Input feed started");

    Ok(FeedHandle {
        _stream: stream,
        sample_rate,
        channels,
    })
}

/// Pick the best input configuration for a device.
///
/// Prefers f32 format and the requested sample rate; falls back to whatever
/// the device offers rather than failing on rate mismatch.
fn get_input_config(
    device: &cpal::Device,
    config: &FeedConfig,
) -> FeedResult<(cpal::StreamConfig, u32)> {
    let supported: Vec<_> = device
        .supported_input_configs()
        .map_err(|e| FeedError::ConfigError(e.to_string()))?
        .collect();

    if supported.is_empty() {
        return Err(FeedError::ConfigError(
            "No supported input configurations".to_string(),
        ));
    }

    let target_rate = config.sample_rate.unwrap_or(crate::types::DEFAULT_SAMPLE_RATE as u32);

    let best = supported
        .iter()
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .filter(|c| target_rate >= c.min_sample_rate().0 && target_rate <= c.max_sample_rate().0)
        .next()
        .or_else(|| {
            supported
                .iter()
                .filter(|c| c.sample_format() == SampleFormat::F32)
                .next()
        })
        .or_else(|| supported.first())
        .ok_or_else(|| FeedError::ConfigError("No suitable input configuration".to_string()))?;

    let sample_rate = if target_rate >= best.min_sample_rate().0
        && target_rate <= best.max_sample_rate().0
    {
        cpal::SampleRate(target_rate)
    } else {
        let fallback = best.max_sample_rate();
        log::warn!(
            "Input device doesn't support {}Hz, falling back to {}Hz",
            target_rate,
            fallback.0
        );
        fallback
    };

    let mut stream_config: cpal::StreamConfig =
        best.clone().with_sample_rate(sample_rate).into();
    if let Some(frames) = config.buffer_size {
        stream_config.buffer_size = cpal::BufferSize::Fixed(frames);
    }

    Ok((stream_config, sample_rate.0))
}

/// Find an input device by name or numeric index.
fn find_input_device(host: &cpal::Host, device_spec: &str) -> FeedResult<cpal::Device> {
    let devices: Vec<_> = host
        .input_devices()
        .map_err(|e| FeedError::DeviceEnumeration(e.to_string()))?
        .collect();

    if let Ok(index) = device_spec.parse::<usize>() {
        return devices
            .into_iter()
            .nth(index)
            .ok_or_else(|| FeedError::DeviceNotFound(format!("index {}", index)));
    }

    devices
        .into_iter()
        .find(|d| d.name().map(|n| n == device_spec).unwrap_or(false))
        .ok_or_else(|| FeedError::DeviceNotFound(device_spec.to_string()))
}
