//! Block write path from the audio callback into the capture ring
//!
//! The audio collaborator hands us a block of frames per callback; this is
//! the loop that fans them into the per-channel lanes. Frame-major order,
//! channels ascending within a frame, so both lanes advance in lockstep
//! through the block.

use std::sync::Arc;

use crate::capture::ring::CaptureBuffer;
use crate::types::{Sample, ScopeChannel, NUM_SCOPE_CHANNELS};

/// Audio-thread handle that feeds a [`CaptureBuffer`] one block at a time.
///
/// Owned by the audio callback. The hot path does not allocate, lock, or log.
pub struct ScopeWriter {
    buffer: Arc<CaptureBuffer>,
}

impl ScopeWriter {
    pub fn new(buffer: Arc<CaptureBuffer>) -> Self {
        Self { buffer }
    }

    /// Write one block of de-interleaved input, one slice per input channel.
    ///
    /// Channels beyond the scope's fixed pair are ignored; a mono input
    /// is mirrored into both lanes so both traces stay live. Slices shorter
    /// than the first one simply stop contributing early.
    pub fn process_block(&self, inputs: &[&[Sample]]) {
        if inputs.is_empty() {
            return;
        }
        let frames = inputs[0].len();
        let channels = inputs.len().min(NUM_SCOPE_CHANNELS);

        for frame in 0..frames {
            for (ch_index, channel) in ScopeChannel::ALL.iter().enumerate().take(channels) {
                let source = inputs[ch_index];
                if frame < source.len() {
                    self.buffer.write(*channel, source[frame]);
                }
            }
            // Mirror mono into the right lane to keep the stereo display live.
            if channels == 1 {
                self.buffer.write(ScopeChannel::Right, inputs[0][frame]);
            }
        }
    }

    /// Write one interleaved block (`frame0_ch0, frame0_ch1, frame1_ch0, ...`),
    /// the layout CPAL input callbacks deliver.
    pub fn process_interleaved(&self, data: &[Sample], num_channels: usize) {
        if num_channels == 0 {
            return;
        }
        for frame in data.chunks_exact(num_channels) {
            match num_channels {
                1 => {
                    self.buffer.write(ScopeChannel::Left, frame[0]);
                    self.buffer.write(ScopeChannel::Right, frame[0]);
                }
                _ => {
                    self.buffer.write(ScopeChannel::Left, frame[0]);
                    self.buffer.write(ScopeChannel::Right, frame[1]);
                }
            }
        }
    }

    /// The buffer this writer feeds.
    pub fn buffer(&self) -> &Arc<CaptureBuffer> {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(buffer: &CaptureBuffer, channel: ScopeChannel) -> (Vec<Sample>, usize) {
        let mut out = Vec::new();
        let cursor = buffer.read_into(channel, &mut out);
        (out, cursor)
    }

    #[test]
    fn test_block_write_advances_both_lanes() {
        let buffer = Arc::new(CaptureBuffer::new(8));
        let writer = ScopeWriter::new(Arc::clone(&buffer));

        let left = [1.0, 2.0, 3.0];
        let right = [-1.0, -2.0, -3.0];
        writer.process_block(&[&left, &right]);

        let (l, lc) = drain(&buffer, ScopeChannel::Left);
        let (r, rc) = drain(&buffer, ScopeChannel::Right);
        assert_eq!(lc, 3);
        assert_eq!(rc, 3);
        assert_eq!(&l[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&r[..3], &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_mono_block_mirrors_to_right() {
        let buffer = Arc::new(CaptureBuffer::new(8));
        let writer = ScopeWriter::new(Arc::clone(&buffer));

        let mono = [0.5, 0.25];
        writer.process_block(&[&mono]);

        let (l, _) = drain(&buffer, ScopeChannel::Left);
        let (r, _) = drain(&buffer, ScopeChannel::Right);
        assert_eq!(&l[..2], &[0.5, 0.25]);
        assert_eq!(&r[..2], &[0.5, 0.25]);
    }

    #[test]
    fn test_extra_input_channels_ignored() {
        let buffer = Arc::new(CaptureBuffer::new(8));
        let writer = ScopeWriter::new(Arc::clone(&buffer));

        let a = [1.0];
        let b = [2.0];
        let c = [3.0];
        writer.process_block(&[&a, &b, &c]);

        assert_eq!(buffer.cursor(ScopeChannel::Left), 1);
        assert_eq!(buffer.cursor(ScopeChannel::Right), 1);
    }

    #[test]
    fn test_interleaved_stereo() {
        let buffer = Arc::new(CaptureBuffer::new(8));
        let writer = ScopeWriter::new(Arc::clone(&buffer));

        writer.process_interleaved(&[1.0, -1.0, 2.0, -2.0], 2);

        let (l, _) = drain(&buffer, ScopeChannel::Left);
        let (r, _) = drain(&buffer, ScopeChannel::Right);
        assert_eq!(&l[..2], &[1.0, 2.0]);
        assert_eq!(&r[..2], &[-1.0, -2.0]);
    }

    #[test]
    fn test_interleaved_mono_mirrors() {
        let buffer = Arc::new(CaptureBuffer::new(8));
        let writer = ScopeWriter::new(Arc::clone(&buffer));

        writer.process_interleaved(&[0.75, 0.5], 1);

        let (l, _) = drain(&buffer, ScopeChannel::Left);
        let (r, _) = drain(&buffer, ScopeChannel::Right);
        assert_eq!(&l[..2], &[0.75, 0.5]);
        assert_eq!(&r[..2], &[0.75, 0.5]);
    }
}
