//! Lock-free capture ring buffer
//!
//! The single shared mutable resource between the audio thread and the
//! render thread. One fixed-capacity circular lane per scope channel; the
//! audio thread overwrites the oldest sample on every write, the render
//! thread copies whatever is there at tick time.
//!
//! # Real-Time Safety
//!
//! The write path is wait-free: one Relaxed store into the current slot and
//! one Release store advancing the cursor. No locks, no allocation, no
//! logging. Do not add a mutex here to "fix" read tearing - a blocked audio
//! callback is an audible dropout, a torn frame at 60Hz is invisible.
//!
//! # Weak Consistency
//!
//! Readers Acquire-load the cursor, then Relaxed-load the slots. A read that
//! overlaps writes observes a mix of old and new samples (a torn view).
//! The display is advisory, the next tick self-corrects, so this is accepted
//! rather than synchronized away. The cursor itself is always a valid index.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crate::types::{Sample, ScopeChannel, DEFAULT_SAMPLE_RATE, NUM_SCOPE_CHANNELS};

/// One channel's circular lane: atomic sample cells plus the write cursor.
///
/// Samples are stored as `f32` bit patterns in `AtomicU32` cells so the
/// writer and readers can race without undefined behavior while keeping the
/// wait-free cost of a plain store.
struct ChannelLane {
    slots: Box<[AtomicU32]>,
    /// Next index to write (0..capacity-1). Counts total writes mod capacity,
    /// so it also marks the oldest-about-to-be-overwritten slot.
    cursor: AtomicUsize,
}

impl ChannelLane {
    fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| AtomicU32::new(0)).collect();
        Self {
            slots,
            cursor: AtomicUsize::new(0),
        }
    }

    fn clear(&self) {
        for slot in self.slots.iter() {
            slot.store(0, Ordering::Relaxed);
        }
        self.cursor.store(0, Ordering::Release);
    }
}

/// Per-channel circular store of the most recent capture window.
///
/// Created once per session, `prepare`d at stream start, and never resized
/// while the feed or the render scheduler is running. Exactly one thread may
/// call [`write`](Self::write) (the audio callback); any thread may observe.
pub struct CaptureBuffer {
    lanes: [ChannelLane; NUM_SCOPE_CHANNELS],
    capacity: usize,
    /// Session sample rate as f64 bits, published by `prepare`
    sample_rate_bits: AtomicU64,
}

impl CaptureBuffer {
    /// Create a buffer with `capacity` samples per channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capture ring capacity must be non-zero");
        Self {
            lanes: std::array::from_fn(|_| ChannelLane::new(capacity)),
            capacity,
            sample_rate_bits: AtomicU64::new(DEFAULT_SAMPLE_RATE.to_bits()),
        }
    }

    /// Prepare for a new processing session: zero every lane, reset the
    /// cursors, and record the session sample rate.
    ///
    /// Must be called before the first `write` of a session, and never
    /// concurrently with an active feed or render tick.
    pub fn prepare(&self, sample_rate: f64) {
        for lane in &self.lanes {
            lane.clear();
        }
        self.sample_rate_bits
            .store(sample_rate.to_bits(), Ordering::Relaxed);
        log::debug!(
            "Capture buffer prepared: {} samples/channel at {}Hz",
            self.capacity,
            sample_rate
        );
    }

    /// Append one sample at the channel's write cursor and advance it.
    ///
    /// Audio-thread only (single writer). Wait-free: no locks, no allocation.
    #[inline]
    pub fn write(&self, channel: ScopeChannel, sample: Sample) {
        let lane = &self.lanes[channel.index()];
        let pos = lane.cursor.load(Ordering::Relaxed);
        lane.slots[pos].store(sample.to_bits(), Ordering::Relaxed);
        lane.cursor.store((pos + 1) % self.capacity, Ordering::Release);
    }

    /// Current write cursor for a channel: the number of writes so far
    /// mod capacity, i.e. the next slot to be overwritten.
    #[inline]
    pub fn cursor(&self, channel: ScopeChannel) -> usize {
        self.lanes[channel.index()].cursor.load(Ordering::Acquire)
    }

    /// Copy the channel's entire lane into `out` (resized to capacity) and
    /// return the write cursor observed before the copy.
    ///
    /// Consumers derive the logical start of the freshest N-sample window as
    /// `(cursor - N + capacity) % capacity`. Before the first full lap the
    /// tail of the copy is stale zeros; that is expected, not an error. The
    /// copy may be torn under concurrent writes (see module docs).
    pub fn read_into(&self, channel: ScopeChannel, out: &mut Vec<Sample>) -> usize {
        let lane = &self.lanes[channel.index()];
        let cursor = lane.cursor.load(Ordering::Acquire);
        out.clear();
        out.extend(
            lane.slots
                .iter()
                .map(|slot| Sample::from_bits(slot.load(Ordering::Relaxed))),
        );
        cursor
    }

    /// Samples per channel. Fixed for the lifetime of the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sample rate of the current session as recorded by `prepare`.
    pub fn sample_rate(&self) -> f64 {
        f64::from_bits(self.sample_rate_bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_CAPACITY;

    #[test]
    fn test_cursor_counts_writes_mod_capacity() {
        let buffer = CaptureBuffer::new(16);
        for k in 0..40usize {
            assert_eq!(buffer.cursor(ScopeChannel::Left), k % 16);
            buffer.write(ScopeChannel::Left, k as Sample);
        }
        assert_eq!(buffer.cursor(ScopeChannel::Left), 40 % 16);
    }

    #[test]
    fn test_write_lands_at_global_count_mod_capacity() {
        let buffer = CaptureBuffer::new(8);
        let mut out = Vec::new();
        // 20 writes: each value k must be found at ring index k % 8
        // (later laps overwrite earlier ones).
        for k in 0..20u32 {
            buffer.write(ScopeChannel::Right, k as Sample);
            buffer.read_into(ScopeChannel::Right, &mut out);
            assert_eq!(out[(k % 8) as usize], k as Sample);
        }
    }

    #[test]
    fn test_wraparound_scenario() {
        // capacity=8, write 1..=10: ring ends up [9,10,3,4,5,6,7,8], cursor 2
        let buffer = CaptureBuffer::new(8);
        for v in 1..=10 {
            buffer.write(ScopeChannel::Left, v as Sample);
        }
        let mut out = Vec::new();
        let cursor = buffer.read_into(ScopeChannel::Left, &mut out);
        assert_eq!(cursor, 2);
        assert_eq!(out, vec![9.0, 10.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_channels_are_independent() {
        let buffer = CaptureBuffer::new(4);
        buffer.write(ScopeChannel::Left, 1.0);
        buffer.write(ScopeChannel::Left, 2.0);
        buffer.write(ScopeChannel::Right, -1.0);
        assert_eq!(buffer.cursor(ScopeChannel::Left), 2);
        assert_eq!(buffer.cursor(ScopeChannel::Right), 1);

        let mut out = Vec::new();
        buffer.read_into(ScopeChannel::Right, &mut out);
        assert_eq!(out, vec![-1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_prepare_clears_and_records_rate() {
        let buffer = CaptureBuffer::new(4);
        for v in 0..7 {
            buffer.write(ScopeChannel::Left, v as Sample);
        }
        buffer.prepare(44100.0);

        assert_eq!(buffer.cursor(ScopeChannel::Left), 0);
        assert_eq!(buffer.sample_rate(), 44100.0);

        let mut out = Vec::new();
        buffer.read_into(ScopeChannel::Left, &mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_read_into_returns_full_backing_store() {
        let buffer = CaptureBuffer::new(DEFAULT_CAPACITY);
        let mut out = Vec::new();
        buffer.read_into(ScopeChannel::Left, &mut out);
        assert_eq!(out.len(), DEFAULT_CAPACITY);
    }
}
