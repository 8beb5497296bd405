//! Single-producer single-consumer sample ring
//!
//! Moves interleaved samples between a hardware callback and the mixer
//! thread in either direction, on top of [`rtrb`]. One slot of the nominal
//! capacity is kept free, so `capacity` slots hold at most `capacity - 1`
//! elements.
//!
//! Writes and reads are bulk copies through rtrb chunks: a copy that crosses
//! the end of the storage is split into its two contiguous halves, and each
//! side publishes its position only after the copy completes.
//!
//! ```text
//!   capture callback ──write()──► RingBuffer ──read()──► mixer thread
//!   mixer thread     ──write()──► RingBuffer ──read()──► playback callback
//! ```

use rtrb::{Consumer, Producer};

fn ring_pair<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    rtrb::RingBuffer::new(capacity.saturating_sub(1))
}

fn push<T: Copy>(producer: &mut Producer<T>, data: &[T]) -> usize {
    let count = data.len().min(producer.slots());
    if count == 0 {
        return 0;
    }
    match producer.write_chunk_uninit(count) {
        Ok(chunk) => chunk.fill_from_iter(data[..count].iter().copied()),
        Err(_) => 0,
    }
}

fn pop<T: Copy>(consumer: &mut Consumer<T>, out: &mut [T]) -> usize {
    let count = out.len().min(consumer.slots());
    if count == 0 {
        return 0;
    }
    let Ok(chunk) = consumer.read_chunk(count) else {
        return 0;
    };
    let (head, tail) = chunk.as_slices();
    out[..head.len()].copy_from_slice(head);
    out[head.len()..count].copy_from_slice(tail);
    chunk.commit_all();
    count
}

/// Unsplit ring buffer
///
/// Usable directly from one thread (tests, offline processing) or split into
/// a [`RingProducer`] / [`RingConsumer`] pair for cross-thread use.
pub struct RingBuffer<T> {
    producer: Producer<T>,
    consumer: Consumer<T>,
    capacity: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// Create a ring buffer with `capacity` slots (`capacity - 1` usable)
    pub fn new(capacity: usize) -> Self {
        let (producer, consumer) = ring_pair(capacity);
        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Reallocate storage, dropping anything buffered
    ///
    /// Requires exclusive access, so it cannot race with reads or writes.
    pub fn resize(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }

    /// Total slot count (one more than the usable capacity)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write up to `data.len()` elements, returning how many fit
    pub fn write(&mut self, data: &[T]) -> usize {
        push(&mut self.producer, data)
    }

    /// Read up to `out.len()` elements, returning how many were buffered
    pub fn read(&mut self, out: &mut [T]) -> usize {
        pop(&mut self.consumer, out)
    }

    /// Elements ready to read
    pub fn available(&self) -> usize {
        self.consumer.slots()
    }

    /// Elements that can be written without overwriting unread data
    pub fn space(&self) -> usize {
        self.producer.slots()
    }

    /// Discard all buffered data
    pub fn reset(&mut self) {
        let buffered = self.consumer.slots();
        if let Ok(chunk) = self.consumer.read_chunk(buffered) {
            chunk.commit_all();
        }
    }

    /// Split into producer/consumer halves for separate threads
    pub fn split(self) -> (RingProducer<T>, RingConsumer<T>) {
        let usable = self.capacity.saturating_sub(1);
        (
            RingProducer {
                inner: self.producer,
                usable,
            },
            RingConsumer {
                inner: self.consumer,
                usable,
            },
        )
    }
}

/// Producer half - the only end allowed to write
pub struct RingProducer<T> {
    inner: Producer<T>,
    usable: usize,
}

impl<T: Copy> RingProducer<T> {
    /// Write up to `data.len()` elements, returning how many fit
    pub fn write(&mut self, data: &[T]) -> usize {
        push(&mut self.inner, data)
    }

    pub fn space(&self) -> usize {
        self.inner.slots()
    }

    pub fn available(&self) -> usize {
        self.usable - self.inner.slots()
    }

    pub fn capacity(&self) -> usize {
        self.usable + 1
    }
}

/// Consumer half - the only end allowed to read
pub struct RingConsumer<T> {
    inner: Consumer<T>,
    usable: usize,
}

impl<T: Copy> RingConsumer<T> {
    /// Read up to `out.len()` elements, returning how many were buffered
    pub fn read(&mut self, out: &mut [T]) -> usize {
        pop(&mut self.inner, out)
    }

    pub fn available(&self) -> usize {
        self.inner.slots()
    }

    pub fn space(&self) -> usize {
        self.usable - self.inner.slots()
    }

    pub fn capacity(&self) -> usize {
        self.usable + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_round_trip_preserves_order() {
        let mut rb = RingBuffer::<i16>::new(16);
        let data: Vec<i16> = (1..=15).collect();

        assert_eq!(rb.write(&data), 15);
        let mut out = vec![0i16; 15];
        assert_eq!(rb.read(&mut out), 15);
        assert_eq!(out, data);
        assert_eq!(rb.available(), 0);
    }

    #[test]
    fn test_partial_write_keeps_one_slot_free() {
        let mut rb = RingBuffer::<i16>::new(8);
        let data: Vec<i16> = (0..10).collect();

        assert_eq!(rb.write(&data), 7);
        assert_eq!(rb.write(&data[7..]), 0);

        let mut out = vec![0i16; 10];
        assert_eq!(rb.read(&mut out), 7);
        assert_eq!(&out[..7], &data[..7]);
    }

    #[test]
    fn test_capacity_invariant_between_operations() {
        let mut rb = RingBuffer::<i16>::new(10);
        let mut scratch = [0i16; 6];
        assert_eq!(rb.available() + rb.space(), 9);

        for step in 0..20 {
            rb.write(&[step as i16; 4]);
            assert_eq!(rb.available() + rb.space(), 9);
            rb.read(&mut scratch[..3]);
            assert_eq!(rb.available() + rb.space(), 9);
        }
    }

    #[test]
    fn test_wraparound_split_copy() {
        let mut rb = RingBuffer::<i16>::new(8);
        let mut out = [0i16; 8];

        // Advance positions so the next write wraps
        assert_eq!(rb.write(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(rb.read(&mut out[..5]), 5);

        assert_eq!(rb.write(&[10, 11, 12, 13, 14, 15]), 6);
        assert_eq!(rb.read(&mut out[..6]), 6);
        assert_eq!(&out[..6], &[10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_under_read_returns_shortfall() {
        let mut rb = RingBuffer::<i16>::new(8);
        rb.write(&[7, 8]);
        let mut out = [0i16; 6];
        assert_eq!(rb.read(&mut out), 2);
        assert_eq!(&out[..2], &[7, 8]);
    }

    #[test]
    fn test_zero_capacity_accepts_nothing() {
        let mut rb = RingBuffer::<i16>::new(0);
        assert_eq!(rb.write(&[1, 2, 3]), 0);
        assert_eq!(rb.read(&mut [0; 3]), 0);
        assert_eq!(rb.space(), 0);
        assert_eq!(rb.available(), 0);
    }

    #[test]
    fn test_resize_resets_positions() {
        let mut rb = RingBuffer::<i16>::new(4);
        rb.write(&[1, 2, 3]);
        rb.resize(32);
        assert_eq!(rb.capacity(), 32);
        assert_eq!(rb.available(), 0);
        assert_eq!(rb.space(), 31);
    }

    #[test]
    fn test_reset_discards_data() {
        let mut rb = RingBuffer::<i16>::new(8);
        rb.write(&[1, 2, 3]);
        rb.reset();
        assert_eq!(rb.available(), 0);
        assert_eq!(rb.space(), 7);
    }

    #[test]
    fn test_split_halves_share_counts() {
        let (mut producer, mut consumer) = RingBuffer::<i16>::new(8).split();
        assert_eq!(producer.capacity(), 8);
        assert_eq!(producer.write(&[1, 2, 3]), 3);
        assert_eq!(producer.available(), 3);
        assert_eq!(producer.space(), 4);
        assert_eq!(consumer.available(), 3);
        assert_eq!(consumer.space(), 4);

        let mut out = [0i16; 2];
        assert_eq!(consumer.read(&mut out), 2);
        assert_eq!(out, [1, 2]);
        assert_eq!(producer.space(), 6);
    }

    #[test]
    fn test_spsc_threads_preserve_sequence() {
        const TOTAL: usize = 100_000;
        let (mut producer, mut consumer) = RingBuffer::<u32>::new(257).split();

        let writer = thread::spawn(move || {
            let data: Vec<u32> = (0..TOTAL as u32).collect();
            let mut offset = 0;
            while offset < TOTAL {
                let end = (offset + 37).min(TOTAL);
                offset += producer.write(&data[offset..end]);
                if offset < end {
                    thread::yield_now();
                }
            }
        });

        let mut received = Vec::with_capacity(TOTAL);
        let mut buf = [0u32; 64];
        while received.len() < TOTAL {
            let n = consumer.read(&mut buf);
            if n == 0 {
                thread::yield_now();
            }
            received.extend_from_slice(&buf[..n]);
        }
        writer.join().unwrap();

        assert!(received.iter().enumerate().all(|(i, v)| *v == i as u32));
    }
}
