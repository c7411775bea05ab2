use crate::EncodeError;
use log::debug;

const DEFAULT_CAPACITY: usize = 128;
const MIN_GROWTH: usize = 16;

/// Status bits accumulated by an [`EncodeBuffer`] while encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct EncodeFlags(u8);

impl EncodeFlags {
    pub const GOOD: Self = Self(0);
    /// A byte was dropped because a fixed-capacity buffer was full.
    pub const NOT_ENOUGH_BUFFER: Self = Self(0x01);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_good(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// Output cursor that encoders append to.
///
/// An expandable buffer doubles its storage when full. A fixed buffer never
/// grows: bytes past its capacity are dropped and
/// [`EncodeFlags::NOT_ENOUGH_BUFFER`] is raised, but [`position`](Self::position)
/// keeps counting so a dry run over a small buffer still reports the length
/// the full encoding needs.
///
/// The window floor supports segmentation. Bytes whose logical index is below
/// the floor are counted by the window counter but never stored, so after
/// encoding a whole APDU the buffer holds only the suffix starting at the
/// floor.
#[derive(Debug, Clone)]
pub struct EncodeBuffer {
    buf: Vec<u8>,
    pos: usize,
    window_floor: usize,
    window_counter: usize,
    expandable: bool,
    flags: EncodeFlags,
}

impl Default for EncodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeBuffer {
    /// Creates an expandable buffer with a small initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an expandable buffer with `capacity` bytes of initial storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            pos: 0,
            window_floor: 0,
            window_counter: 0,
            expandable: true,
            flags: EncodeFlags::GOOD,
        }
    }

    /// Creates a buffer that never holds more than `capacity` bytes.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            expandable: false,
            ..Self::with_capacity(capacity)
        }
    }

    /// Sets the logical offset below which written bytes are skipped.
    pub fn with_window(mut self, floor: usize) -> Self {
        self.window_floor = floor;
        self
    }

    pub fn set_window_floor(&mut self, floor: usize) {
        self.window_floor = floor;
    }

    pub const fn window_floor(&self) -> usize {
        self.window_floor
    }

    /// Number of bytes offered to the buffer since the last reset, including
    /// the ones skipped by the window.
    pub const fn window_counter(&self) -> usize {
        self.window_counter
    }

    /// Write cursor. May exceed [`capacity`](Self::capacity) on a fixed
    /// buffer that overflowed.
    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub const fn is_expandable(&self) -> bool {
        self.expandable
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub const fn flags(&self) -> EncodeFlags {
        self.flags
    }

    /// Fails with [`EncodeError::BufferTooSmall`] if any byte was dropped.
    pub fn check(&self) -> Result<(), EncodeError> {
        if self.flags.contains(EncodeFlags::NOT_ENOUGH_BUFFER) {
            Err(EncodeError::BufferTooSmall)
        } else {
            Ok(())
        }
    }

    /// The materialised bytes, `[0, position)` clipped to the capacity.
    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.pos.min(self.buf.len())]
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        let end = self.pos.min(self.buf.len());
        self.buf.truncate(end);
        self.buf
    }

    /// Moves the cursor to `offset` and clears the window counter and flags.
    pub fn reset(&mut self, offset: usize) {
        self.pos = offset;
        self.window_counter = 0;
        self.flags = EncodeFlags::GOOD;
    }

    pub fn write_u8(&mut self, value: u8) {
        if self.window_counter >= self.window_floor {
            if self.pos >= self.buf.len() && self.expandable {
                self.grow(self.pos + 1);
            }
            match self.buf.get_mut(self.pos) {
                Some(slot) => *slot = value,
                None => self.overflow(),
            }
            self.pos += 1;
        }
        self.window_counter += 1;
    }

    pub fn write_all(&mut self, data: &[u8]) {
        let skipped = self
            .window_floor
            .saturating_sub(self.window_counter)
            .min(data.len());
        self.window_counter += skipped;
        let data = &data[skipped..];
        if data.is_empty() {
            return;
        }

        let end = self.pos + data.len();
        if end > self.buf.len() && self.expandable {
            self.grow(end);
        }
        if end <= self.buf.len() {
            self.buf[self.pos..end].copy_from_slice(data);
        } else {
            if self.pos < self.buf.len() {
                let fits = self.buf.len() - self.pos;
                self.buf[self.pos..].copy_from_slice(&data[..fits]);
            }
            self.overflow();
        }
        self.pos = end;
        self.window_counter += data.len();
    }

    pub fn write_be_u16(&mut self, value: u16) {
        self.write_all(&value.to_be_bytes());
    }

    pub fn write_be_u32(&mut self, value: u32) {
        self.write_all(&value.to_be_bytes());
    }

    pub fn write_be_u64(&mut self, value: u64) {
        self.write_all(&value.to_be_bytes());
    }

    fn grow(&mut self, needed: usize) {
        let mut len = self.buf.len().max(MIN_GROWTH);
        while len < needed {
            len *= 2;
        }
        self.buf.resize(len, 0);
    }

    fn overflow(&mut self) {
        if !self.flags.contains(EncodeFlags::NOT_ENOUGH_BUFFER) {
            debug!(
                "encode buffer full at offset {} (capacity {})",
                self.pos,
                self.buf.len()
            );
        }
        self.flags.insert(EncodeFlags::NOT_ENOUGH_BUFFER);
    }
}

#[cfg(test)]
mod tests {
    use super::{EncodeBuffer, EncodeFlags};
    use crate::EncodeError;
    use proptest::prelude::*;

    #[test]
    fn buffer_writes_values() {
        let mut w = EncodeBuffer::fixed(4);
        w.write_u8(1);
        w.write_all(&[2, 3]);
        assert_eq!(w.as_written(), &[1, 2, 3]);
        assert!(w.flags().is_good());
    }

    #[test]
    fn fixed_buffer_counts_past_capacity() {
        let mut w = EncodeBuffer::fixed(2);
        w.write_u8(1);
        w.write_be_u32(0x0203_0405);
        w.write_u8(6);
        assert_eq!(w.position(), 6);
        assert_eq!(w.as_written(), &[1, 2]);
        assert!(w.flags().contains(EncodeFlags::NOT_ENOUGH_BUFFER));
        assert_eq!(w.check().unwrap_err(), EncodeError::BufferTooSmall);
    }

    #[test]
    fn expandable_buffer_doubles() {
        let mut w = EncodeBuffer::with_capacity(16);
        w.write_all(&[0xAA; 17]);
        assert_eq!(w.capacity(), 32);
        w.write_all(&[0xBB; 40]);
        assert_eq!(w.capacity(), 64);
        assert_eq!(w.position(), 57);
        assert!(w.check().is_ok());
    }

    #[test]
    fn zero_capacity_expandable_buffer_grows() {
        let mut w = EncodeBuffer::with_capacity(0);
        w.write_u8(9);
        assert_eq!(w.as_written(), &[9]);
    }

    #[test]
    fn window_floor_skips_prefix() {
        let mut w = EncodeBuffer::new().with_window(3);
        w.write_u8(0);
        w.write_all(&[1, 2, 3, 4]);
        w.write_u8(5);
        assert_eq!(w.as_written(), &[3, 4, 5]);
        assert_eq!(w.window_counter(), 6);
        assert_eq!(w.position(), 3);
    }

    #[test]
    fn reset_clears_state() {
        let mut w = EncodeBuffer::fixed(1);
        w.write_all(&[1, 2]);
        w.reset(0);
        assert!(w.flags().is_good());
        assert_eq!(w.window_counter(), 0);
        w.write_u8(7);
        assert_eq!(w.into_vec(), vec![7]);
    }

    proptest! {
        #[test]
        fn fixed_buffer_keeps_prefix(
            chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..8), 0..8),
            cap in 0usize..40,
        ) {
            let mut w = EncodeBuffer::fixed(cap);
            let mut all = Vec::new();
            for chunk in &chunks {
                if chunk.len() == 1 {
                    w.write_u8(chunk[0]);
                } else {
                    w.write_all(chunk);
                }
                all.extend_from_slice(chunk);
            }
            prop_assert_eq!(w.position(), all.len());
            let kept = all.len().min(cap);
            prop_assert_eq!(w.as_written(), &all[..kept]);
            prop_assert_eq!(w.check().is_err(), all.len() > cap);
        }

        #[test]
        fn window_keeps_suffix(
            chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..8), 0..8),
            floor in 0usize..40,
        ) {
            let mut w = EncodeBuffer::with_capacity(4).with_window(floor);
            let mut all = Vec::new();
            for chunk in &chunks {
                if chunk.len() == 1 {
                    w.write_u8(chunk[0]);
                } else {
                    w.write_all(chunk);
                }
                all.extend_from_slice(chunk);
            }
            let start = floor.min(all.len());
            prop_assert_eq!(w.as_written(), &all[start..]);
            prop_assert_eq!(w.window_counter(), all.len());
        }
    }
}
