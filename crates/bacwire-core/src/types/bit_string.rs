use crate::DecodeError;

/// Largest bit-string payload carried on the wire, in bytes.
pub const MAX_BIT_STRING_BYTES: usize = 15;
/// Largest number of bits a [`BitString`] can hold.
pub const MAX_BIT_STRING_BITS: usize = MAX_BIT_STRING_BYTES * 8;

/// A BACnet bit string of up to 120 bits.
///
/// Bit `n` is stored least-significant-first in `bytes[n / 8]`. On the wire
/// each byte is bit-reversed, so bit 0 becomes the most significant bit of
/// the first payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    bits_used: u8,
    bytes: [u8; MAX_BIT_STRING_BYTES],
}

impl BitString {
    pub const fn empty() -> Self {
        Self {
            bits_used: 0,
            bytes: [0; MAX_BIT_STRING_BYTES],
        }
    }

    /// Builds a bit string from flags, bit 0 first. Flags past
    /// [`MAX_BIT_STRING_BITS`] are ignored.
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut out = Self::empty();
        for (n, bit) in bits.iter().take(MAX_BIT_STRING_BITS).enumerate() {
            out.set_bit(n as u8, *bit);
        }
        out
    }

    pub const fn bits_used(&self) -> u8 {
        self.bits_used
    }

    pub const fn bytes_used(&self) -> usize {
        (self.bits_used as usize).div_ceil(8)
    }

    /// Number of padding bits in the final payload byte.
    pub const fn unused_bits(&self) -> u8 {
        (self.bytes_used() * 8 - self.bits_used as usize) as u8
    }

    pub fn bit(&self, n: u8) -> bool {
        if n >= self.bits_used {
            return false;
        }
        (self.bytes[n as usize / 8] >> (n % 8)) & 1 != 0
    }

    /// Sets bit `n`, growing `bits_used` to cover it. Out-of-range bits are
    /// ignored.
    pub fn set_bit(&mut self, n: u8, value: bool) {
        if n as usize >= MAX_BIT_STRING_BITS {
            return;
        }
        let mask = 1u8 << (n % 8);
        let byte = &mut self.bytes[n as usize / 8];
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        if n >= self.bits_used {
            self.bits_used = n + 1;
        }
    }

    /// Payload bytes in wire order (bit-reversed).
    pub fn wire_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes[..self.bytes_used()]
            .iter()
            .map(|b| b.reverse_bits())
    }

    /// Rebuilds a bit string from the unused-bit count and the wire bytes
    /// that follow it.
    pub fn from_wire(unused_bits: u8, data: &[u8]) -> Result<Self, DecodeError> {
        if unused_bits > 7 || data.len() > MAX_BIT_STRING_BYTES {
            return Err(DecodeError::InvalidValue);
        }
        if data.is_empty() && unused_bits != 0 {
            return Err(DecodeError::InvalidValue);
        }
        let mut out = Self::empty();
        for (slot, b) in out.bytes.iter_mut().zip(data) {
            *slot = b.reverse_bits();
        }
        out.bits_used = (data.len() * 8 - unused_bits as usize) as u8;
        Ok(out)
    }
}
