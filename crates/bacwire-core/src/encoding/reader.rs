use crate::DecodeError;

/// A decoded value together with the number of input bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub consumed: usize,
}

impl<T> Decoded<T> {
    pub const fn new(value: T, consumed: usize) -> Self {
        Self { value, consumed }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            consumed: self.consumed,
        }
    }
}

/// Result shape of every stream-level decoder: `(value, consumed)` or an error.
pub type DecodeResult<T> = Result<Decoded<T>, DecodeError>;

/// Collapses a [`DecodeResult`] to the classic "consumed length or negative"
/// integer for callers that only need how many bytes a value spans.
pub fn legacy_len<T>(result: &DecodeResult<T>) -> i32 {
    match result {
        Ok(decoded) => i32::try_from(decoded.consumed).unwrap_or(i32::MAX),
        Err(_) => -1,
    }
}

/// Runs `f` over the `bound` bytes of `buf` starting at `offset` and reports
/// how far it read.
pub fn decode_with<'a, T>(
    buf: &'a [u8],
    offset: usize,
    bound: usize,
    f: impl FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
) -> DecodeResult<T> {
    let mut r = Reader::window(buf, offset, bound)?;
    let value = f(&mut r)?;
    Ok(Decoded::new(value, r.position()))
}

#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Reader limited to `buf[offset..offset + bound]`.
    ///
    /// A window reaching past the end of `buf` is a caller bug and yields
    /// [`DecodeError::OutOfBounds`].
    pub fn window(buf: &'a [u8], offset: usize, bound: usize) -> Result<Self, DecodeError> {
        let out_of_bounds = DecodeError::OutOfBounds {
            offset,
            bound,
            len: buf.len(),
        };
        let end = offset.checked_add(bound).ok_or(out_of_bounds)?;
        let window = buf.get(offset..end).ok_or(out_of_bounds)?;
        Ok(Self::new(window))
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }

    pub fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_be_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.read_exact(8)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(out))
    }
}
