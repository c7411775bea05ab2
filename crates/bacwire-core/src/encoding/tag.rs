use crate::encoding::{
    buffer::EncodeBuffer,
    reader::{decode_with, DecodeResult, Reader},
};
use crate::DecodeError;

const CONTEXT_BIT: u8 = 0b0000_1000;
const EXTENDED_TAG_NUM: u8 = 0xF0;
const LEN_EXTENDED: u8 = 5;
const LEN_OPENING: u8 = 6;
const LEN_CLOSING: u8 = 7;

/// Application tag numbers 0..=12 as they appear in the tag byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::SignedInt),
            4 => Ok(Self::Real),
            5 => Ok(Self::Double),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            8 => Ok(Self::BitString),
            9 => Ok(Self::Enumerated),
            10 => Ok(Self::Date),
            11 => Ok(Self::Time),
            12 => Ok(Self::ObjectId),
            _ => Err(DecodeError::InvalidTag),
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: AppTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

impl Tag {
    pub fn encode(self, w: &mut EncodeBuffer) {
        match self {
            Tag::Application { tag, len } => encode_tag(w, tag as u8, false, len),
            Tag::Context { tag_num, len } => encode_tag(w, tag_num, true, len),
            Tag::Opening { tag_num } => encode_open_close(w, tag_num, LEN_OPENING),
            Tag::Closing { tag_num } => encode_open_close(w, tag_num, LEN_CLOSING),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let (first, tag_num) = read_tag_number(r)?;
        let class_context = is_context_specific(first);

        match (class_context, first & 0x07) {
            (true, LEN_OPENING) => Ok(Tag::Opening { tag_num }),
            (true, LEN_CLOSING) => Ok(Tag::Closing { tag_num }),
            (false, LEN_OPENING | LEN_CLOSING) => Err(DecodeError::InvalidTag),
            (true, len_code) => Ok(Tag::Context {
                tag_num,
                len: decode_len(r, len_code)?,
            }),
            (false, len_code) => Ok(Tag::Application {
                tag: AppTag::from_u8(tag_num)?,
                len: decode_len(r, len_code)?,
            }),
        }
    }

    /// Decodes the next tag without consuming it.
    pub fn peek(r: &Reader<'_>) -> Result<Self, DecodeError> {
        let mut ahead = *r;
        Tag::decode(&mut ahead)
    }

    pub const fn tag_num(self) -> u8 {
        match self {
            Tag::Application { tag, .. } => tag as u8,
            Tag::Context { tag_num, .. }
            | Tag::Opening { tag_num }
            | Tag::Closing { tag_num } => tag_num,
        }
    }

    /// Length of the header on the wire, excluding any payload.
    pub const fn encoded_len(self) -> usize {
        let num_len = if self.tag_num() <= 14 { 1 } else { 2 };
        match self {
            Tag::Application { len, .. } | Tag::Context { len, .. } => {
                num_len + extended_len_size(len)
            }
            Tag::Opening { .. } | Tag::Closing { .. } => num_len,
        }
    }
}

pub const fn is_context_specific(byte: u8) -> bool {
    (byte & CONTEXT_BIT) != 0
}

pub const fn is_opening_tag(byte: u8) -> bool {
    (byte & 0x0F) == (CONTEXT_BIT | LEN_OPENING)
}

pub const fn is_closing_tag(byte: u8) -> bool {
    (byte & 0x0F) == (CONTEXT_BIT | LEN_CLOSING)
}

pub const fn is_extended_tag_number(byte: u8) -> bool {
    (byte & EXTENDED_TAG_NUM) == EXTENDED_TAG_NUM
}

/// Writes a tag header. `len_or_value` is the payload length, or for an
/// application boolean the value itself.
pub fn encode_tag(w: &mut EncodeBuffer, tag_num: u8, is_context: bool, len_or_value: u32) {
    let mut first = tag_num_bits(tag_num);

    if is_context {
        first |= CONTEXT_BIT;
    }

    let len_code = if len_or_value <= 4 {
        len_or_value as u8
    } else {
        LEN_EXTENDED
    };

    first |= len_code;
    w.write_u8(first);

    if tag_num > 14 {
        w.write_u8(tag_num);
    }

    if len_code == LEN_EXTENDED {
        if len_or_value <= 253 {
            w.write_u8(len_or_value as u8);
        } else if len_or_value <= 65535 {
            w.write_u8(254);
            w.write_be_u16(len_or_value as u16);
        } else {
            w.write_u8(255);
            w.write_be_u32(len_or_value);
        }
    }
}

pub fn encode_opening_tag(w: &mut EncodeBuffer, tag_num: u8) {
    encode_open_close(w, tag_num, LEN_OPENING);
}

pub fn encode_closing_tag(w: &mut EncodeBuffer, tag_num: u8) {
    encode_open_close(w, tag_num, LEN_CLOSING);
}

/// Decodes the tag at `buf[offset..]` into `(tag_number, length_or_value)`.
///
/// Opening and closing tags carry no length and report a value of 0; use
/// [`is_opening_tag`] / [`is_closing_tag`] on the first byte to tell them
/// apart from an empty primitive.
pub fn decode_tag_number_and_value(buf: &[u8], offset: usize) -> DecodeResult<(u8, u32)> {
    let bound = buf.len().saturating_sub(offset);
    decode_with(buf, offset, bound, |r| {
        let (first, tag_num) = read_tag_number(r)?;
        let value = match first & 0x07 {
            LEN_OPENING | LEN_CLOSING if is_context_specific(first) => 0,
            LEN_OPENING | LEN_CLOSING => return Err(DecodeError::InvalidTag),
            len_code => decode_len(r, len_code)?,
        };
        Ok((tag_num, value))
    })
}

const fn tag_num_bits(tag_num: u8) -> u8 {
    if tag_num <= 14 {
        tag_num << 4
    } else {
        EXTENDED_TAG_NUM
    }
}

const fn extended_len_size(len: u32) -> usize {
    if len <= 4 {
        0
    } else if len <= 253 {
        1
    } else if len <= 65535 {
        3
    } else {
        5
    }
}

fn encode_open_close(w: &mut EncodeBuffer, tag_num: u8, len_code: u8) {
    w.write_u8(tag_num_bits(tag_num) | CONTEXT_BIT | len_code);
    if tag_num > 14 {
        w.write_u8(tag_num);
    }
}

fn read_tag_number(r: &mut Reader<'_>) -> Result<(u8, u8), DecodeError> {
    let first = r.read_u8()?;
    let tag_num = if is_extended_tag_number(first) {
        r.read_u8()?
    } else {
        first >> 4
    };
    Ok((first, tag_num))
}

fn decode_len(r: &mut Reader<'_>, len_code: u8) -> Result<u32, DecodeError> {
    match len_code {
        0..=4 => Ok(len_code as u32),
        LEN_EXTENDED => {
            let v = r.read_u8()?;
            if v <= 253 {
                Ok(v as u32)
            } else if v == 254 {
                Ok(r.read_be_u16()? as u32)
            } else {
                r.read_be_u32()
            }
        }
        _ => Err(DecodeError::InvalidLength),
    }
}
