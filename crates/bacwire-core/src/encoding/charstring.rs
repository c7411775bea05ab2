//! Character string payloads: a character-set byte followed by the encoded
//! text.

use crate::encoding::{
    buffer::EncodeBuffer,
    primitives::u32_len,
    reader::Reader,
    tag::{AppTag, Tag},
};
use crate::{DecodeError, EncodeError};
use log::debug;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterSet {
    Utf8 = 0,
    MsDbcs = 1,
    JisX0208 = 2,
    Ucs4 = 3,
    Ucs2 = 4,
    Iso8859_1 = 5,
}

impl CharacterSet {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Utf8),
            1 => Some(Self::MsDbcs),
            2 => Some(Self::JisX0208),
            3 => Some(Self::Ucs4),
            4 => Some(Self::Ucs2),
            5 => Some(Self::Iso8859_1),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Builds the payload (character-set byte included) for `value`.
///
/// DBCS and JIS X 0208 need code page tables and are not produced. Characters
/// outside Latin-1 are written as `?` in ISO 8859-1.
pub fn character_string_payload(
    value: &str,
    charset: CharacterSet,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(value.len() + 1);
    out.push(charset.to_u8());
    match charset {
        CharacterSet::Utf8 => out.extend_from_slice(value.as_bytes()),
        CharacterSet::Ucs2 => {
            for unit in value.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        CharacterSet::Ucs4 => {
            for c in value.chars() {
                out.extend_from_slice(&(c as u32).to_be_bytes());
            }
        }
        CharacterSet::Iso8859_1 => {
            out.extend(value.chars().map(|c| u8::try_from(c as u32).unwrap_or(b'?')));
        }
        CharacterSet::MsDbcs | CharacterSet::JisX0208 => return Err(EncodeError::Unsupported),
    }
    Ok(out)
}

pub fn encode_app_character_string(
    w: &mut EncodeBuffer,
    value: &str,
    charset: CharacterSet,
) -> Result<(), EncodeError> {
    let payload = character_string_payload(value, charset)?;
    Tag::Application {
        tag: AppTag::CharacterString,
        len: u32_len(payload.len())?,
    }
    .encode(w);
    w.write_all(&payload);
    Ok(())
}

pub fn encode_ctx_character_string(
    w: &mut EncodeBuffer,
    tag_num: u8,
    value: &str,
    charset: CharacterSet,
) -> Result<(), EncodeError> {
    let payload = character_string_payload(value, charset)?;
    Tag::Context {
        tag_num,
        len: u32_len(payload.len())?,
    }
    .encode(w);
    w.write_all(&payload);
    Ok(())
}

/// Decodes `len` payload bytes. Only a missing character-set byte is an
/// error; undecodable text is replaced rather than rejected.
pub fn decode_character_string(r: &mut Reader<'_>, len: usize) -> Result<String, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    Ok(decode_text(raw[0], &raw[1..]))
}

pub fn decode_app_character_string(r: &mut Reader<'_>) -> Result<String, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::CharacterString,
            len,
        } => decode_character_string(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// Converts text bytes in the given character set to a `String`.
pub fn decode_text(charset: u8, data: &[u8]) -> String {
    match CharacterSet::from_u8(charset) {
        Some(CharacterSet::Utf8) => String::from_utf8_lossy(data).into_owned(),
        Some(CharacterSet::Ucs2) => decode_ucs2(data),
        Some(CharacterSet::Ucs4) => decode_ucs4(data),
        Some(CharacterSet::Iso8859_1) => data.iter().map(|&b| b as char).collect(),
        Some(CharacterSet::MsDbcs) => {
            // two-byte code page precedes the text
            debug!("DBCS character string read as printable ASCII");
            printable_ascii(data.get(2..).unwrap_or_default())
        }
        Some(CharacterSet::JisX0208) | None => {
            debug!("character set {charset} read as printable ASCII");
            printable_ascii(data)
        }
    }
}

fn printable_ascii(data: &[u8]) -> String {
    data.iter()
        .filter(|b| b.is_ascii_graphic() || **b == b' ')
        .map(|&b| b as char)
        .collect()
}

fn decode_ucs2(data: &[u8]) -> String {
    let (little_endian, body) = match data {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, data),
    };
    let units = body.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        }
    });
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn decode_ucs4(data: &[u8]) -> String {
    let (little_endian, body) = match data {
        [0xFF, 0xFE, 0x00, 0x00, rest @ ..] => (true, rest),
        [0x00, 0x00, 0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, data),
    };
    body.chunks_exact(4)
        .map(|quad| {
            let quad = [quad[0], quad[1], quad[2], quad[3]];
            let code = if little_endian {
                u32::from_le_bytes(quad)
            } else {
                u32::from_be_bytes(quad)
            };
            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect()
}
