use crate::encoding::{
    buffer::EncodeBuffer,
    reader::Reader,
    tag::{AppTag, Tag},
};
use crate::types::{BitString, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};
use log::trace;

pub(crate) fn u32_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

/// Bytes [`encode_unsigned`] writes for `value`.
pub const fn unsigned_len(value: u32) -> usize {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFF_FFFF {
        3
    } else {
        4
    }
}

pub fn encode_unsigned(w: &mut EncodeBuffer, value: u32) -> usize {
    let len = unsigned_len(value);
    w.write_all(&value.to_be_bytes()[4 - len..]);
    len
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u32;
    for _ in 0..len {
        value = (value << 8) | r.read_u8()? as u32;
    }
    Ok(value)
}

/// Bytes [`encode_signed`] writes for `value`: the shortest two's-complement
/// form whose leading bit carries the sign, widening from 4 straight to 8.
pub const fn signed_len(value: i64) -> usize {
    if value >= -128 && value <= 127 {
        1
    } else if value >= -32_768 && value <= 32_767 {
        2
    } else if value >= -8_388_608 && value <= 8_388_607 {
        3
    } else if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
        4
    } else {
        8
    }
}

pub fn encode_signed(w: &mut EncodeBuffer, value: i64) -> usize {
    let len = signed_len(value);
    w.write_all(&value.to_be_bytes()[8 - len..]);
    len
}

pub fn decode_signed(r: &mut Reader<'_>, len: usize) -> Result<i64, DecodeError> {
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength);
    }

    let bytes = r.read_exact(len)?;
    let fill = if (bytes[0] & 0x80) != 0 { 0xFF } else { 0x00 };
    let mut out = [fill; 8];
    out[8 - len..].copy_from_slice(bytes);
    Ok(i64::from_be_bytes(out))
}

pub fn encode_real(w: &mut EncodeBuffer, value: f32) {
    w.write_be_u32(value.to_bits());
}

pub fn decode_real(r: &mut Reader<'_>, len: usize) -> Result<f32, DecodeError> {
    if len != 4 {
        return Err(DecodeError::InvalidLength);
    }
    Ok(f32::from_bits(r.read_be_u32()?))
}

pub fn encode_double(w: &mut EncodeBuffer, value: f64) {
    w.write_be_u64(value.to_bits());
}

pub fn decode_double(r: &mut Reader<'_>, len: usize) -> Result<f64, DecodeError> {
    if len != 8 {
        return Err(DecodeError::InvalidLength);
    }
    Ok(f64::from_bits(r.read_be_u64()?))
}

pub fn encode_date(w: &mut EncodeBuffer, value: &Date) {
    w.write_all(&value.to_bytes());
}

pub fn decode_date(r: &mut Reader<'_>, len: usize) -> Result<Date, DecodeError> {
    if len != 4 {
        return Err(DecodeError::InvalidLength);
    }
    let b = r.read_exact(4)?;
    Ok(Date::from_bytes([b[0], b[1], b[2], b[3]]))
}

pub fn encode_time(w: &mut EncodeBuffer, value: &Time) {
    w.write_all(&value.to_bytes());
}

/// Decodes a time. Hundredths above 100 are read as 0 unless the whole value
/// is the unspecified wildcard.
pub fn decode_time(r: &mut Reader<'_>, len: usize) -> Result<Time, DecodeError> {
    if len != 4 {
        return Err(DecodeError::InvalidLength);
    }
    let b = r.read_exact(4)?;
    let mut time = Time::from_bytes([b[0], b[1], b[2], b[3]]);
    if !time.is_unspecified() && time.hundredths > 100 {
        trace!("clamping time hundredths {} to 0", time.hundredths);
        time.hundredths = 0;
    }
    Ok(time)
}

pub fn encode_object_id(w: &mut EncodeBuffer, value: ObjectId) {
    w.write_be_u32(value.raw());
}

pub fn decode_object_id(r: &mut Reader<'_>, len: usize) -> Result<ObjectId, DecodeError> {
    if len != 4 {
        return Err(DecodeError::InvalidLength);
    }
    Ok(ObjectId::from_raw(r.read_be_u32()?))
}

/// Payload length of a bit string: the unused-bit byte plus the data bytes.
pub const fn bit_string_len(value: &BitString) -> usize {
    1 + value.bytes_used()
}

pub fn encode_bit_string(w: &mut EncodeBuffer, value: &BitString) {
    w.write_u8(value.unused_bits());
    for b in value.wire_bytes() {
        w.write_u8(b);
    }
}

pub fn decode_bit_string(r: &mut Reader<'_>, len: usize) -> Result<BitString, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    BitString::from_wire(raw[0], &raw[1..])
}

pub fn encode_app_null(w: &mut EncodeBuffer) {
    Tag::Application {
        tag: AppTag::Null,
        len: 0,
    }
    .encode(w);
}

/// Application booleans carry the value in the length field.
pub fn encode_app_boolean(w: &mut EncodeBuffer, value: bool) {
    Tag::Application {
        tag: AppTag::Boolean,
        len: u32::from(value),
    }
    .encode(w);
}

pub fn encode_app_unsigned(w: &mut EncodeBuffer, value: u32) {
    app_tag(w, AppTag::UnsignedInt, unsigned_len(value));
    encode_unsigned(w, value);
}

pub fn encode_app_enumerated(w: &mut EncodeBuffer, value: u32) {
    app_tag(w, AppTag::Enumerated, unsigned_len(value));
    encode_unsigned(w, value);
}

pub fn encode_app_signed(w: &mut EncodeBuffer, value: i64) {
    app_tag(w, AppTag::SignedInt, signed_len(value));
    encode_signed(w, value);
}

pub fn encode_app_real(w: &mut EncodeBuffer, value: f32) {
    app_tag(w, AppTag::Real, 4);
    encode_real(w, value);
}

pub fn encode_app_double(w: &mut EncodeBuffer, value: f64) {
    app_tag(w, AppTag::Double, 8);
    encode_double(w, value);
}

pub fn encode_app_octet_string(w: &mut EncodeBuffer, value: &[u8]) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::OctetString,
        len: u32_len(value.len())?,
    }
    .encode(w);
    w.write_all(value);
    Ok(())
}

pub fn encode_app_bit_string(w: &mut EncodeBuffer, value: &BitString) {
    app_tag(w, AppTag::BitString, bit_string_len(value));
    encode_bit_string(w, value);
}

pub fn encode_app_date(w: &mut EncodeBuffer, value: &Date) {
    app_tag(w, AppTag::Date, 4);
    encode_date(w, value);
}

pub fn encode_app_time(w: &mut EncodeBuffer, value: &Time) {
    app_tag(w, AppTag::Time, 4);
    encode_time(w, value);
}

pub fn encode_app_object_id(w: &mut EncodeBuffer, value: ObjectId) {
    app_tag(w, AppTag::ObjectId, 4);
    encode_object_id(w, value);
}

/// Context booleans always carry one payload byte.
pub fn encode_ctx_boolean(w: &mut EncodeBuffer, tag_num: u8, value: bool) {
    Tag::Context { tag_num, len: 1 }.encode(w);
    w.write_u8(u8::from(value));
}

pub fn encode_ctx_unsigned(w: &mut EncodeBuffer, tag_num: u8, value: u32) {
    ctx_tag(w, tag_num, unsigned_len(value));
    encode_unsigned(w, value);
}

pub fn encode_ctx_enumerated(w: &mut EncodeBuffer, tag_num: u8, value: u32) {
    encode_ctx_unsigned(w, tag_num, value);
}

pub fn encode_ctx_signed(w: &mut EncodeBuffer, tag_num: u8, value: i64) {
    ctx_tag(w, tag_num, signed_len(value));
    encode_signed(w, value);
}

pub fn encode_ctx_real(w: &mut EncodeBuffer, tag_num: u8, value: f32) {
    ctx_tag(w, tag_num, 4);
    encode_real(w, value);
}

pub fn encode_ctx_double(w: &mut EncodeBuffer, tag_num: u8, value: f64) {
    ctx_tag(w, tag_num, 8);
    encode_double(w, value);
}

pub fn encode_ctx_octet_string(
    w: &mut EncodeBuffer,
    tag_num: u8,
    value: &[u8],
) -> Result<(), EncodeError> {
    Tag::Context {
        tag_num,
        len: u32_len(value.len())?,
    }
    .encode(w);
    w.write_all(value);
    Ok(())
}

pub fn encode_ctx_bit_string(w: &mut EncodeBuffer, tag_num: u8, value: &BitString) {
    ctx_tag(w, tag_num, bit_string_len(value));
    encode_bit_string(w, value);
}

pub fn encode_ctx_date(w: &mut EncodeBuffer, tag_num: u8, value: &Date) {
    ctx_tag(w, tag_num, 4);
    encode_date(w, value);
}

pub fn encode_ctx_time(w: &mut EncodeBuffer, tag_num: u8, value: &Time) {
    ctx_tag(w, tag_num, 4);
    encode_time(w, value);
}

pub fn encode_ctx_object_id(w: &mut EncodeBuffer, tag_num: u8, value: ObjectId) {
    ctx_tag(w, tag_num, 4);
    encode_object_id(w, value);
}

/// Reads an application tag and checks it is `expected`, returning its length.
pub fn expect_app(r: &mut Reader<'_>, expected: AppTag) -> Result<usize, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application { tag, len } if tag == expected => Ok(len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// Reads a context tag and checks its number, returning its length.
pub fn expect_ctx(r: &mut Reader<'_>, expected_tag_num: u8) -> Result<usize, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len } if tag_num == expected_tag_num => Ok(len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn expect_opening(r: &mut Reader<'_>, expected_tag_num: u8) -> Result<(), DecodeError> {
    match Tag::decode(r)? {
        Tag::Opening { tag_num } if tag_num == expected_tag_num => Ok(()),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn expect_closing(r: &mut Reader<'_>, expected_tag_num: u8) -> Result<(), DecodeError> {
    match Tag::decode(r)? {
        Tag::Closing { tag_num } if tag_num == expected_tag_num => Ok(()),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// True when the next tag is the context tag `tag_num` (primitive form).
pub fn next_is_ctx(r: &Reader<'_>, tag_num: u8) -> bool {
    matches!(Tag::peek(r), Ok(Tag::Context { tag_num: n, .. }) if n == tag_num)
}

pub fn next_is_opening(r: &Reader<'_>, tag_num: u8) -> bool {
    matches!(Tag::peek(r), Ok(Tag::Opening { tag_num: n }) if n == tag_num)
}

pub fn decode_app_boolean(r: &mut Reader<'_>) -> Result<bool, DecodeError> {
    let len = expect_app(r, AppTag::Boolean)?;
    Ok(len != 0)
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let len = expect_app(r, AppTag::UnsignedInt)?;
    decode_unsigned(r, len)
}

pub fn decode_app_enumerated(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let len = expect_app(r, AppTag::Enumerated)?;
    decode_unsigned(r, len)
}

pub fn decode_app_signed(r: &mut Reader<'_>) -> Result<i64, DecodeError> {
    let len = expect_app(r, AppTag::SignedInt)?;
    decode_signed(r, len)
}

pub fn decode_app_real(r: &mut Reader<'_>) -> Result<f32, DecodeError> {
    let len = expect_app(r, AppTag::Real)?;
    decode_real(r, len)
}

pub fn decode_app_double(r: &mut Reader<'_>) -> Result<f64, DecodeError> {
    let len = expect_app(r, AppTag::Double)?;
    decode_double(r, len)
}

pub fn decode_app_octet_string<'a>(r: &mut Reader<'a>) -> Result<&'a [u8], DecodeError> {
    let len = expect_app(r, AppTag::OctetString)?;
    r.read_exact(len)
}

pub fn decode_app_bit_string(r: &mut Reader<'_>) -> Result<BitString, DecodeError> {
    let len = expect_app(r, AppTag::BitString)?;
    decode_bit_string(r, len)
}

pub fn decode_app_date(r: &mut Reader<'_>) -> Result<Date, DecodeError> {
    let len = expect_app(r, AppTag::Date)?;
    decode_date(r, len)
}

pub fn decode_app_time(r: &mut Reader<'_>) -> Result<Time, DecodeError> {
    let len = expect_app(r, AppTag::Time)?;
    decode_time(r, len)
}

pub fn decode_app_object_id(r: &mut Reader<'_>) -> Result<ObjectId, DecodeError> {
    let len = expect_app(r, AppTag::ObjectId)?;
    decode_object_id(r, len)
}

pub fn decode_ctx_boolean(r: &mut Reader<'_>, tag_num: u8) -> Result<bool, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_context_boolean_payload(r, len)
}

pub fn decode_ctx_unsigned(r: &mut Reader<'_>, tag_num: u8) -> Result<u32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_unsigned(r, len)
}

pub fn decode_ctx_real(r: &mut Reader<'_>, tag_num: u8) -> Result<f32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_real(r, len)
}

pub fn decode_ctx_time(r: &mut Reader<'_>, tag_num: u8) -> Result<Time, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_time(r, len)
}

pub fn decode_ctx_object_id(r: &mut Reader<'_>, tag_num: u8) -> Result<ObjectId, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_object_id(r, len)
}

/// Decodes the context tag `tag_num` as an unsigned if it is next, otherwise
/// leaves the reader untouched.
pub fn decode_optional_ctx_unsigned(
    r: &mut Reader<'_>,
    tag_num: u8,
) -> Result<Option<u32>, DecodeError> {
    if next_is_ctx(r, tag_num) {
        decode_ctx_unsigned(r, tag_num).map(Some)
    } else {
        Ok(None)
    }
}

pub(crate) fn decode_context_boolean_payload(
    r: &mut Reader<'_>,
    len: usize,
) -> Result<bool, DecodeError> {
    if len != 1 {
        return Err(DecodeError::InvalidLength);
    }
    Ok(r.read_u8()? != 0)
}

fn app_tag(w: &mut EncodeBuffer, tag: AppTag, len: usize) {
    Tag::Application {
        tag,
        len: len as u32,
    }
    .encode(w);
}

fn ctx_tag(w: &mut EncodeBuffer, tag_num: u8, len: usize) {
    Tag::Context {
        tag_num,
        len: len as u32,
    }
    .encode(w);
}
