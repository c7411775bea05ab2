//! Application value codec: one `ApplicationValue` to and from its tagged
//! wire form.

mod application;
pub mod constructed;
pub mod context;

pub use application::{ApplicationTag, ApplicationValue};
pub use context::{
    context_tag_type, structured_kind, ContextTagResolver, DecodeContext, VendorTagRule,
    VendorTagTable, MAX_NESTING_DEPTH,
};

use crate::encoding::{
    buffer::EncodeBuffer,
    charstring::{
        decode_character_string, encode_app_character_string, encode_ctx_character_string,
        CharacterSet,
    },
    primitives::{
        decode_bit_string, decode_context_boolean_payload, decode_date, decode_double,
        decode_object_id, decode_real, decode_signed, decode_time, decode_unsigned,
        encode_app_bit_string, encode_app_boolean, encode_app_date, encode_app_double,
        encode_app_enumerated, encode_app_null, encode_app_object_id, encode_app_octet_string,
        encode_app_real, encode_app_signed, encode_app_time, encode_app_unsigned,
        encode_ctx_bit_string, encode_ctx_boolean, encode_ctx_date, encode_ctx_double,
        encode_ctx_enumerated, encode_ctx_object_id, encode_ctx_octet_string, encode_ctx_real,
        encode_ctx_signed, encode_ctx_time, encode_ctx_unsigned, u32_len,
    },
    reader::{decode_with, DecodeResult, Reader},
    tag::{encode_closing_tag, encode_opening_tag, AppTag, Tag},
};
use crate::{DecodeError, EncodeError};
use constructed::{
    decode_cov_subscription, decode_destination, decode_device_object_property_reference,
    decode_read_access_result, decode_read_access_specification, decode_time_stamp,
    encode_cov_subscription, encode_date_time, encode_destination,
    encode_device_object_property_reference, encode_error_value, encode_read_access_result,
    encode_read_access_specification, encode_time_stamp,
};
use log::debug;

pub fn encode_application_data(
    w: &mut EncodeBuffer,
    value: &ApplicationValue,
) -> Result<(), EncodeError> {
    match value {
        ApplicationValue::Null => encode_app_null(w),
        ApplicationValue::Boolean(v) => encode_app_boolean(w, *v),
        ApplicationValue::Unsigned(v) => encode_app_unsigned(w, *v),
        ApplicationValue::Signed(v) => encode_app_signed(w, *v),
        ApplicationValue::Real(v) => encode_app_real(w, *v),
        ApplicationValue::Double(v) => encode_app_double(w, *v),
        ApplicationValue::OctetString(v) => encode_app_octet_string(w, v)?,
        ApplicationValue::CharacterString(v) => {
            encode_app_character_string(w, v, CharacterSet::Utf8)?
        }
        ApplicationValue::BitString(v) => encode_app_bit_string(w, v),
        ApplicationValue::Enumerated(v) => encode_app_enumerated(w, *v),
        ApplicationValue::Date(v) => encode_app_date(w, v),
        ApplicationValue::Time(v) => encode_app_time(w, v),
        ApplicationValue::ObjectId(v) => encode_app_object_id(w, *v),
        ApplicationValue::DateTime(v) => encode_date_time(w, v),
        ApplicationValue::TimeStamp(v) => encode_time_stamp(w, v),
        ApplicationValue::Error(v) => encode_error_value(w, v),
        ApplicationValue::DeviceObjectPropertyReference(v) => {
            encode_device_object_property_reference(w, v)
        }
        ApplicationValue::Destination(v) => encode_destination(w, v)?,
        ApplicationValue::CovSubscription(v) => encode_cov_subscription(w, v)?,
        ApplicationValue::ReadAccessSpecification(v) => encode_read_access_specification(w, v),
        ApplicationValue::ReadAccessResult(v) => encode_read_access_result(w, v)?,
        ApplicationValue::ContextDecoded { tag_num, values } => {
            encode_opening_tag(w, *tag_num);
            for child in values {
                encode_application_data(w, child)?;
            }
            encode_closing_tag(w, *tag_num);
        }
        ApplicationValue::ContextEncoded { tag_num, bytes } => {
            encode_ctx_octet_string(w, *tag_num, bytes)?
        }
    }
    Ok(())
}

/// A missing value is written as Null.
pub fn encode_optional_application_data(
    w: &mut EncodeBuffer,
    value: Option<&ApplicationValue>,
) -> Result<(), EncodeError> {
    match value {
        Some(v) => encode_application_data(w, v),
        None => {
            encode_app_null(w);
            Ok(())
        }
    }
}

/// Writes `value` under context tag `tag_num`. Structural values are wrapped
/// in an opening/closing pair.
pub fn encode_context_data(
    w: &mut EncodeBuffer,
    tag_num: u8,
    value: &ApplicationValue,
) -> Result<(), EncodeError> {
    match value {
        ApplicationValue::Null => Tag::Context { tag_num, len: 0 }.encode(w),
        ApplicationValue::Boolean(v) => encode_ctx_boolean(w, tag_num, *v),
        ApplicationValue::Unsigned(v) => encode_ctx_unsigned(w, tag_num, *v),
        ApplicationValue::Signed(v) => encode_ctx_signed(w, tag_num, *v),
        ApplicationValue::Real(v) => encode_ctx_real(w, tag_num, *v),
        ApplicationValue::Double(v) => encode_ctx_double(w, tag_num, *v),
        ApplicationValue::OctetString(v) => encode_ctx_octet_string(w, tag_num, v)?,
        ApplicationValue::CharacterString(v) => {
            encode_ctx_character_string(w, tag_num, v, CharacterSet::Utf8)?
        }
        ApplicationValue::BitString(v) => encode_ctx_bit_string(w, tag_num, v),
        ApplicationValue::Enumerated(v) => encode_ctx_enumerated(w, tag_num, *v),
        ApplicationValue::Date(v) => encode_ctx_date(w, tag_num, v),
        ApplicationValue::Time(v) => encode_ctx_time(w, tag_num, v),
        ApplicationValue::ObjectId(v) => encode_ctx_object_id(w, tag_num, *v),
        ApplicationValue::ContextEncoded { bytes, .. } => {
            Tag::Context {
                tag_num,
                len: u32_len(bytes.len())?,
            }
            .encode(w);
            w.write_all(bytes);
        }
        ApplicationValue::ContextDecoded { values, .. } => {
            encode_opening_tag(w, tag_num);
            for child in values {
                encode_application_data(w, child)?;
            }
            encode_closing_tag(w, tag_num);
        }
        structural => {
            encode_opening_tag(w, tag_num);
            encode_application_data(w, structural)?;
            encode_closing_tag(w, tag_num);
        }
    }
    Ok(())
}

/// Decodes one value from `buf[offset..offset + bound]`.
pub fn decode_application_data(
    buf: &[u8],
    offset: usize,
    bound: usize,
    ctx: &DecodeContext<'_>,
) -> DecodeResult<ApplicationValue> {
    decode_with(buf, offset, bound, |r| decode_value(r, ctx))
}

/// Decodes values back to back until the window ends or a closing tag is
/// next. The closing tag is left unread.
pub fn decode_application_data_list(
    buf: &[u8],
    offset: usize,
    bound: usize,
    ctx: &DecodeContext<'_>,
) -> DecodeResult<Vec<ApplicationValue>> {
    decode_with(buf, offset, bound, |r| {
        let mut values = Vec::new();
        while !r.is_empty() {
            if let Tag::Closing { .. } = Tag::peek(r)? {
                break;
            }
            values.push(decode_value(r, ctx)?);
        }
        Ok(values)
    })
}

pub fn decode_value(
    r: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<ApplicationValue, DecodeError> {
    let tag = Tag::peek(r)?;
    if let Some(kind) = structured_kind(ctx.object_type, ctx.property) {
        if structure_starts_with(kind, tag) {
            return decode_structured(r, kind, ctx);
        }
    }
    let tag = Tag::decode(r)?;
    decode_value_from_tag(r, tag, ctx)
}

/// Decodes the value whose header `tag` has already been read.
pub fn decode_value_from_tag(
    r: &mut Reader<'_>,
    tag: Tag,
    ctx: &DecodeContext<'_>,
) -> Result<ApplicationValue, DecodeError> {
    match tag {
        Tag::Application { tag, len } => decode_primitive(r, tag, len as usize, false),
        Tag::Context { tag_num, len } => match ctx.resolve(tag_num) {
            Some(kind) => decode_primitive(r, kind, len as usize, true),
            None => {
                debug!(
                    "context tag {tag_num} of {:?} unresolved, keeping {len} raw bytes",
                    ctx.property
                );
                let bytes = r.read_exact(len as usize)?.to_vec();
                Ok(ApplicationValue::ContextEncoded { tag_num, bytes })
            }
        },
        Tag::Opening { tag_num } => Ok(ApplicationValue::ContextDecoded {
            tag_num,
            values: decode_values_until_closing(r, tag_num, &ctx.nested()?)?,
        }),
        Tag::Closing { .. } => Err(DecodeError::InvalidTag),
    }
}

/// Reads values until the closing tag `tag_num` and consumes it. `ctx` is
/// the context of the contents, one level below the opening tag.
pub fn decode_values_until_closing(
    r: &mut Reader<'_>,
    tag_num: u8,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<ApplicationValue>, DecodeError> {
    let mut values = Vec::new();
    loop {
        match Tag::peek(r)? {
            Tag::Closing { tag_num: n } if n == tag_num => {
                Tag::decode(r)?;
                return Ok(values);
            }
            Tag::Closing { .. } => return Err(DecodeError::InvalidTag),
            _ => values.push(decode_value(r, ctx)?),
        }
    }
}

fn decode_primitive(
    r: &mut Reader<'_>,
    kind: AppTag,
    len: usize,
    context: bool,
) -> Result<ApplicationValue, DecodeError> {
    Ok(match kind {
        AppTag::Null => {
            r.read_exact(len)?;
            ApplicationValue::Null
        }
        AppTag::Boolean if context => {
            ApplicationValue::Boolean(decode_context_boolean_payload(r, len)?)
        }
        AppTag::Boolean => {
            if len > 1 {
                return Err(DecodeError::InvalidValue);
            }
            ApplicationValue::Boolean(len != 0)
        }
        AppTag::UnsignedInt => ApplicationValue::Unsigned(decode_unsigned(r, len)?),
        AppTag::SignedInt => ApplicationValue::Signed(decode_signed(r, len)?),
        AppTag::Real => ApplicationValue::Real(decode_real(r, len)?),
        AppTag::Double => ApplicationValue::Double(decode_double(r, len)?),
        AppTag::OctetString => ApplicationValue::OctetString(r.read_exact(len)?.to_vec()),
        AppTag::CharacterString => {
            ApplicationValue::CharacterString(decode_character_string(r, len)?)
        }
        AppTag::BitString => ApplicationValue::BitString(decode_bit_string(r, len)?),
        AppTag::Enumerated => ApplicationValue::Enumerated(decode_unsigned(r, len)?),
        AppTag::Date => ApplicationValue::Date(decode_date(r, len)?),
        AppTag::Time => ApplicationValue::Time(decode_time(r, len)?),
        AppTag::ObjectId => ApplicationValue::ObjectId(decode_object_id(r, len)?),
    })
}

/// Whether `tag` is the first tag of a `kind` element. Anything else (a
/// Null in place of an unconfigured reference, or a constructed wrapper
/// around a list of elements) is decoded as a plain value.
fn structure_starts_with(kind: ApplicationTag, tag: Tag) -> bool {
    match kind {
        ApplicationTag::TimeStamp => matches!(
            tag,
            Tag::Context { tag_num: 0 | 1, .. } | Tag::Opening { tag_num: 2 }
        ),
        ApplicationTag::DeviceObjectPropertyReference
        | ApplicationTag::ReadAccessSpecification
        | ApplicationTag::ReadAccessResult => matches!(tag, Tag::Context { tag_num: 0, .. }),
        ApplicationTag::CovSubscription => matches!(tag, Tag::Opening { tag_num: 0 }),
        ApplicationTag::Destination => matches!(
            tag,
            Tag::Application {
                tag: AppTag::BitString,
                ..
            }
        ),
        _ => false,
    }
}

fn decode_structured(
    r: &mut Reader<'_>,
    kind: ApplicationTag,
    ctx: &DecodeContext<'_>,
) -> Result<ApplicationValue, DecodeError> {
    Ok(match kind {
        ApplicationTag::TimeStamp => ApplicationValue::TimeStamp(decode_time_stamp(r)?),
        ApplicationTag::DeviceObjectPropertyReference => {
            ApplicationValue::DeviceObjectPropertyReference(
                decode_device_object_property_reference(r)?,
            )
        }
        ApplicationTag::Destination => ApplicationValue::Destination(decode_destination(r)?),
        ApplicationTag::CovSubscription => {
            ApplicationValue::CovSubscription(decode_cov_subscription(r)?)
        }
        ApplicationTag::ReadAccessSpecification => {
            ApplicationValue::ReadAccessSpecification(decode_read_access_specification(r)?)
        }
        ApplicationTag::ReadAccessResult => {
            ApplicationValue::ReadAccessResult(decode_read_access_result(r, ctx)?)
        }
        _ => return Err(DecodeError::Unsupported),
    })
}
