//! Shared plumbing for the `bacdecode` and `bacencode` binaries: hex parsing,
//! argument enums, vendor tag configuration and the decode report.

use bacwire_core::apdu::Apdu;
use bacwire_core::encoding::buffer::EncodeBuffer;
use bacwire_core::encoding::reader::{decode_with, Reader};
use bacwire_core::encoding::tag::{AppTag, Tag};
use bacwire_core::types::{BacnetAddress, Date, ObjectId, ObjectType, PropertyId, Time};
use bacwire_core::value::{
    decode_value_from_tag, decode_values_until_closing, encode_application_data,
    encode_context_data, ApplicationValue, DecodeContext, VendorTagRule, VendorTagTable,
};
use bacwire_core::{DecodeError, EncodeError};
use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid hex digit at position {0}")]
    InvalidHex(usize),
    #[error("hex input has an odd number of digits")]
    OddHexLength,
    #[error("invalid address {0:?}, expected network:mac such as 5:C0-A8-01-0A-BA-C0")]
    InvalidAddress(String),
    #[error("invalid {kind} value {text:?}")]
    InvalidValue { kind: &'static str, text: String },
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("vendor tag config: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Parses hex such as `"00 00 01 0C"`, `"0x30,0x01"` or `"30010C"`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, ToolError> {
    let mut digits = Vec::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        match c {
            ' ' | '\t' | '\n' | '\r' | ',' | ':' | '-' => {}
            '0' if matches!(chars.peek(), Some((_, 'x' | 'X'))) => {
                chars.next();
            }
            c => {
                let nibble = c.to_digit(16).ok_or(ToolError::InvalidHex(pos))?;
                digits.push(nibble as u8);
            }
        }
    }
    if digits.len() % 2 != 0 {
        return Err(ToolError::OddHexLength);
    }
    Ok(digits.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect())
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses `network:mac`, MAC bytes separated by `-`.
pub fn parse_address(text: &str) -> Result<BacnetAddress, ToolError> {
    let invalid = || ToolError::InvalidAddress(text.to_string());
    let (network, mac) = text.split_once(':').ok_or_else(invalid)?;
    let network: u16 = network.trim().parse().map_err(|_| invalid())?;
    let mac = if mac.trim().is_empty() {
        Vec::new()
    } else {
        mac.split('-')
            .map(|b| u8::from_str_radix(b.trim(), 16).map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?
    };
    BacnetAddress::new(network, &mac).ok_or_else(invalid)
}

/// CLI-friendly enum for selecting BACnet object types.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ObjectTypeArg {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Calendar,
    Device,
    EventEnrollment,
    File,
    Group,
    LoadControl,
    NotificationClass,
    Schedule,
    TrendLog,
    MultiStateInput,
    MultiStateOutput,
    MultiStateValue,
}

impl ObjectTypeArg {
    pub const fn into_object_type(self) -> ObjectType {
        match self {
            Self::AnalogInput => ObjectType::AnalogInput,
            Self::AnalogOutput => ObjectType::AnalogOutput,
            Self::AnalogValue => ObjectType::AnalogValue,
            Self::BinaryInput => ObjectType::BinaryInput,
            Self::BinaryOutput => ObjectType::BinaryOutput,
            Self::BinaryValue => ObjectType::BinaryValue,
            Self::Calendar => ObjectType::Calendar,
            Self::Device => ObjectType::Device,
            Self::EventEnrollment => ObjectType::EventEnrollment,
            Self::File => ObjectType::File,
            Self::Group => ObjectType::Group,
            Self::LoadControl => ObjectType::LoadControl,
            Self::NotificationClass => ObjectType::NotificationClass,
            Self::Schedule => ObjectType::Schedule,
            Self::TrendLog => ObjectType::TrendLog,
            Self::MultiStateInput => ObjectType::MultiStateInput,
            Self::MultiStateOutput => ObjectType::MultiStateOutput,
            Self::MultiStateValue => ObjectType::MultiStateValue,
        }
    }
}

/// One rule of the vendor tag JSON file.
///
/// ```json
/// { "rules": [ { "peer": "5:0A-00-00-07", "property": 5000, "tag_num": 1, "type": "Real" } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct VendorTagEntry {
    #[serde(default)]
    pub peer: Option<String>,
    pub property: u32,
    pub tag_num: u8,
    #[serde(rename = "type")]
    pub tag: AppTag,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorTagConfig {
    #[serde(default)]
    pub rules: Vec<VendorTagEntry>,
}

impl VendorTagConfig {
    pub fn into_table(self) -> Result<VendorTagTable, ToolError> {
        self.rules
            .into_iter()
            .map(|entry| -> Result<VendorTagRule, ToolError> {
                let peer = entry.peer.as_deref().map(parse_address).transpose()?;
                Ok(VendorTagRule {
                    peer,
                    property: PropertyId::from_u32(entry.property),
                    tag_num: entry.tag_num,
                    tag: entry.tag,
                })
            })
            .collect()
    }
}

pub fn parse_vendor_table(json: &str) -> Result<VendorTagTable, ToolError> {
    let config: VendorTagConfig = serde_json::from_str(json)?;
    config.into_table()
}

pub fn load_vendor_table(path: &Path) -> Result<VendorTagTable, ToolError> {
    let json = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = parse_vendor_table(&json)?;
    debug!("loaded {} vendor tag rules from {}", table.len(), path.display());
    Ok(table)
}

/// What `bacdecode` prints.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    pub apdu: Apdu,
    pub header_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ApplicationValue>>,
    /// Bytes left after the header (and the values, when decoded).
    pub trailing: String,
}

/// Decodes an APDU header and, when `values` is set, the service data
/// behind it. `ctx` only applies inside constructed blocks such as the
/// `[3]` property value of a Read-Property-Ack; top-level context tags are
/// service parameters and stay raw.
pub fn decode_frame(
    bytes: &[u8],
    ctx: &DecodeContext<'_>,
    values: bool,
) -> Result<DecodeReport, ToolError> {
    let header = Apdu::decode(bytes, 0, bytes.len())?;
    let mut offset = header.consumed;
    let decoded_values = if values {
        let list = decode_with(bytes, offset, bytes.len() - offset, |r| {
            decode_service_data(r, ctx)
        })?;
        offset += list.consumed;
        Some(list.value)
    } else {
        None
    };
    Ok(DecodeReport {
        apdu: header.value,
        header_len: header.consumed,
        values: decoded_values,
        trailing: to_hex(&bytes[offset..]),
    })
}

fn decode_service_data(
    r: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<ApplicationValue>, DecodeError> {
    let mut values = Vec::new();
    while !r.is_empty() {
        let value = match Tag::decode(r)? {
            Tag::Opening { tag_num } => ApplicationValue::ContextDecoded {
                tag_num,
                values: decode_values_until_closing(r, tag_num, &ctx.nested()?)?,
            },
            Tag::Context { tag_num, len } => ApplicationValue::ContextEncoded {
                tag_num,
                bytes: r.read_exact(len as usize)?.to_vec(),
            },
            Tag::Closing { .. } => return Err(DecodeError::InvalidTag),
            tag => decode_value_from_tag(r, tag, ctx)?,
        };
        values.push(value);
    }
    Ok(values)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    Null,
    Boolean,
    Unsigned,
    Signed,
    Real,
    Double,
    Enumerated,
    String,
    ObjectId,
    Date,
    Time,
}

impl ValueKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Unsigned => "unsigned",
            Self::Signed => "signed",
            Self::Real => "real",
            Self::Double => "double",
            Self::Enumerated => "enumerated",
            Self::String => "string",
            Self::ObjectId => "object-id",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

/// Parses `text` as a value of `kind`. Object ids are `type:instance` with a
/// numeric type; dates are `YYYY-MM-DD`, times `HH:MM:SS[.ff]`.
pub fn parse_value(kind: ValueKind, text: &str) -> Result<ApplicationValue, ToolError> {
    let invalid = || ToolError::InvalidValue {
        kind: kind.name(),
        text: text.to_string(),
    };
    let text = text.trim();
    Ok(match kind {
        ValueKind::Null => ApplicationValue::Null,
        ValueKind::Boolean => match text {
            "true" | "1" | "active" => ApplicationValue::Boolean(true),
            "false" | "0" | "inactive" => ApplicationValue::Boolean(false),
            _ => return Err(invalid()),
        },
        ValueKind::Unsigned => ApplicationValue::Unsigned(text.parse().map_err(|_| invalid())?),
        ValueKind::Signed => ApplicationValue::Signed(text.parse().map_err(|_| invalid())?),
        ValueKind::Real => ApplicationValue::Real(text.parse().map_err(|_| invalid())?),
        ValueKind::Double => ApplicationValue::Double(text.parse().map_err(|_| invalid())?),
        ValueKind::Enumerated => {
            ApplicationValue::Enumerated(text.parse().map_err(|_| invalid())?)
        }
        ValueKind::String => ApplicationValue::CharacterString(text.to_string()),
        ValueKind::ObjectId => {
            let (object_type, instance) = text.split_once(':').ok_or_else(invalid)?;
            let object_type: u16 = object_type.parse().map_err(|_| invalid())?;
            let instance: u32 = instance.parse().map_err(|_| invalid())?;
            if object_type > 0x3FF || instance > 0x3F_FFFF {
                return Err(invalid());
            }
            ApplicationValue::ObjectId(ObjectId::new(ObjectType::from_u16(object_type), instance))
        }
        ValueKind::Date => {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| invalid())?;
            ApplicationValue::Date(Date::from_naive(date).ok_or_else(invalid)?)
        }
        ValueKind::Time => {
            let time = NaiveTime::parse_from_str(text, "%H:%M:%S%.f").map_err(|_| invalid())?;
            ApplicationValue::Time(Time::from_naive(time))
        }
    })
}

/// Encodes one value, application-tagged or under `context_tag`.
pub fn encode_value(
    value: &ApplicationValue,
    context_tag: Option<u8>,
) -> Result<Vec<u8>, ToolError> {
    let mut w = EncodeBuffer::new();
    match context_tag {
        Some(tag_num) => encode_context_data(&mut w, tag_num, value)?,
        None => encode_application_data(&mut w, value)?,
    }
    w.check()?;
    Ok(w.into_vec())
}

#[cfg(test)]
mod tests {
    use super::{
        decode_frame, encode_value, parse_address, parse_hex, parse_value, parse_vendor_table,
        to_hex, ToolError, ValueKind,
    };
    use bacwire_core::apdu::Apdu;
    use bacwire_core::encoding::tag::AppTag;
    use bacwire_core::types::{ObjectType, PropertyId, TimeStamp};
    use bacwire_core::value::{ApplicationValue, ContextTagResolver, DecodeContext};

    #[test]
    fn hex_formats() {
        assert_eq!(parse_hex("00 00 01 0C").unwrap(), vec![0, 0, 1, 0x0C]);
        assert_eq!(parse_hex("0x30,0x01").unwrap(), vec![0x30, 0x01]);
        assert_eq!(parse_hex("3e3f").unwrap(), vec![0x3E, 0x3F]);
        assert!(matches!(parse_hex("0g"), Err(ToolError::InvalidHex(1))));
        assert!(matches!(parse_hex("123"), Err(ToolError::OddHexLength)));
        assert_eq!(to_hex(&[0x0C, 0xFF]), "0C FF");
    }

    #[test]
    fn addresses() {
        let addr = parse_address("5:C0-A8-01-0A-BA-C0").unwrap();
        assert_eq!(addr.network, 5);
        assert_eq!(addr.mac(), &[0xC0, 0xA8, 0x01, 0x0A, 0xBA, 0xC0]);
        assert!(parse_address("0:").unwrap().is_broadcast());
        assert!(parse_address("nope").is_err());
        assert!(parse_address("1:01-02-03-04-05-06-07-08").is_err());
    }

    #[test]
    fn vendor_config() {
        let table = parse_vendor_table(
            r#"{ "rules": [
                { "property": 5000, "tag_num": 1, "type": "Real" },
                { "peer": "2:11", "property": 5000, "tag_num": 1, "type": "UnsignedInt" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let peer = parse_address("2:11").unwrap();
        let property = PropertyId::from_u32(5000);
        assert_eq!(table.resolve(None, property, 1), Some(AppTag::Real));
        assert_eq!(
            table.resolve(Some(&peer), property, 1),
            Some(AppTag::UnsignedInt)
        );
        assert!(parse_vendor_table("{ \"rules\": 3 }").is_err());
    }

    #[test]
    fn encodes_from_text() {
        let real = parse_value(ValueKind::Real, "72.3").unwrap();
        assert_eq!(encode_value(&real, None).unwrap(), vec![0x44, 0x42, 0x90, 0x99, 0x9A]);

        let id = parse_value(ValueKind::ObjectId, "0:5").unwrap();
        assert_eq!(encode_value(&id, Some(0)).unwrap(), vec![0x0C, 0, 0, 0, 5]);

        let date = parse_value(ValueKind::Date, "2024-03-14").unwrap();
        assert_eq!(encode_value(&date, None).unwrap(), vec![0xA4, 124, 3, 14, 4]);

        assert!(parse_value(ValueKind::Unsigned, "-1").is_err());
        assert!(parse_value(ValueKind::ObjectId, "1024:1").is_err());
    }

    #[test]
    fn decodes_a_read_property_ack() {
        let bytes = parse_hex("30 01 0C 0C 00 00 00 05 19 55 3E 44 42 90 99 9A 3F").unwrap();
        let ctx = DecodeContext::new(ObjectType::AnalogInput, PropertyId::PresentValue);
        let report = decode_frame(&bytes, &ctx, true).unwrap();
        assert!(matches!(report.apdu, Apdu::ComplexAck(_)));
        assert_eq!(report.header_len, 3);
        assert_eq!(report.trailing, "");
        let values = report.values.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(
            values[2],
            ApplicationValue::ContextDecoded {
                tag_num: 3,
                values: vec![ApplicationValue::Real(72.3)],
            }
        );
    }

    #[test]
    fn property_context_stays_inside_the_value_block() {
        // RP-ACK for event-time-stamps (130): [0] AI-5, [1] 130, [3]{ [1] 7 }
        let bytes = parse_hex("30 01 0C 0C 00 00 00 05 19 82 3E 19 07 3F").unwrap();
        let ctx = DecodeContext::new(ObjectType::AnalogInput, PropertyId::EventTimeStamps);
        let values = decode_frame(&bytes, &ctx, true).unwrap().values.unwrap();
        assert_eq!(
            values,
            vec![
                ApplicationValue::ContextEncoded {
                    tag_num: 0,
                    bytes: vec![0x00, 0x00, 0x00, 0x05],
                },
                ApplicationValue::ContextEncoded {
                    tag_num: 1,
                    bytes: vec![0x82],
                },
                ApplicationValue::ContextDecoded {
                    tag_num: 3,
                    values: vec![ApplicationValue::TimeStamp(TimeStamp::SequenceNumber(7))],
                },
            ]
        );
    }

    #[test]
    fn stray_closing_tag_fails_the_frame() {
        let bytes = parse_hex("30 01 0C 3F").unwrap();
        let ctx = DecodeContext::new(ObjectType::AnalogInput, PropertyId::PresentValue);
        assert!(matches!(
            decode_frame(&bytes, &ctx, true),
            Err(ToolError::Decode(_))
        ));
    }
}
