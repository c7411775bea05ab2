use crate::encoding::{
    buffer::EncodeBuffer,
    primitives::{
        decode_app_bit_string, decode_app_boolean, decode_app_date, decode_app_enumerated,
        decode_app_octet_string, decode_app_time, decode_app_unsigned, decode_ctx_boolean,
        decode_ctx_object_id, decode_ctx_real, decode_ctx_time, decode_ctx_unsigned,
        decode_optional_ctx_unsigned, encode_app_bit_string, encode_app_boolean, encode_app_date,
        encode_app_enumerated, encode_app_octet_string, encode_app_time, encode_app_unsigned,
        encode_ctx_boolean, encode_ctx_enumerated, encode_ctx_object_id, encode_ctx_real,
        encode_ctx_time, encode_ctx_unsigned, expect_closing, expect_opening, next_is_ctx,
        next_is_opening,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, Tag},
};
use crate::types::{
    BacnetAddress, CovSubscription, DateTime, Destination, DeviceObjectPropertyReference,
    ErrorValue, ObjectPropertyReference, PropertyId, PropertyReference, PropertyResult,
    ReadAccessResult, ReadAccessSpecification, ReadResultElement, Recipient, RecipientProcess,
    TimeStamp,
};
use crate::value::{decode_values_until_closing, encode_application_data, DecodeContext};
use crate::{DecodeError, EncodeError};

pub fn encode_date_time(w: &mut EncodeBuffer, value: &DateTime) {
    encode_app_date(w, &value.date);
    encode_app_time(w, &value.time);
}

pub fn decode_date_time(r: &mut Reader<'_>) -> Result<DateTime, DecodeError> {
    Ok(DateTime {
        date: decode_app_date(r)?,
        time: decode_app_time(r)?,
    })
}

pub fn encode_time_stamp(w: &mut EncodeBuffer, value: &TimeStamp) {
    match value {
        TimeStamp::Time(t) => encode_ctx_time(w, 0, t),
        TimeStamp::SequenceNumber(n) => encode_ctx_unsigned(w, 1, *n),
        TimeStamp::DateTime(dt) => {
            encode_opening_tag(w, 2);
            encode_date_time(w, dt);
            encode_closing_tag(w, 2);
        }
    }
}

pub fn decode_time_stamp(r: &mut Reader<'_>) -> Result<TimeStamp, DecodeError> {
    match Tag::peek(r)? {
        Tag::Context { tag_num: 0, .. } => Ok(TimeStamp::Time(decode_ctx_time(r, 0)?)),
        Tag::Context { tag_num: 1, .. } => {
            Ok(TimeStamp::SequenceNumber(decode_ctx_unsigned(r, 1)?))
        }
        Tag::Opening { tag_num: 2 } => {
            expect_opening(r, 2)?;
            let dt = decode_date_time(r)?;
            expect_closing(r, 2)?;
            Ok(TimeStamp::DateTime(dt))
        }
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn encode_error_value(w: &mut EncodeBuffer, value: &ErrorValue) {
    encode_app_enumerated(w, value.error_class);
    encode_app_enumerated(w, value.error_code);
}

pub fn decode_error_value(r: &mut Reader<'_>) -> Result<ErrorValue, DecodeError> {
    Ok(ErrorValue {
        error_class: decode_app_enumerated(r)?,
        error_code: decode_app_enumerated(r)?,
    })
}

pub fn encode_device_object_property_reference(
    w: &mut EncodeBuffer,
    value: &DeviceObjectPropertyReference,
) {
    encode_ctx_object_id(w, 0, value.object_id);
    encode_ctx_enumerated(w, 1, value.property_id.to_u32());
    if let Some(index) = value.array_index {
        encode_ctx_unsigned(w, 2, index);
    }
    if let Some(device) = value.device_id {
        encode_ctx_object_id(w, 3, device);
    }
}

pub fn decode_device_object_property_reference(
    r: &mut Reader<'_>,
) -> Result<DeviceObjectPropertyReference, DecodeError> {
    let object_id = decode_ctx_object_id(r, 0)?;
    let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 1)?);
    let array_index = decode_optional_ctx_unsigned(r, 2)?;
    let device_id = if next_is_ctx(r, 3) {
        Some(decode_ctx_object_id(r, 3)?)
    } else {
        None
    };
    Ok(DeviceObjectPropertyReference {
        object_id,
        property_id,
        array_index,
        device_id,
    })
}

fn encode_object_property_reference(w: &mut EncodeBuffer, value: &ObjectPropertyReference) {
    encode_ctx_object_id(w, 0, value.object_id);
    encode_ctx_enumerated(w, 1, value.property_id.to_u32());
    if let Some(index) = value.array_index {
        encode_ctx_unsigned(w, 2, index);
    }
}

fn decode_object_property_reference(
    r: &mut Reader<'_>,
) -> Result<ObjectPropertyReference, DecodeError> {
    Ok(ObjectPropertyReference {
        object_id: decode_ctx_object_id(r, 0)?,
        property_id: PropertyId::from_u32(decode_ctx_unsigned(r, 1)?),
        array_index: decode_optional_ctx_unsigned(r, 2)?,
    })
}

pub fn encode_recipient(w: &mut EncodeBuffer, value: &Recipient) -> Result<(), EncodeError> {
    match value {
        Recipient::Device(id) => encode_ctx_object_id(w, 0, *id),
        Recipient::Address(addr) => {
            encode_opening_tag(w, 1);
            encode_app_unsigned(w, u32::from(addr.network));
            encode_app_octet_string(w, addr.mac())?;
            encode_closing_tag(w, 1);
        }
    }
    Ok(())
}

pub fn decode_recipient(r: &mut Reader<'_>) -> Result<Recipient, DecodeError> {
    match Tag::peek(r)? {
        Tag::Context { tag_num: 0, .. } => Ok(Recipient::Device(decode_ctx_object_id(r, 0)?)),
        Tag::Opening { tag_num: 1 } => {
            expect_opening(r, 1)?;
            let network =
                u16::try_from(decode_app_unsigned(r)?).map_err(|_| DecodeError::InvalidValue)?;
            let mac = decode_app_octet_string(r)?;
            let addr = BacnetAddress::new(network, mac).ok_or(DecodeError::InvalidLength)?;
            expect_closing(r, 1)?;
            Ok(Recipient::Address(addr))
        }
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn encode_destination(w: &mut EncodeBuffer, value: &Destination) -> Result<(), EncodeError> {
    encode_app_bit_string(w, &value.valid_days);
    encode_app_time(w, &value.from_time);
    encode_app_time(w, &value.to_time);
    encode_recipient(w, &value.recipient)?;
    encode_app_unsigned(w, value.process_id);
    encode_app_boolean(w, value.issue_confirmed_notifications);
    encode_app_bit_string(w, &value.transitions);
    Ok(())
}

pub fn decode_destination(r: &mut Reader<'_>) -> Result<Destination, DecodeError> {
    Ok(Destination {
        valid_days: decode_app_bit_string(r)?,
        from_time: decode_app_time(r)?,
        to_time: decode_app_time(r)?,
        recipient: decode_recipient(r)?,
        process_id: decode_app_unsigned(r)?,
        issue_confirmed_notifications: decode_app_boolean(r)?,
        transitions: decode_app_bit_string(r)?,
    })
}

pub fn encode_cov_subscription(
    w: &mut EncodeBuffer,
    value: &CovSubscription,
) -> Result<(), EncodeError> {
    encode_opening_tag(w, 0);
    encode_opening_tag(w, 0);
    encode_recipient(w, &value.recipient.recipient)?;
    encode_closing_tag(w, 0);
    encode_ctx_unsigned(w, 1, value.recipient.process_id);
    encode_closing_tag(w, 0);

    encode_opening_tag(w, 1);
    encode_object_property_reference(w, &value.monitored_property);
    encode_closing_tag(w, 1);

    encode_ctx_boolean(w, 2, value.issue_confirmed_notifications);
    encode_ctx_unsigned(w, 3, value.time_remaining);
    if let Some(increment) = value.cov_increment {
        encode_ctx_real(w, 4, increment);
    }
    Ok(())
}

pub fn decode_cov_subscription(r: &mut Reader<'_>) -> Result<CovSubscription, DecodeError> {
    expect_opening(r, 0)?;
    expect_opening(r, 0)?;
    let recipient = decode_recipient(r)?;
    expect_closing(r, 0)?;
    let process_id = decode_ctx_unsigned(r, 1)?;
    expect_closing(r, 0)?;

    expect_opening(r, 1)?;
    let monitored_property = decode_object_property_reference(r)?;
    expect_closing(r, 1)?;

    let issue_confirmed_notifications = decode_ctx_boolean(r, 2)?;
    let time_remaining = decode_ctx_unsigned(r, 3)?;
    let cov_increment = if next_is_ctx(r, 4) {
        Some(decode_ctx_real(r, 4)?)
    } else {
        None
    };

    Ok(CovSubscription {
        recipient: RecipientProcess {
            recipient,
            process_id,
        },
        monitored_property,
        issue_confirmed_notifications,
        time_remaining,
        cov_increment,
    })
}

pub fn encode_read_access_specification(w: &mut EncodeBuffer, value: &ReadAccessSpecification) {
    encode_ctx_object_id(w, 0, value.object_id);
    encode_opening_tag(w, 1);
    for property in &value.properties {
        encode_ctx_enumerated(w, 0, property.property_id.to_u32());
        if let Some(index) = property.array_index {
            encode_ctx_unsigned(w, 1, index);
        }
    }
    encode_closing_tag(w, 1);
}

pub fn decode_read_access_specification(
    r: &mut Reader<'_>,
) -> Result<ReadAccessSpecification, DecodeError> {
    let object_id = decode_ctx_object_id(r, 0)?;
    expect_opening(r, 1)?;
    let mut properties = Vec::new();
    loop {
        if let Tag::Closing { tag_num: 1 } = Tag::peek(r)? {
            expect_closing(r, 1)?;
            break;
        }
        properties.push(PropertyReference {
            property_id: PropertyId::from_u32(decode_ctx_unsigned(r, 0)?),
            array_index: decode_optional_ctx_unsigned(r, 1)?,
        });
    }
    Ok(ReadAccessSpecification {
        object_id,
        properties,
    })
}

pub fn encode_read_access_result(
    w: &mut EncodeBuffer,
    value: &ReadAccessResult,
) -> Result<(), EncodeError> {
    encode_ctx_object_id(w, 0, value.object_id);
    encode_opening_tag(w, 1);
    for element in &value.results {
        encode_ctx_enumerated(w, 2, element.property_id.to_u32());
        if let Some(index) = element.array_index {
            encode_ctx_unsigned(w, 3, index);
        }
        match &element.result {
            PropertyResult::Values(values) => {
                encode_opening_tag(w, 4);
                for v in values {
                    encode_application_data(w, v)?;
                }
                encode_closing_tag(w, 4);
            }
            PropertyResult::Error(err) => {
                encode_opening_tag(w, 5);
                encode_error_value(w, err);
                encode_closing_tag(w, 5);
            }
        }
    }
    encode_closing_tag(w, 1);
    Ok(())
}

/// Values under each `[4]` are decoded in the context of the result's own
/// object and property.
pub fn decode_read_access_result(
    r: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<ReadAccessResult, DecodeError> {
    let object_id = decode_ctx_object_id(r, 0)?;
    expect_opening(r, 1)?;
    let mut results = Vec::new();
    loop {
        if let Tag::Closing { tag_num: 1 } = Tag::peek(r)? {
            expect_closing(r, 1)?;
            break;
        }
        let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 2)?);
        let array_index = decode_optional_ctx_unsigned(r, 3)?;
        let result = if next_is_opening(r, 4) {
            expect_opening(r, 4)?;
            let inner = ctx
                .for_property(object_id.object_type(), property_id)
                .nested()?;
            PropertyResult::Values(decode_values_until_closing(r, 4, &inner)?)
        } else {
            expect_opening(r, 5)?;
            let err = decode_error_value(r)?;
            expect_closing(r, 5)?;
            PropertyResult::Error(err)
        };
        results.push(ReadResultElement {
            property_id,
            array_index,
            result,
        });
    }
    Ok(ReadAccessResult { object_id, results })
}

#[cfg(test)]
mod tests {
    use super::{
        decode_cov_subscription, decode_destination, decode_device_object_property_reference,
        decode_read_access_result, decode_read_access_specification, decode_recipient,
        decode_time_stamp, encode_cov_subscription, encode_destination,
        encode_device_object_property_reference, encode_read_access_result,
        encode_read_access_specification, encode_recipient, encode_time_stamp,
    };
    use crate::encoding::{buffer::EncodeBuffer, reader::Reader};
    use crate::types::{
        BacnetAddress, BitString, CovSubscription, Date, DateTime, Destination,
        DeviceObjectPropertyReference, ErrorClass, ErrorCode, ErrorValue, ObjectId,
        ObjectPropertyReference, ObjectType, PropertyId, PropertyReference, PropertyResult,
        ReadAccessResult, ReadAccessSpecification, ReadResultElement, Recipient, RecipientProcess,
        Time, TimeStamp,
    };
    use crate::value::{ApplicationValue, DecodeContext};
    use crate::DecodeError;

    fn ai(instance: u32) -> ObjectId {
        ObjectId::new(ObjectType::AnalogInput, instance)
    }

    #[test]
    fn time_stamp_choices() {
        let stamps = [
            TimeStamp::Time(Time::from_bytes([12, 30, 0, 0])),
            TimeStamp::SequenceNumber(77),
            TimeStamp::DateTime(DateTime {
                date: Date::from_bytes([124, 3, 14, 4]),
                time: Time::from_bytes([8, 0, 0, 0]),
            }),
        ];
        for stamp in stamps {
            let mut w = EncodeBuffer::new();
            encode_time_stamp(&mut w, &stamp);
            let mut r = Reader::new(w.as_written());
            assert_eq!(decode_time_stamp(&mut r).unwrap(), stamp);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn date_time_stamp_bytes() {
        let mut w = EncodeBuffer::new();
        encode_time_stamp(
            &mut w,
            &TimeStamp::DateTime(DateTime {
                date: Date::from_bytes([124, 3, 14, 4]),
                time: Time::from_bytes([8, 0, 0, 0]),
            }),
        );
        assert_eq!(
            w.as_written(),
            &[0x2E, 0xA4, 124, 3, 14, 4, 0xB4, 8, 0, 0, 0, 0x2F]
        );
    }

    #[test]
    fn time_stamp_rejects_unknown_choice() {
        let mut r = Reader::new(&[0x39, 0x01]);
        assert_eq!(decode_time_stamp(&mut r).unwrap_err(), DecodeError::InvalidTag);
    }

    #[test]
    fn device_reference_optional_fields() {
        let with = DeviceObjectPropertyReference {
            object_id: ai(1),
            property_id: PropertyId::PresentValue,
            array_index: Some(3),
            device_id: Some(ObjectId::new(ObjectType::Device, 9)),
        };
        let without = DeviceObjectPropertyReference {
            array_index: None,
            device_id: None,
            ..with
        };
        for value in [with, without] {
            let mut w = EncodeBuffer::new();
            encode_device_object_property_reference(&mut w, &value);
            let mut r = Reader::new(w.as_written());
            assert_eq!(decode_device_object_property_reference(&mut r).unwrap(), value);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn recipient_address_form() {
        let addr = BacnetAddress::new(5, &[0xC0, 0xA8, 0x01, 0x0A, 0xBA, 0xC0]).unwrap();
        let mut w = EncodeBuffer::new();
        encode_recipient(&mut w, &Recipient::Address(addr)).unwrap();
        assert_eq!(
            w.as_written(),
            &[0x1E, 0x21, 0x05, 0x65, 0x06, 0xC0, 0xA8, 0x01, 0x0A, 0xBA, 0xC0, 0x1F]
        );
        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_recipient(&mut r).unwrap(), Recipient::Address(addr));
    }

    #[test]
    fn recipient_rejects_long_mac() {
        // network 1, 8-byte MAC
        let bytes = [0x1E, 0x21, 0x01, 0x65, 0x08, 1, 2, 3, 4, 5, 6, 7, 8, 0x1F];
        let mut r = Reader::new(&bytes);
        assert_eq!(decode_recipient(&mut r).unwrap_err(), DecodeError::InvalidLength);
    }

    #[test]
    fn destination_roundtrip() {
        let value = Destination {
            valid_days: BitString::from_bits(&[true; 7]),
            from_time: Time::from_bytes([0, 0, 0, 0]),
            to_time: Time::from_bytes([23, 59, 59, 99]),
            recipient: Recipient::Device(ObjectId::new(ObjectType::Device, 12)),
            process_id: 4,
            issue_confirmed_notifications: true,
            transitions: BitString::from_bits(&[true, false, true]),
        };
        let mut w = EncodeBuffer::new();
        encode_destination(&mut w, &value).unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_destination(&mut r).unwrap(), value);
        assert!(r.is_empty());
    }

    #[test]
    fn cov_subscription_roundtrip() {
        let value = CovSubscription {
            recipient: RecipientProcess {
                recipient: Recipient::Device(ObjectId::new(ObjectType::Device, 100)),
                process_id: 18,
            },
            monitored_property: ObjectPropertyReference {
                object_id: ai(2),
                property_id: PropertyId::PresentValue,
                array_index: None,
            },
            issue_confirmed_notifications: false,
            time_remaining: 3600,
            cov_increment: Some(0.5),
        };
        let mut w = EncodeBuffer::new();
        encode_cov_subscription(&mut w, &value).unwrap();
        // [0]{ [0]{ [0] device } ...
        assert_eq!(&w.as_written()[..3], &[0x0E, 0x0E, 0x0C]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_cov_subscription(&mut r).unwrap(), value);
        assert!(r.is_empty());
    }

    #[test]
    fn read_access_specification_roundtrip() {
        let value = ReadAccessSpecification {
            object_id: ai(5),
            properties: vec![
                PropertyReference {
                    property_id: PropertyId::PresentValue,
                    array_index: None,
                },
                PropertyReference {
                    property_id: PropertyId::PriorityArray,
                    array_index: Some(8),
                },
            ],
        };
        let mut w = EncodeBuffer::new();
        encode_read_access_specification(&mut w, &value);
        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_read_access_specification(&mut r).unwrap(), value);
    }

    #[test]
    fn read_access_result_values_and_error() {
        let value = ReadAccessResult {
            object_id: ai(5),
            results: vec![
                ReadResultElement {
                    property_id: PropertyId::PresentValue,
                    array_index: None,
                    result: PropertyResult::Values(vec![ApplicationValue::Real(21.5)]),
                },
                ReadResultElement {
                    property_id: PropertyId::Proprietary(512),
                    array_index: None,
                    result: PropertyResult::Error(ErrorValue::new(
                        ErrorClass::Property,
                        ErrorCode::UnknownProperty,
                    )),
                },
            ],
        };
        let mut w = EncodeBuffer::new();
        encode_read_access_result(&mut w, &value).unwrap();
        let ctx = DecodeContext::new(ObjectType::Group, PropertyId::PresentValue);
        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_read_access_result(&mut r, &ctx).unwrap(), value);
        assert!(r.is_empty());
    }
}
