use bacwire_core::apdu::ConfirmedRequestHeader;
use bacwire_core::encoding::buffer::{EncodeBuffer, EncodeFlags};
use bacwire_core::encoding::primitives::{encode_app_real, encode_ctx_object_id};
use bacwire_core::encoding::tag::{encode_closing_tag, encode_opening_tag};
use bacwire_core::types::{Date, DateTime, MaxApdu, ObjectId, ObjectType, PropertyId, Time};
use bacwire_core::value::{
    decode_application_data, encode_application_data, ApplicationValue, DecodeContext,
};
use bacwire_core::EncodeError;
use proptest::prelude::*;

fn write_property_request(w: &mut EncodeBuffer) {
    ConfirmedRequestHeader::new(7, 15, MaxApdu::UpTo480).encode(w);
    encode_ctx_object_id(w, 0, ObjectId::new(ObjectType::AnalogValue, 1));
    encode_opening_tag(w, 3);
    for i in 0..40 {
        encode_app_real(w, i as f32);
    }
    encode_closing_tag(w, 3);
}

#[test]
fn dry_run_reports_needed_length() {
    let mut full = EncodeBuffer::new();
    write_property_request(&mut full);

    let mut small = EncodeBuffer::fixed(16);
    write_property_request(&mut small);

    assert_eq!(small.position(), full.position());
    assert!(small.flags().contains(EncodeFlags::NOT_ENOUGH_BUFFER));
    assert_eq!(small.check(), Err(EncodeError::BufferTooSmall));
    assert_eq!(small.as_written(), &full.as_written()[..16]);
}

#[test]
fn window_keeps_only_the_suffix() {
    let mut full = EncodeBuffer::new();
    write_property_request(&mut full);

    let floor = 50;
    let mut segment = EncodeBuffer::new().with_window(floor);
    write_property_request(&mut segment);

    assert_eq!(segment.window_counter(), full.position());
    assert_eq!(segment.as_written(), &full.as_written()[floor..]);
}

#[test]
fn reset_reuses_the_buffer() {
    let mut w = EncodeBuffer::fixed(4);
    write_property_request(&mut w);
    assert!(w.check().is_err());

    w.reset(0);
    assert!(w.flags().is_good());
    encode_app_real(&mut w, 1.0);
    assert_eq!(w.check(), Err(EncodeError::BufferTooSmall));

    w.reset(0);
    ConfirmedRequestHeader::new(1, 12, MaxApdu::UpTo50).encode(&mut w);
    assert!(w.check().is_ok());
    assert_eq!(w.as_written(), &[0x00, 0x00, 0x01, 0x0C]);
}

#[test]
fn unspecified_date_time_is_all_ff() {
    let value = ApplicationValue::DateTime(DateTime::UNSPECIFIED);
    let mut w = EncodeBuffer::new();
    encode_application_data(&mut w, &value).unwrap();
    assert_eq!(
        w.as_written(),
        &[0xA4, 0xFF, 0xFF, 0xFF, 0xFF, 0xB4, 0xFF, 0xFF, 0xFF, 0xFF]
    );

    let ctx = DecodeContext::new(ObjectType::Device, PropertyId::PresentValue);
    let bytes = w.into_vec();
    let date = decode_application_data(&bytes, 0, 5, &ctx).unwrap();
    let time = decode_application_data(&bytes, 5, 5, &ctx).unwrap();
    assert_eq!(date.value, ApplicationValue::Date(Date::UNSPECIFIED));
    assert_eq!(time.value, ApplicationValue::Time(Time::UNSPECIFIED));
}

proptest! {
    #[test]
    fn unmapped_context_tags_are_captured_raw(
        tag_num in 0u8..=254,
        payload in proptest::collection::vec(any::<u8>(), 0..300),
    ) {
        let value = ApplicationValue::ContextEncoded { tag_num, bytes: payload.clone() };
        let mut w = EncodeBuffer::new();
        encode_application_data(&mut w, &value).unwrap();
        let bytes = w.into_vec();

        let ctx = DecodeContext::new(ObjectType::AnalogValue, PropertyId::Proprietary(700));
        let decoded = decode_application_data(&bytes, 0, bytes.len(), &ctx).unwrap();
        prop_assert_eq!(decoded.consumed, bytes.len());
        prop_assert_eq!(
            decoded.value,
            ApplicationValue::ContextEncoded { tag_num, bytes: payload }
        );
    }

    #[test]
    fn unsigned_and_signed_values_roundtrip(u in any::<u32>(), s in any::<i64>()) {
        let ctx = DecodeContext::new(ObjectType::AnalogValue, PropertyId::PresentValue);
        for value in [ApplicationValue::Unsigned(u), ApplicationValue::Signed(s)] {
            let mut w = EncodeBuffer::new();
            encode_application_data(&mut w, &value).unwrap();
            let bytes = w.into_vec();
            let decoded = decode_application_data(&bytes, 0, bytes.len(), &ctx).unwrap();
            prop_assert_eq!(decoded.value, value);
        }
    }
}
