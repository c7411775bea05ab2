#![no_main]

use bacwire_core::types::{ObjectType, PropertyId};
use bacwire_core::value::{decode_application_data_list, DecodeContext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let properties = [
        PropertyId::PresentValue,
        PropertyId::Action,
        PropertyId::ActiveCovSubscriptions,
        PropertyId::EventTimeStamps,
        PropertyId::RecipientList,
        PropertyId::ListOfGroupMembers,
        PropertyId::LogDeviceObjectProperty,
        PropertyId::Proprietary(512),
    ];
    let object_type = if selector & 0x80 != 0 {
        ObjectType::Group
    } else {
        ObjectType::AnalogValue
    };
    let property = properties[(selector as usize) % properties.len()];
    let ctx = DecodeContext::new(object_type, property);
    if let Ok(decoded) = decode_application_data_list(body, 0, body.len(), &ctx) {
        assert!(decoded.consumed <= body.len());
    }
});
