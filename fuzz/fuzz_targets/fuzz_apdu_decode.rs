#![no_main]

use bacwire_core::apdu::Apdu;
use bacwire_core::encoding::buffer::EncodeBuffer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(decoded) = Apdu::decode(data, 0, data.len()) {
        assert!(decoded.consumed <= data.len());
        let mut w = EncodeBuffer::new();
        decoded.value.encode(&mut w);
        let again = Apdu::decode(w.as_written(), 0, w.position()).expect("re-encoded header");
        assert_eq!(again.value, decoded.value);
    }
});
