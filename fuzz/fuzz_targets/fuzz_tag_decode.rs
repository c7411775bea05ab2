#![no_main]

use bacwire_core::encoding::tag::decode_tag_number_and_value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut offset = 0;
    while offset < data.len() {
        match decode_tag_number_and_value(data, offset) {
            Ok(decoded) => {
                assert!(decoded.consumed > 0);
                offset += decoded.consumed;
            }
            Err(_) => break,
        }
    }
});
