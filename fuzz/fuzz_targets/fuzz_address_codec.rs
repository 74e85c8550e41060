#![no_main]

use libfuzzer_sys::fuzz_target;
use sigform_codec::{Address, is_same_address, parse_address};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(address) = parse_address(text) {
        let canonical = address.to_string();
        assert!(is_same_address(Some(text), Some(&canonical)));
        assert_eq!(parse_address(&canonical), Ok(address));
        assert_eq!(Address::from_biguint(&address.to_biguint()), Ok(address));
    }
});
