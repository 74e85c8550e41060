#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sigform_codec::{format_decimal, format_decimal_display, is_decimal_string, parse_decimal};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    text: &'a str,
    scale: u8,
    max_decimals: Option<u8>,
}

fuzz_target!(|input: Input<'_>| {
    let scale = u32::from(input.scale % 78);
    let parsed = parse_decimal(input.text, scale);
    assert_eq!(parsed.is_ok(), is_decimal_string(input.text));

    if let Ok(value) = parsed {
        let text = format_decimal(&value, scale, None);
        assert_eq!(parse_decimal(&text, scale).ok(), Some(value.clone()));

        let max = input.max_decimals.map(usize::from);
        let shown = format_decimal(&value, scale, max);
        assert!(is_decimal_string(&shown));
        let _ = format_decimal_display(Some(&value), scale, max);
    }
});
