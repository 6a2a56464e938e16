#![no_main]

use arbitrary::Arbitrary;
use jsonescape::{escape_to_vec, is_valid_utf8, unescape_to_vec, valid_up_to};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    escape_solidus: bool,
    bytes: &'a [u8],
}

fn codec(input: Input<'_>) {
    let Input {
        escape_solidus,
        bytes,
    } = input;

    // The validator never rejects what std accepts.
    if std::str::from_utf8(bytes).is_ok() {
        assert!(is_valid_utf8(bytes));
    }
    assert!(valid_up_to(bytes) <= bytes.len());

    // Encoder output is always decodable, and exact for well-formed text.
    let escaped = escape_to_vec(bytes, escape_solidus);
    let decoded = unescape_to_vec(&escaped).expect("encoder output must decode");
    if let Ok(text) = std::str::from_utf8(bytes) {
        assert_eq!(decoded, bytes);
        let quoted = format!("\"{}\"", std::str::from_utf8(&escaped).unwrap());
        let parsed: String = serde_json::from_str(&quoted).expect("encoder output is JSON");
        assert_eq!(parsed, text);
    }

    // One round trip reaches a fixed point.
    let again = unescape_to_vec(&escape_to_vec(&decoded, escape_solidus)).unwrap();
    assert_eq!(again, decoded);

    // Raw input as escaped text: may be rejected, must not panic.
    let _ = unescape_to_vec(bytes);
}

fuzz_target!(|input: Input<'_>| codec(input));
