//! Shape-only UTF-8 validation.
//!
//! Each sequence is checked against the lead/continuation bit patterns and
//! nothing else. Overlong forms (`C0 80`), encoded surrogates (`ED A0 80`) and
//! four-byte values above U+10FFFF (`F7 BF BF BF`) all pass. This is a weaker
//! guarantee than [`core::str::from_utf8`]: everything that function accepts
//! is accepted here, but not the other way around.

/// Number of continuation bytes announced by `lead`, or `None` if `lead` can
/// not start a sequence.
#[inline]
fn continuation_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(0),
        _ if lead >> 5 == 0b110 => Some(1),
        _ if lead >> 4 == 0b1110 => Some(2),
        _ if lead >> 3 == 0b1_1110 => Some(3),
        _ => None,
    }
}

/// Byte offset of the first sequence in `bytes` that does not have UTF-8
/// shape, or `bytes.len()` if there is none.
///
/// ```rust
/// use jsonescape::valid_up_to;
///
/// assert_eq!(valid_up_to(b"ok"), 2);
/// assert_eq!(valid_up_to(b"ok\xE2\x82"), 2);
/// ```
#[must_use]
pub fn valid_up_to(bytes: &[u8]) -> usize {
    let mut at = 0;
    while at < bytes.len() {
        let Some(continuations) = continuation_len(bytes[at]) else {
            return at;
        };
        for offset in 1..=continuations {
            match bytes.get(at + offset) {
                Some(&byte) if byte >> 6 == 0b10 => {}
                _ => return at,
            }
        }
        at += continuations + 1;
    }
    bytes.len()
}

/// Whether `bytes` has the bit-level shape of UTF-8. Empty input is valid.
///
/// ```rust
/// use jsonescape::is_valid_utf8;
///
/// assert!(is_valid_utf8(b""));
/// assert!(is_valid_utf8("\u{20AC}".as_bytes()));
/// assert!(!is_valid_utf8(b"\xE2\x82"));
/// // Shape only: an overlong NUL passes.
/// assert!(is_valid_utf8(b"\xC0\x80"));
/// ```
#[must_use]
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    valid_up_to(bytes) == bytes.len()
}
