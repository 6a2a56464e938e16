//! Unescaping JSON string content back into raw bytes.
//!
//! Like the encoder, the decoder walks the input once with a cursor and the
//! start of the pending literal run. Each `\` flushes the run, appends the
//! unescaped bytes, and restarts the run after the escape.
//!
//! `\u` escapes are converted to UTF-8. A high surrogate must be followed
//! directly by a `\u` low surrogate; when it is not, the pair cannot be
//! reconstructed and a single `?` stands in for the high surrogate. A lone
//! low surrogate is encoded as-is (three bytes starting with `0xED`), which
//! keeps it visible to the caller instead of silently dropping it.

use alloc::vec::Vec;

use crate::{DecodeError, OutputBuffer};

const SENTINEL: &[u8] = b"?";

/// Value of one hex digit, folding `a-f` onto `A-F` before subtracting.
#[inline]
fn hex_value(byte: u8) -> Option<u16> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'A'..=b'F' | b'a'..=b'f' => (byte & !0x20) - b'A' + 10,
        _ => return None,
    };
    Some(u16::from(value))
}

/// Reads the four hex digits of a `\uXXXX` escape that starts at `escape`.
fn read_unit(input: &[u8], escape: usize) -> Result<u16, DecodeError> {
    let digits = input
        .get(escape + 2..escape + 6)
        .ok_or(DecodeError::UnexpectedEnd { offset: escape })?;
    digits.iter().enumerate().try_fold(0u16, |unit, (i, &byte)| {
        let digit = hex_value(byte).ok_or(DecodeError::InvalidHexDigit {
            byte,
            offset: escape + 2 + i,
        })?;
        Ok((unit << 4) | digit)
    })
}

/// Reads a `\uXXXX` low surrogate starting exactly at `at`, if there is one.
fn low_surrogate_at(input: &[u8], at: usize) -> Option<u16> {
    if input.get(at..at + 2)? != b"\\u" {
        return None;
    }
    read_unit(input, at)
        .ok()
        .filter(|unit| (unit & 0xFC00) == 0xDC00)
}

/// UTF-8 bytes of `codepoint`, or the sentinel for values no four-byte
/// sequence can hold.
#[allow(clippy::cast_possible_truncation)]
fn utf8_bytes(codepoint: u32) -> ([u8; 4], usize) {
    let mut out = [0; 4];
    let len = match codepoint {
        0..0x80 => {
            out[0] = codepoint as u8;
            1
        }
        0x80..0x800 => {
            out[0] = 0xC0 | (codepoint >> 6) as u8;
            out[1] = 0x80 | (codepoint & 0x3F) as u8;
            2
        }
        0x800..0x1_0000 => {
            out[0] = 0xE0 | (codepoint >> 12) as u8;
            out[1] = 0x80 | ((codepoint >> 6) & 0x3F) as u8;
            out[2] = 0x80 | (codepoint & 0x3F) as u8;
            3
        }
        0x1_0000..0x20_0000 => {
            out[0] = 0xF0 | (codepoint >> 18) as u8;
            out[1] = 0x80 | ((codepoint >> 12) & 0x3F) as u8;
            out[2] = 0x80 | ((codepoint >> 6) & 0x3F) as u8;
            out[3] = 0x80 | (codepoint & 0x3F) as u8;
            4
        }
        _ => {
            out[0] = SENTINEL[0];
            1
        }
    };
    (out, len)
}

/// Decodes the `\uXXXX` escape at `escape` (and its low surrogate, if any)
/// into `buf`, returning how many input bytes were consumed.
fn decode_unicode_escape<B: OutputBuffer + ?Sized>(
    buf: &mut B,
    input: &[u8],
    escape: usize,
) -> Result<usize, DecodeError> {
    let unit = read_unit(input, escape)?;

    let (codepoint, consumed) = if (unit & 0xFC00) == 0xD800 {
        let Some(low) = low_surrogate_at(input, escape + 6) else {
            tracing::debug!(
                offset = escape,
                unit,
                "high surrogate without a following low surrogate; emitting sentinel"
            );
            buf.append(SENTINEL);
            return Ok(6);
        };
        let high = u32::from(unit);
        let combined =
            ((high & 0x3F) << 10) | ((((high >> 6) & 0xF) + 1) << 16) | u32::from(low & 0x3FF);
        (combined, 12)
    } else {
        (u32::from(unit), 6)
    };

    let (bytes, len) = utf8_bytes(codepoint);
    buf.append(&bytes[..len]);
    Ok(consumed)
}

/// Appends the raw bytes denoted by the JSON string content `escaped` to
/// `buf`.
///
/// `escaped` is the text between the quotes of a JSON string. Bytes outside
/// escapes are copied unchanged, whether or not they are valid UTF-8.
///
/// # Errors
///
/// - [`DecodeError::UnknownEscape`] for a `\` followed by anything other than
///   `r n \ / " f b t u`.
/// - [`DecodeError::InvalidHexDigit`] for a malformed `\uXXXX`.
/// - [`DecodeError::UnexpectedEnd`] when the input stops inside an escape.
///
/// Everything before the failing escape has already been appended to `buf`.
pub fn decode_json_string<B: OutputBuffer + ?Sized>(
    buf: &mut B,
    escaped: &[u8],
) -> Result<(), DecodeError> {
    let mut flush = 0;
    let mut cursor = 0;

    while cursor < escaped.len() {
        if escaped[cursor] != b'\\' {
            cursor += 1;
            continue;
        }

        if flush < cursor {
            buf.append(&escaped[flush..cursor]);
        }

        let Some(&selector) = escaped.get(cursor + 1) else {
            return Err(DecodeError::UnexpectedEnd { offset: cursor });
        };
        let literal: &[u8] = match selector {
            b'r' => b"\r",
            b'n' => b"\n",
            b'\\' => b"\\",
            b'/' => b"/",
            b'"' => b"\"",
            b'f' => b"\x0C",
            b'b' => b"\x08",
            b't' => b"\t",
            b'u' => {
                cursor += decode_unicode_escape(buf, escaped, cursor)?;
                flush = cursor;
                continue;
            }
            byte => {
                return Err(DecodeError::UnknownEscape {
                    byte,
                    offset: cursor + 1,
                });
            }
        };
        buf.append(literal);
        cursor += 2;
        flush = cursor;
    }

    if flush < escaped.len() {
        buf.append(&escaped[flush..]);
    }
    Ok(())
}

/// Unescapes `escaped` into a freshly allocated buffer.
///
/// # Errors
///
/// Same as [`decode_json_string`]; the partial output is discarded.
pub fn unescape_to_vec(escaped: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(escaped.len());
    decode_json_string(&mut out, escaped)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use bstr::ByteSlice;
    use rstest::rstest;

    use super::{decode_json_string, hex_value, unescape_to_vec, utf8_bytes};
    use crate::{DecodeError, tests::units};

    fn decode(escaped: &[u8]) -> Vec<u8> {
        unescape_to_vec(escaped).unwrap()
    }

    #[rstest]
    #[case::empty(b"", b"")]
    #[case::plain(b"no escapes here", b"no escapes here")]
    #[case::short_escapes(br#"\r\n\\\/\"\f\b\t"#, b"\r\n\\/\"\x0C\x08\t")]
    #[case::runs_between(br"a\nb\tc", b"a\nb\tc")]
    #[case::raw_non_ascii("\u{E9}t\u{E9}".as_bytes(), "\u{E9}t\u{E9}".as_bytes())]
    #[case::invalid_utf8_copied(b"\xFF\xFE", b"\xFF\xFE")]
    fn literals_and_short_escapes(#[case] escaped: &[u8], #[case] expected: &[u8]) {
        assert_eq!(decode(escaped).as_bstr(), expected.as_bstr());
    }

    #[rstest]
    #[case::ascii(&[0x0041], "A")]
    #[case::two_byte(&[0x00E9], "\u{E9}")]
    #[case::euro(&[0x20AC], "\u{20AC}")]
    #[case::emoji(&[0xD83D, 0xDE00], "\u{1F600}")]
    #[case::first_astral(&[0xD800, 0xDC00], "\u{10000}")]
    #[case::last_scalar(&[0xDBFF, 0xDFFF], "\u{10FFFF}")]
    fn unicode_escapes(#[case] escape_units: &[u16], #[case] expected: &str) {
        assert_eq!(decode(&units(escape_units)).as_bstr(), expected.as_bytes().as_bstr());
    }

    #[test]
    fn surrogate_pair_yields_four_bytes() {
        assert_eq!(decode(&units(&[0xD83D, 0xDE00])), b"\xF0\x9F\x98\x80");
    }

    #[test]
    fn hex_digits_are_case_insensitive() {
        let upper = units(&[0x00E9, 0xD83D, 0xDE00]);
        let lower = upper.to_ascii_lowercase();
        assert_ne!(upper, lower);
        assert_eq!(decode(&lower), decode(&upper));
        assert_eq!(decode(&lower), "\u{E9}\u{1F600}".as_bytes());
    }

    #[test]
    fn hex_value_covers_all_digits() {
        let digits = b"0123456789abcdefABCDEF";
        let values: Vec<u16> = digits.iter().filter_map(|&b| hex_value(b)).collect();
        assert_eq!(values, [0u16, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 10, 11, 12, 13, 14, 15]);
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b'@'), None);
        assert_eq!(hex_value(b'`'), None);
    }

    #[test]
    fn nul_escape_does_not_terminate() {
        assert_eq!(decode(br"a\u0000b"), b"a\0b");
    }

    #[test]
    fn lone_high_surrogate_at_end_is_sentinel() {
        assert_eq!(decode(br"\uD800"), b"?");
        assert_eq!(decode(br"x\uDBFF"), b"x?");
    }

    #[test]
    fn unpaired_high_surrogate_keeps_following_text() {
        assert_eq!(decode(br"\uD800abc"), b"?abc");
        assert_eq!(decode(br"\uD800\n"), b"?\n");
    }

    #[test]
    fn high_surrogate_followed_by_non_surrogate_escape() {
        let mut escaped = units(&[0xD800, 0x0041]);
        escaped.extend_from_slice(b"z");
        assert_eq!(decode(&escaped), b"?Az");
    }

    #[test]
    fn high_surrogate_followed_by_truncated_escape_is_an_error() {
        // The sentinel is emitted, then the truncated escape fails on its own.
        let mut out: Vec<u8> = Vec::new();
        let err = decode_json_string(&mut out, br"\uD800\u12").unwrap_err();
        assert_eq!(err, DecodeError::UnexpectedEnd { offset: 6 });
        assert_eq!(out, b"?");
    }

    #[test]
    fn lone_low_surrogate_is_encoded_verbatim() {
        assert_eq!(decode(br"\uDC00"), b"\xED\xB0\x80");
    }

    #[rstest]
    #[case::unknown_selector(br"ab\x", DecodeError::UnknownEscape { byte: b'x', offset: 3 })]
    #[case::uppercase_selector(br"\N", DecodeError::UnknownEscape { byte: b'N', offset: 1 })]
    #[case::trailing_backslash(br"abc\", DecodeError::UnexpectedEnd { offset: 3 })]
    #[case::short_unicode(br"\u12", DecodeError::UnexpectedEnd { offset: 0 })]
    #[case::bad_hex(br"\u12G4", DecodeError::InvalidHexDigit { byte: b'G', offset: 4 })]
    fn escape_grammar_errors(#[case] escaped: &[u8], #[case] expected: DecodeError) {
        assert_eq!(unescape_to_vec(escaped), Err(expected));
    }

    #[test]
    fn error_keeps_flushed_prefix() {
        let mut out: Vec<u8> = Vec::new();
        let err = decode_json_string(&mut out, br"ok\tthen\q").unwrap_err();
        assert_eq!(err, DecodeError::UnknownEscape { byte: b'q', offset: 9 });
        assert_eq!(out, b"ok\tthen");
    }

    #[test]
    fn utf8_conversion_boundaries() {
        let cases: [(u32, &[u8]); 8] = [
            (0x00, b"\0"),
            (0x7F, b"\x7F"),
            (0x80, b"\xC2\x80"),
            (0x7FF, b"\xDF\xBF"),
            (0x800, b"\xE0\xA0\x80"),
            (0xFFFF, b"\xEF\xBF\xBF"),
            (0x1_0000, b"\xF0\x90\x80\x80"),
            (0x1F_FFFF, b"\xF7\xBF\xBF\xBF"),
        ];
        for (codepoint, expected) in cases {
            let (bytes, len) = utf8_bytes(codepoint);
            assert_eq!(&bytes[..len], expected, "codepoint {codepoint:#X}");
        }
        let (bytes, len) = utf8_bytes(0x20_0000);
        assert_eq!(&bytes[..len], b"?");
    }
}
