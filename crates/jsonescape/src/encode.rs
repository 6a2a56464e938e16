//! Escaping raw bytes into JSON string content.
//!
//! The scan keeps two positions: a cursor and the start of the pending
//! pass-through run. Bytes that need no escaping only move the cursor; an
//! escapable unit turns the pending run into a [`Segment::Literal`], itself
//! into a [`Segment::Escape`], and moves the run start past it. Writers
//! therefore see one call per literal run and one per escape, never one per
//! byte.
//!
//! Multi-byte UTF-8 is re-encoded as `\u` escapes (UTF-16 surrogate pairs for
//! astral codepoints), so output produced from well-formed UTF-8 is plain
//! ASCII. Input that is not well-formed is never rejected here: a lead byte
//! whose continuation bytes are missing or malformed is escaped on its own as
//! `\u00XX` and the scan resumes right after it, and stray bytes that are not
//! lead bytes pass through unchanged. Run [`crate::is_valid_utf8`] first, or
//! use [`EncodeOptions::validate_utf8`], when that matters.

use alloc::vec::Vec;
use core::{fmt, iter::FusedIterator};

use bstr::ByteSlice;

use crate::{EncodeError, EncodeOptions, Sink, validate::valid_up_to};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// One escape sequence, from a two-byte `\n` up to a twelve-byte surrogate
/// pair.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Escape {
    buf: [u8; 12],
    len: u8,
}

impl Escape {
    const fn short(selector: u8) -> Self {
        let mut buf = [0; 12];
        buf[0] = b'\\';
        buf[1] = selector;
        Self { buf, len: 2 }
    }

    fn unit(unit: u16) -> Self {
        let mut buf = [0; 12];
        write_unit(&mut buf[..6], unit);
        Self { buf, len: 6 }
    }

    fn pair(high: u16, low: u16) -> Self {
        let mut buf = [0; 12];
        let (first, second) = buf.split_at_mut(6);
        write_unit(first, high);
        write_unit(second, low);
        Self { buf, len: 12 }
    }

    /// The escape as it appears in JSON text.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..usize::from(self.len)]
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Escape").field(&self.as_bytes().as_bstr()).finish()
    }
}

/// Renders `unit` as `\` `u` and four uppercase hex digits into `out[..6]`.
fn write_unit(out: &mut [u8], unit: u16) {
    out[0] = b'\\';
    out[1] = b'u';
    for (i, digit) in out[2..6].iter_mut().enumerate() {
        *digit = HEX_DIGITS[usize::from((unit >> (12 - 4 * i)) & 0xF)];
    }
}

/// A piece of encoder output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Input bytes copied through unchanged.
    Literal(&'a [u8]),
    /// The escaped form of one character.
    Escape(Escape),
}

impl Segment<'_> {
    /// Bytes to write for this segment.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Segment::Literal(bytes) => bytes,
            Segment::Escape(escape) => escape.as_bytes(),
        }
    }
}

/// Iterator over the [`Segment`]s that make up the JSON string form of a byte
/// slice.
///
/// Literal segments are never empty, and two literal segments are never
/// adjacent.
///
/// ```rust
/// use jsonescape::{Segment, Segments};
///
/// let pieces: Vec<&[u8]> = Segments::new(b"a\tb", false)
///     .map(|segment| match segment {
///         Segment::Literal(bytes) => bytes,
///         Segment::Escape(_) => b"<esc>".as_slice(),
///     })
///     .collect();
/// assert_eq!(pieces, [b"a".as_slice(), b"<esc>".as_slice(), b"b".as_slice()]);
/// ```
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    input: &'a [u8],
    cursor: usize,
    flush: usize,
    escape_solidus: bool,
    pending: Option<Escape>,
}

impl<'a> Segments<'a> {
    /// Starts a scan over `input`. `escape_solidus` selects whether `/` is
    /// written as `\/`.
    #[must_use]
    pub fn new(input: &'a [u8], escape_solidus: bool) -> Self {
        Self {
            input,
            cursor: 0,
            flush: 0,
            escape_solidus,
            pending: None,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(escape) = self.pending.take() {
            return Some(Segment::Escape(escape));
        }

        while self.cursor < self.input.len() {
            let Some((escape, consumed)) = escape_at(self.input, self.cursor, self.escape_solidus)
            else {
                self.cursor += 1;
                continue;
            };

            let run = &self.input[self.flush..self.cursor];
            self.cursor += consumed;
            self.flush = self.cursor;

            if run.is_empty() {
                return Some(Segment::Escape(escape));
            }
            self.pending = Some(escape);
            return Some(Segment::Literal(run));
        }

        if self.flush < self.input.len() {
            let run = &self.input[self.flush..];
            self.flush = self.input.len();
            return Some(Segment::Literal(run));
        }

        None
    }
}

impl FusedIterator for Segments<'_> {}

/// Decides whether the byte at `at` starts an escapable unit, returning the
/// escape and the number of input bytes it covers.
fn escape_at(input: &[u8], at: usize, escape_solidus: bool) -> Option<(Escape, usize)> {
    let lead = input[at];
    let selector = match lead {
        b'\r' => b'r',
        b'\n' => b'n',
        b'\\' => b'\\',
        b'"' => b'"',
        0x0C => b'f',
        0x08 => b'b',
        b'\t' => b't',
        b'/' if escape_solidus => b'/',
        0x00..=0x1F => return Some((Escape::unit(u16::from(lead)), 1)),
        0x80..=0xFF => return escape_multibyte(input, at),
        _ => return None,
    };
    Some((Escape::short(selector), 1))
}

#[allow(clippy::cast_possible_truncation)]
fn escape_multibyte(input: &[u8], at: usize) -> Option<(Escape, usize)> {
    let lead = input[at];
    let (mut codepoint, continuations) = match lead {
        0xC0..=0xDF => (u32::from(lead & 0x1F), 1),
        0xE0..=0xEF => (u32::from(lead & 0x0F), 2),
        0xF0..=0xF7 => (u32::from(lead & 0x07), 3),
        // Stray continuation bytes and 0xF8..=0xFF are not lead bytes.
        _ => return None,
    };

    for offset in 1..=continuations {
        match input.get(at + offset) {
            Some(&byte) if byte & 0xC0 == 0x80 => {
                codepoint = (codepoint << 6) | u32::from(byte & 0x3F);
            }
            _ => {
                tracing::debug!(
                    offset = at,
                    lead,
                    "malformed UTF-8 sequence; escaping lead byte on its own"
                );
                return Some((Escape::unit(u16::from(lead)), 1));
            }
        }
    }

    let escape = if codepoint < 0x1_0000 {
        Escape::unit(codepoint as u16)
    } else {
        let offset = codepoint - 0x1_0000;
        Escape::pair(
            0xD800 | ((offset >> 10) & 0x3FF) as u16,
            0xDC00 | (offset & 0x3FF) as u16,
        )
    };
    Some((escape, continuations + 1))
}

/// Writes the JSON string form of `raw` (without surrounding quotes) to
/// `sink`.
///
/// Only non-empty slices are passed to [`Sink::append`], one per literal run
/// and one per escape.
///
/// # Errors
///
/// Stops at the first sink failure and returns it.
pub fn encode_json_string<S: Sink + ?Sized>(
    sink: &mut S,
    raw: &[u8],
    escape_solidus: bool,
) -> Result<(), S::Error> {
    for segment in Segments::new(raw, escape_solidus) {
        sink.append(segment.as_bytes())?;
    }
    Ok(())
}

/// [`encode_json_string`] driven by [`EncodeOptions`].
///
/// # Errors
///
/// [`EncodeError::InvalidUtf8`] if `options.validate_utf8` is set and `raw`
/// is malformed, in which case the sink is untouched; [`EncodeError::Sink`]
/// if the sink fails.
pub fn encode_with_options<S: Sink + ?Sized>(
    sink: &mut S,
    raw: &[u8],
    options: EncodeOptions,
) -> Result<(), EncodeError<S::Error>> {
    if options.validate_utf8 {
        let valid = valid_up_to(raw);
        if valid != raw.len() {
            return Err(EncodeError::InvalidUtf8 { offset: valid });
        }
    }
    encode_json_string(sink, raw, options.escape_solidus).map_err(EncodeError::Sink)
}

/// Escapes `raw` into a freshly allocated buffer.
#[must_use]
pub fn escape_to_vec(raw: &[u8], escape_solidus: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let Ok(()) = encode_json_string(&mut out, raw, escape_solidus);
    out
}
