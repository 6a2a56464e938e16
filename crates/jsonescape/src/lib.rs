//! Byte-exact JSON string codec.
//!
//! Three independent, stateless pieces that a JSON lexer or generator
//! composes as it needs them:
//!
//! - [`encode_json_string`] escapes raw (UTF-8) bytes into JSON string
//!   content and hands the result to a [`Sink`] in as few calls as possible.
//! - [`decode_json_string`] turns JSON string content back into raw bytes,
//!   appending to an [`OutputBuffer`].
//! - [`is_valid_utf8`] checks that bytes have the bit-level shape of UTF-8.
//!
//! Malformed input degrades locally instead of failing the whole call: a
//! broken multi-byte sequence is escaped lead-byte-first by the encoder and an
//! unpaired high surrogate decodes to `?`. The decoder only errors on escape
//! grammar it cannot interpret at all.
//!
//! ```rust
//! use jsonescape::{decode_json_string, encode_json_string};
//!
//! let mut escaped: Vec<u8> = Vec::new();
//! encode_json_string(&mut escaped, b"say \"hi\"\n", false).unwrap();
//! assert_eq!(escaped, br#"say \"hi\"\n"#);
//!
//! // Astral codepoints become a twelve-byte surrogate pair escape.
//! escaped.clear();
//! encode_json_string(&mut escaped, "\u{1F600}".as_bytes(), false).unwrap();
//! assert_eq!(escaped.len(), 12);
//!
//! let mut raw: Vec<u8> = Vec::new();
//! decode_json_string(&mut raw, &escaped).unwrap();
//! assert_eq!(raw, "\u{1F600}".as_bytes());
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod decode;
mod encode;
mod error;
mod options;
mod sink;
mod validate;

#[cfg(test)]
mod tests;

pub use buffer::OutputBuffer;
pub use decode::{decode_json_string, unescape_to_vec};
pub use encode::{Escape, Segment, Segments, encode_json_string, encode_with_options, escape_to_vec};
pub use error::{DecodeError, EncodeError};
pub use options::EncodeOptions;
#[cfg(feature = "std")]
pub use sink::IoSink;
pub use sink::{FnSink, Sink};
pub use validate::{is_valid_utf8, valid_up_to};
