use thiserror::Error;

/// Escape grammar the decoder cannot interpret.
///
/// Offsets are byte positions in the escaped input. Anything flushed before
/// the offending escape has already been appended to the output buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A `\` followed by a byte that selects no known escape.
    #[error("unknown escape selector '\\{}' at byte {offset}", char::from(*.byte))]
    UnknownEscape {
        /// The selector byte.
        byte: u8,
        /// Position of the selector byte.
        offset: usize,
    },
    /// A `\uXXXX` escape containing something other than a hex digit.
    #[error("invalid hex digit 0x{byte:02X} in unicode escape at byte {offset}")]
    InvalidHexDigit {
        /// The offending byte.
        byte: u8,
        /// Position of the offending byte.
        offset: usize,
    },
    /// The input ends inside an escape sequence.
    #[error("escape sequence starting at byte {offset} is cut off by end of input")]
    UnexpectedEnd {
        /// Position of the `\` that opened the escape.
        offset: usize,
    },
}

/// Failure of [`crate::encode_with_options`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError<E> {
    /// Validation was requested and the input failed it; nothing was written.
    #[error("input is not well-formed UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// Start of the first malformed sequence.
        offset: usize,
    },
    /// The sink refused a write.
    #[error("sink error: {0}")]
    Sink(E),
}
