//! Destinations for encoder output.
//!
//! The encoder never buffers on its own: every literal run and every escape
//! sequence is handed to a [`Sink`] as soon as it is known, in order. A sink
//! that can fail reports it through its associated error type and the encoder
//! stops at the first failure.

use alloc::vec::Vec;
use core::convert::Infallible;

use bstr::BString;

/// Append-only consumer of encoded bytes.
pub trait Sink {
    /// Failure reported by [`Sink::append`].
    type Error;

    /// Append `bytes` to the end of the sink.
    ///
    /// # Errors
    ///
    /// Whatever the underlying destination reports; the encoder propagates it
    /// unchanged.
    fn append(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl Sink for Vec<u8> {
    type Error = Infallible;

    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl Sink for BString {
    type Error = Infallible;

    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    type Error = S::Error;

    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).append(bytes)
    }
}

/// Adapts a closure into a [`Sink`].
///
/// ```rust
/// use jsonescape::{FnSink, encode_json_string};
///
/// let mut calls = 0;
/// let mut sink = FnSink(|_: &[u8]| -> Result<(), ()> {
///     calls += 1;
///     Ok(())
/// });
/// encode_json_string(&mut sink, b"a\nb", false).unwrap();
/// assert_eq!(calls, 3);
/// ```
#[derive(Debug, Clone)]
pub struct FnSink<F>(pub F);

impl<F, E> Sink for FnSink<F>
where
    F: FnMut(&[u8]) -> Result<(), E>,
{
    type Error = E;

    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (self.0)(bytes)
    }
}

/// Writes encoder output straight into a [`std::io::Write`].
///
/// No buffering is added; wrap the writer in a `BufWriter` when the escape
/// density of the input makes many small writes likely.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W>(pub W);

#[cfg(feature = "std")]
impl<W> IoSink<W> {
    /// Unwraps the inner writer.
    pub fn into_inner(self) -> W {
        self.0
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Sink for IoSink<W> {
    type Error = std::io::Error;

    fn append(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(bytes)
    }
}
