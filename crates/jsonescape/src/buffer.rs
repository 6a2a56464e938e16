use alloc::vec::Vec;

use bstr::BString;

/// Growable, caller-owned byte container the decoder appends into.
///
/// Growth policy is the container's own business; the decoder only ever
/// appends, and never reads back what it wrote.
pub trait OutputBuffer {
    /// Copy `bytes` onto the end of the buffer.
    fn append(&mut self, bytes: &[u8]);
}

impl OutputBuffer for Vec<u8> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl OutputBuffer for BString {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<B: OutputBuffer + ?Sized> OutputBuffer for &mut B {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        (**self).append(bytes);
    }
}
