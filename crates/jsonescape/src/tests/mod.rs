use alloc::{string::String, vec::Vec};
use core::fmt::Write;


/// Renders UTF-16 code units as consecutive `\uXXXX` escapes with uppercase
/// hex, the form the encoder produces.
pub(crate) fn units(units: &[u16]) -> Vec<u8> {
    let mut out = String::new();
    for unit in units {
        write!(out, "\\u{unit:04X}").unwrap();
    }
    out.into_bytes()
}

pub(crate) fn test_count() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}
