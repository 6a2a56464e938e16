/// Configuration for [`crate::encode_with_options`].
///
/// # Examples
///
/// ```rust
/// use jsonescape::{EncodeOptions, encode_with_options};
///
/// let options = EncodeOptions {
///     escape_solidus: true,
///     ..Default::default()
/// };
/// let mut out: Vec<u8> = Vec::new();
/// encode_with_options(&mut out, b"</script>", options).unwrap();
/// assert_eq!(out, br"<\/script>");
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodeOptions {
    /// Whether to write `/` as `\/`.
    ///
    /// JSON never requires it, but escaping the solidus keeps `</script>`
    /// from terminating an HTML script block that embeds the output.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_solidus: bool,

    /// Whether to reject input that is not shaped like UTF-8.
    ///
    /// When `true`, the whole input is checked with [`crate::is_valid_utf8`]
    /// before anything reaches the sink, and a malformed input fails with
    /// [`crate::EncodeError::InvalidUtf8`]. When `false`, malformed sequences
    /// are escaped on a best-effort basis.
    ///
    /// # Default
    ///
    /// `false`
    pub validate_utf8: bool,
}
