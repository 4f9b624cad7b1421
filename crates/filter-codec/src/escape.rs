//! Reversible percent-escaping of filter values.
//!
//! Every byte outside ASCII alphanumerics and `@ _ + - . /` becomes `%XX`
//! (uppercase hex, UTF-8 bytes for non-ASCII characters). That covers all
//! grammar delimiters (`( ) , *`), whitespace, control characters and `%`
//! itself, and reproduces the browser `escape()` output for ASCII input, so
//! links produced by older versions of the table keep decoding.

use crate::error::{FilterError, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes that are escaped. Note that `*` is escaped too, unlike `escape()`.
const FILTER_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

/// Escape a raw value so it can be embedded in a filter string.
///
/// ```
/// assert_eq!(filter_codec::escape("false(reach)"), "false%28reach%29");
/// assert_eq!(filter_codec::escape("1223:4567"), "1223%3A4567");
/// ```
pub fn escape(raw: &str) -> String {
    utf8_percent_encode(raw, FILTER_VALUE).to_string()
}

/// Inverse of [`escape`].
///
/// `position` is the byte offset of `encoded` in the surrounding filter
/// string and is only used for error reporting. Fails when the decoded bytes
/// are not valid UTF-8.
pub fn unescape_at(encoded: &str, position: usize) -> Result<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| FilterError::Malformed {
            position,
            message: format!("escaped value '{encoded}' is not valid UTF-8: {e}"),
        })
}

/// Inverse of [`escape`] for a standalone value.
pub fn unescape(encoded: &str) -> Result<String> {
    unescape_at(encoded, 0)
}
