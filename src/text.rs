//! Member text decoding and character normalization.

use encoding_rs::SHIFT_JIS;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode member bytes into text.
///
/// Valid UTF-8 (with or without a BOM) is taken as is. Anything else is
/// read as Shift_JIS, which is what Japanese form exports usually carry.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
            if had_errors {
                debug!(len = bytes.len(), "member text has undecodable sequences");
            }
            text.into_owned()
        }
    }
}

/// Map full-width digits (`０`..`９`) to ASCII digits.
pub fn normalize_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            other => other,
        })
        .collect()
}

/// Collapse runs of whitespace, including ideographic spaces, to one space.
pub fn collapse_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
