//! Script string-literal escaping.

/// Append `bytes` to `out`, escaped so the result can sit between the quotes
/// of a JavaScript string literal.
///
/// Printable ASCII other than the quotes and backslash is copied unchanged.
/// The common control characters get their single-letter escapes and every
/// other byte becomes `\u00XX`.
pub fn escape_script(bytes: &[u8], out: &mut Vec<u8>) {
    for &byte in bytes {
        match byte {
            0x00 => out.extend_from_slice(b"\\0"),
            0x08 => out.extend_from_slice(b"\\b"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b'\n' => out.extend_from_slice(b"\\n"),
            0x0b => out.extend_from_slice(b"\\v"),
            0x0c => out.extend_from_slice(b"\\f"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'"' => out.extend_from_slice(b"\\\""),
            b'\'' => out.extend_from_slice(b"\\'"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x20..=0x7e => out.push(byte),
            _ => out.extend_from_slice(format!("\\u{:04x}", byte).as_bytes()),
        }
    }
}
