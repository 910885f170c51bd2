// Encoding utilities

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Text encodings seen in CAF information strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Legacy single-byte tags; a superset of ISO-8859-1 for display
    Windows1252,
}

/// Guess the encoding of a stored string: valid UTF-8 wins
pub fn detect_encoding(data: &[u8]) -> TextEncoding {
    match UTF_8.decode_without_bom_handling_and_without_replacement(data) {
        Some(_) => TextEncoding::Utf8,
        None => TextEncoding::Windows1252,
    }
}

/// Decode text with specified encoding
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => UTF_8.decode(data).0.into_owned(),
        TextEncoding::Windows1252 => WINDOWS_1252.decode(data).0.into_owned(),
    }
}

/// Decode a key or value from an information chunk for display
pub fn decode_info_string(data: &[u8]) -> String {
    decode_text(data, detect_encoding(data))
}
