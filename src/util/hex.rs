//! # Hex Encoding/Decoding Utilities
//!
//! Hex helpers used by the CLI to accept captured frames and by the logging
//! helpers to dump traffic.
//!
//! ## Usage
//!
//! ```rust
//! use rfid_tag_rs::util::hex::{decode_hex, format_hex_compact, pretty_hex};
//!
//! let frame = decode_hex("EF 06 11 01 06 FE").unwrap();
//! assert_eq!(format_hex_compact(&frame), "EF 06 11 01 06 FE");
//! println!("{}", pretty_hex(&frame, 16));
//! ```

use thiserror::Error;

use crate::error::RfidError;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Odd number of hex characters: {0}")]
    OddLength(usize),

    #[error("Empty hex string")]
    EmptyString,

    #[error("Hex decoding error: {0}")]
    DecodeError(String),
}

impl From<HexError> for RfidError {
    fn from(err: HexError) -> Self {
        RfidError::InvalidHexString(err.to_string())
    }
}

/// Encode bytes to uppercase hex string
pub fn encode_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters. Whitespace and the
/// usual byte separators (`:`, `-`, `,`) are stripped, as is a `0x` prefix on
/// each byte.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    let cleaned: String = hex_str
        .split(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | ','))
        .map(|part| part.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();

    if cleaned.is_empty() {
        return Err(HexError::EmptyString);
    }

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }

    hex::decode(&cleaned).map_err(|e| HexError::DecodeError(e.to_string()))
}

/// Pretty-print hex data as an offset/hex/ASCII dump.
pub fn pretty_hex(data: &[u8], bytes_per_line: usize) -> String {
    let bytes_per_line = bytes_per_line.max(1);

    data.chunks(bytes_per_line)
        .enumerate()
        .map(|(i, chunk)| {
            let hex = format_hex_compact(chunk);
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect();
            format!(
                "{:04x}: {:<width$} |{}|",
                i * bytes_per_line,
                hex,
                ascii,
                width = bytes_per_line * 3 - 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format hex data for compact display (useful for logs)
///
/// Formats data as "EF 06 11 01" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_upper() {
        assert_eq!(encode_hex_upper(&[0xEF, 0x06, 0xfe]), "EF06FE");
    }

    #[test]
    fn test_decode_with_separators() {
        let expected = vec![0xEF, 0x06, 0x11, 0x01, 0x06, 0xFE];
        assert_eq!(decode_hex("EF 06 11 01 06 FE").unwrap(), expected);
        assert_eq!(decode_hex("ef:06:11:01:06:fe").unwrap(), expected);
        assert_eq!(decode_hex("0xEF,0x06,0x11,0x01,0x06,0xFE").unwrap(), expected);
        assert_eq!(decode_hex("EF061101\n06FE").unwrap(), expected);
    }

    #[test]
    fn test_pretty_hex() {
        let pretty = pretty_hex(b"\xEF\x06ABC", 4);
        let lines: Vec<_> = pretty.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "0000: EF 06 41 42 |..AB|");
        assert_eq!(lines[1], "0004: 43          |C|");
    }

    #[test]
    fn test_errors() {
        assert_eq!(decode_hex(""), Err(HexError::EmptyString));
        assert_eq!(decode_hex("EF0"), Err(HexError::OddLength(3)));
        assert!(matches!(decode_hex("GG"), Err(HexError::DecodeError(_))));
        let err: RfidError = HexError::EmptyString.into();
        assert!(matches!(err, RfidError::InvalidHexString(_)));
    }
}
