//! # RFID Error Handling
//!
//! This module defines the RfidError enum, which represents the different error
//! types that can occur in the rfid-tag-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the RFID crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RfidError {
    /// The command frame would not fit the one-byte length field.
    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// Channel outside 0..=7.
    #[error("Invalid channel: {0}")]
    InvalidChannel(i64),

    /// A numeric record field does not fit its byte width.
    #[error("Field overflow: {field} = {value} exceeds {max}")]
    FieldOverflow {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// Input shorter than a fixed-width structure.
    #[error("Invalid length: expected at least {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Fewer bytes than the declared frame length. Read more and retry.
    #[error("Incomplete frame: {needed} more byte(s) needed")]
    Incomplete { needed: usize },

    /// BCC byte did not match the recomputed value.
    #[error("Checksum mismatch: expected 0x{expected:02X}, calculated 0x{calculated:02X}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// Header, terminator, length or command code mismatch.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// No complete frame arrived before the configured timeout.
    #[error("Timed out waiting for response")]
    Timeout,

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string: {0}")]
    InvalidHexString(String),

    /// The record failed field validation before a write.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A catch-all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}

impl RfidError {
    /// True when the caller should keep reading rather than give up.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, RfidError::Incomplete { .. })
    }
}
