//! # Response Parser
//!
//! Interprets module responses into typed outcomes. Status codes the crate
//! does not know are returned as `UnknownStatus` data rather than as errors.
//!
//! The `parse_*` functions take a complete buffer: a short buffer or a framing
//! fault is reported as [`RfidError::MalformedResponse`], while checksum
//! failures keep their own variant. Callers assembling frames incrementally
//! use a [`FrameReader`](crate::rfid::frame_reader::FrameReader) and the
//! `interpret_*` functions instead.

use crate::constants::{
    CMD_READ_CHANNEL, CMD_WRITE_CHANNEL, STATUS_AUTH_FAILURE, STATUS_NO_TAG, STATUS_OK,
};
use crate::error::RfidError;
use crate::payload::record::{decode_record_with_surplus, TagRecord};
use crate::rfid::frame::{parse_frame, ParsedFrame};

/// Result of a channel read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A tag was read. `surplus_bytes` counts payload bytes past the
    /// 112-byte record that were ignored.
    TagPresent {
        channel: u8,
        record: TagRecord,
        surplus_bytes: usize,
    },
    TagAbsent { channel: u8 },
    AuthFailure { channel: u8 },
    UnknownStatus { status: u8 },
}

/// Result of a channel write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    WriteOk { channel: u8 },
    KeyError { channel: u8 },
    TagAbsent { channel: u8 },
    UnknownStatus { status: u8 },
}

/// Parses a complete read response.
pub fn parse_read_response(bytes: &[u8]) -> Result<ReadOutcome, RfidError> {
    let frame = parse_frame(bytes, true).map_err(as_response_error)?;
    interpret_read_frame(&frame)
}

/// Parses a complete write acknowledgement carrying command code `0x12`.
pub fn parse_write_response(bytes: &[u8]) -> Result<WriteOutcome, RfidError> {
    parse_write_response_with(bytes, false)
}

/// Like [`parse_write_response`]; with `accept_read_echo` set, an
/// acknowledgement echoing the read code `0x11` is accepted as well.
pub fn parse_write_response_with(
    bytes: &[u8],
    accept_read_echo: bool,
) -> Result<WriteOutcome, RfidError> {
    let frame = parse_frame(bytes, true).map_err(as_response_error)?;
    interpret_write_frame(&frame, accept_read_echo)
}

/// Interprets a validated response frame as the answer to a read.
pub fn interpret_read_frame(frame: &ParsedFrame) -> Result<ReadOutcome, RfidError> {
    expect_command(frame, &[CMD_READ_CHANNEL])?;

    match response_status(frame)? {
        STATUS_OK => {
            let channel = response_channel(frame)?;
            let (record, surplus_bytes) = decode_record_with_surplus(&frame.data[1..])?;
            Ok(ReadOutcome::TagPresent {
                channel,
                record,
                surplus_bytes,
            })
        }
        STATUS_NO_TAG => Ok(ReadOutcome::TagAbsent {
            channel: response_channel(frame)?,
        }),
        STATUS_AUTH_FAILURE => Ok(ReadOutcome::AuthFailure {
            channel: response_channel(frame)?,
        }),
        status => Ok(ReadOutcome::UnknownStatus { status }),
    }
}

/// Interprets a validated response frame as the answer to a write.
pub fn interpret_write_frame(
    frame: &ParsedFrame,
    accept_read_echo: bool,
) -> Result<WriteOutcome, RfidError> {
    if accept_read_echo {
        expect_command(frame, &[CMD_WRITE_CHANNEL, CMD_READ_CHANNEL])?;
    } else {
        expect_command(frame, &[CMD_WRITE_CHANNEL])?;
    }

    match response_status(frame)? {
        STATUS_OK => Ok(WriteOutcome::WriteOk {
            channel: response_channel(frame)?,
        }),
        STATUS_AUTH_FAILURE => Ok(WriteOutcome::KeyError {
            channel: response_channel(frame)?,
        }),
        STATUS_NO_TAG => Ok(WriteOutcome::TagAbsent {
            channel: response_channel(frame)?,
        }),
        status => Ok(WriteOutcome::UnknownStatus { status }),
    }
}

fn as_response_error(err: RfidError) -> RfidError {
    match err {
        RfidError::ChecksumMismatch { .. } | RfidError::MalformedResponse(_) => err,
        other => RfidError::MalformedResponse(other.to_string()),
    }
}

fn expect_command(frame: &ParsedFrame, allowed: &[u8]) -> Result<(), RfidError> {
    if allowed.contains(&frame.command) {
        Ok(())
    } else {
        Err(RfidError::MalformedResponse(format!(
            "unexpected command code 0x{:02X}",
            frame.command
        )))
    }
}

fn response_status(frame: &ParsedFrame) -> Result<u8, RfidError> {
    frame
        .status
        .ok_or_else(|| RfidError::MalformedResponse("response without status byte".into()))
}

fn response_channel(frame: &ParsedFrame) -> Result<u8, RfidError> {
    frame
        .channel()
        .ok_or_else(|| RfidError::MalformedResponse("response without channel byte".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfid::frame::build_response_frame;

    #[test]
    fn test_read_no_tag() {
        let outcome = parse_read_response(&[0xEF, 0x07, 0x11, 0x02, 0x01, 0x05, 0xFE]).unwrap();
        assert_eq!(outcome, ReadOutcome::TagAbsent { channel: 1 });
    }

    #[test]
    fn test_read_auth_failure() {
        let bytes = build_response_frame(0x11, 0x01, &[0x04]).unwrap();
        assert_eq!(
            parse_read_response(&bytes).unwrap(),
            ReadOutcome::AuthFailure { channel: 4 }
        );
    }

    #[test]
    fn test_read_unknown_status() {
        let bytes = build_response_frame(0x11, 0x7F, &[0x04]).unwrap();
        assert_eq!(
            parse_read_response(&bytes).unwrap(),
            ReadOutcome::UnknownStatus { status: 0x7F }
        );
    }

    #[test]
    fn test_read_ok_short_payload() {
        let bytes = build_response_frame(0x11, 0x00, &[0x01, 0x00, 0x01]).unwrap();
        assert_eq!(
            parse_read_response(&bytes),
            Err(RfidError::InvalidLength {
                expected: 112,
                actual: 2
            })
        );
    }

    #[test]
    fn test_read_rejects_write_code() {
        let bytes = build_response_frame(0x12, 0x02, &[0x01]).unwrap();
        assert!(matches!(
            parse_read_response(&bytes),
            Err(RfidError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_write_outcomes() {
        let ok = build_response_frame(0x12, 0x00, &[0x05]).unwrap();
        assert_eq!(
            parse_write_response(&ok).unwrap(),
            WriteOutcome::WriteOk { channel: 5 }
        );
        let key = build_response_frame(0x12, 0x01, &[0x05]).unwrap();
        assert_eq!(
            parse_write_response(&key).unwrap(),
            WriteOutcome::KeyError { channel: 5 }
        );
    }

    #[test]
    fn test_write_read_echo_policy() {
        let echo = build_response_frame(0x11, 0x00, &[0x02]).unwrap();
        assert!(matches!(
            parse_write_response(&echo),
            Err(RfidError::MalformedResponse(_))
        ));
        assert_eq!(
            parse_write_response_with(&echo, true).unwrap(),
            WriteOutcome::WriteOk { channel: 2 }
        );
    }

    #[test]
    fn test_truncated_buffer_is_malformed() {
        assert!(matches!(
            parse_read_response(&[0xEF, 0x07, 0x11, 0x02]),
            Err(RfidError::MalformedResponse(_))
        ));
    }
}
