//! # Reader Frame Codec
//!
//! This module assembles and disassembles the frames exchanged with the RFID
//! reader/writer module. It leverages the `nom` crate to split a validated
//! frame into its command, status and data fields.
//!
//! ## Wire layout
//!
//! ```text
//! command:  EF | LEN | CMDC |       DATA... | BCC | FE
//! response: EF | LEN | CMDC | STA | DATA... | BCC | FE
//! ```
//!
//! `LEN` is the size of the whole frame, header and terminator included
//! (`EF 06 11 01 06 FE` declares six bytes). `BCC` is computed by
//! [`checksum::compute`] over every byte from the header through the last data
//! byte.
//!
//! ## Usage
//!
//! ```rust
//! use rfid_tag_rs::rfid::frame::{build_command_frame, parse_frame};
//!
//! let bytes = build_command_frame(0x11, &[0x01]).unwrap();
//! assert_eq!(bytes, vec![0xEF, 0x06, 0x11, 0x01, 0x06, 0xFE]);
//!
//! let frame = parse_frame(&bytes, false).unwrap();
//! assert_eq!(frame.command, 0x11);
//! assert_eq!(frame.data, vec![0x01]);
//! ```

use nom::combinator::{cond, rest};
use nom::number::complete::be_u8;
use nom::sequence::tuple;
use nom::IResult;

use crate::constants::{
    COMMAND_FRAME_OVERHEAD, FRAME_HEADER, FRAME_TERMINATOR, MAX_FRAME_LEN, RESPONSE_FRAME_OVERHEAD,
};
use crate::error::RfidError;
use crate::rfid::checksum;

/// A validated frame, header through terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub length: u8,
    pub command: u8,
    /// Present for module responses only
    pub status: Option<u8>,
    pub data: Vec<u8>,
    pub checksum: u8,
}

impl ParsedFrame {
    /// First data byte, which carries the channel for both supported commands.
    pub fn channel(&self) -> Option<u8> {
        self.data.first().copied()
    }
}

/// Smallest legal frame for the given direction.
pub fn minimum_frame_len(expect_status: bool) -> usize {
    if expect_status {
        RESPONSE_FRAME_OVERHEAD
    } else {
        COMMAND_FRAME_OVERHEAD
    }
}

/// Builds a host-to-module frame: `EF | LEN | CMDC | payload | BCC | FE`.
pub fn build_command_frame(command: u8, payload: &[u8]) -> Result<Vec<u8>, RfidError> {
    build_frame(command, None, payload)
}

/// Builds a module-to-host frame carrying a status byte.
pub fn build_response_frame(command: u8, status: u8, data: &[u8]) -> Result<Vec<u8>, RfidError> {
    build_frame(command, Some(status), data)
}

fn build_frame(command: u8, status: Option<u8>, data: &[u8]) -> Result<Vec<u8>, RfidError> {
    let overhead = minimum_frame_len(status.is_some());
    let total = overhead + data.len();
    if total > MAX_FRAME_LEN {
        return Err(RfidError::PayloadTooLarge {
            len: data.len(),
            max: MAX_FRAME_LEN - overhead,
        });
    }

    let mut frame = Vec::with_capacity(total);
    frame.push(FRAME_HEADER);
    frame.push(total as u8);
    frame.push(command);
    if let Some(status) = status {
        frame.push(status);
    }
    frame.extend_from_slice(data);
    frame.push(checksum::compute(&frame));
    frame.push(FRAME_TERMINATOR);

    Ok(frame)
}

/// Validates `input` as exactly one frame and splits it into its fields.
///
/// Checks run in wire order: header, declared length against the bytes
/// available, terminator, then checksum. Fewer bytes than declared yields
/// [`RfidError::Incomplete`]; any byte past the declared length is a framing
/// error.
pub fn parse_frame(input: &[u8], expect_status: bool) -> Result<ParsedFrame, RfidError> {
    let minimum = minimum_frame_len(expect_status);

    match input.first() {
        None => return Err(RfidError::Incomplete { needed: minimum }),
        Some(&FRAME_HEADER) => {}
        Some(&other) => {
            return Err(RfidError::MalformedResponse(format!(
                "invalid frame header 0x{other:02X}"
            )))
        }
    }

    let Some(&declared) = input.get(1) else {
        return Err(RfidError::Incomplete {
            needed: minimum - input.len(),
        });
    };
    let length = declared as usize;
    if length < minimum {
        return Err(RfidError::MalformedResponse(format!(
            "declared length {length} below minimum {minimum}"
        )));
    }
    if input.len() < length {
        return Err(RfidError::Incomplete {
            needed: length - input.len(),
        });
    }
    if input.len() > length {
        return Err(RfidError::MalformedResponse(format!(
            "frame length mismatch: declared {length}, received {}",
            input.len()
        )));
    }

    let (covered, trailer) = input.split_at(length - 2);
    let (claimed, terminator) = (trailer[0], trailer[1]);
    if terminator != FRAME_TERMINATOR {
        return Err(RfidError::MalformedResponse(format!(
            "invalid frame terminator 0x{terminator:02X}"
        )));
    }

    let calculated = checksum::compute(covered);
    if calculated != claimed {
        return Err(RfidError::ChecksumMismatch {
            expected: claimed,
            calculated,
        });
    }

    let (_, (command, status, data)) = frame_body(&covered[2..], expect_status)
        .map_err(|e| RfidError::MalformedResponse(e.to_string()))?;

    Ok(ParsedFrame {
        length: declared,
        command,
        status,
        data: data.to_vec(),
        checksum: claimed,
    })
}

/// Splits `CMDC [STA] DATA...` once header, length and trailer are stripped.
fn frame_body(input: &[u8], expect_status: bool) -> IResult<&[u8], (u8, Option<u8>, &[u8])> {
    tuple((be_u8, cond(expect_status, be_u8), rest))(input)
}
