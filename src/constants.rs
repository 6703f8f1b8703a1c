//! RFID Reader Protocol Constants
//!
//! This module defines the byte-level constants of the reader/writer module's
//! serial protocol.

/// Frame header (FH), first byte of every frame in both directions
pub const FRAME_HEADER: u8 = 0xEF;

/// Frame terminator (EOF), last byte of every frame
pub const FRAME_TERMINATOR: u8 = 0xFE;

// ----------------------------------------------------------------------------
// Command codes (CMDC)
// ----------------------------------------------------------------------------

/// Read one channel
pub const CMD_READ_CHANNEL: u8 = 0x11;

/// Write one channel
pub const CMD_WRITE_CHANNEL: u8 = 0x12;

// ----------------------------------------------------------------------------
// Status codes (STA), response frames only
// ----------------------------------------------------------------------------

pub const STATUS_OK: u8 = 0x00;
pub const STATUS_AUTH_FAILURE: u8 = 0x01;
pub const STATUS_NO_TAG: u8 = 0x02;

// ----------------------------------------------------------------------------
// Sizes
// ----------------------------------------------------------------------------

/// Number of addressable tag-storage channels on the module
pub const CHANNEL_COUNT: u8 = 8;

/// Encoded size of a tag record block
pub const TAG_RECORD_LEN: usize = 112;

/// FH + LEN + CMDC + BCC + EOF
pub const COMMAND_FRAME_OVERHEAD: usize = 5;

/// FH + LEN + CMDC + STA + BCC + EOF
pub const RESPONSE_FRAME_OVERHEAD: usize = 6;

/// Largest value the one-byte LEN field can carry
pub const MAX_FRAME_LEN: usize = u8::MAX as usize;

/// Largest payload a command frame can carry
pub const MAX_COMMAND_PAYLOAD: usize = MAX_FRAME_LEN - COMMAND_FRAME_OVERHEAD;
