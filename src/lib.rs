//! # rfid-tag-rs - A Rust Crate for Filament Spool RFID Reader Communication
//!
//! The rfid-tag-rs crate implements the serial protocol spoken by a
//! multi-channel RFID reader/writer module that stores filament material
//! properties on spool tags.
//!
//! ## Features
//!
//! - Encode and decode the fixed 112-byte tag record
//! - Build read and write command frames for channels 0 to 7
//! - Parse response frames, either from a complete buffer or incrementally
//!   from a byte stream with [`FrameReader`]
//! - Drive request/response exchanges over a serial port with a timeout
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! ```rust
//! use rfid_tag_rs::{build_read_command, parse_read_response, ReadOutcome};
//!
//! let command = build_read_command(1).unwrap();
//! assert_eq!(command, vec![0xEF, 0x06, 0x11, 0x01, 0x06, 0xFE]);
//!
//! let outcome = parse_read_response(&[0xEF, 0x07, 0x11, 0x02, 0x01, 0x05, 0xFE]).unwrap();
//! assert_eq!(outcome, ReadOutcome::TagAbsent { channel: 1 });
//! ```
//!
//! The codec functions are pure and perform no I/O. Serial access lives in
//! [`rfid::serial`].

pub mod constants;
pub mod error;
pub mod logging;
pub mod payload;
pub mod rfid;
pub mod util;

pub use crate::error::RfidError;
pub use crate::logging::{init_logger, log_info};

pub use payload::{decode_record, encode_record, TagRecord};
pub use rfid::serial::{RfidReaderHandle, SerialConfig};
pub use rfid::{
    build_read_command, build_write_command, parse_frame, parse_read_response,
    parse_write_response, parse_write_response_with, Channel, FrameReader, ParsedFrame,
    ReadOutcome, WriteOutcome,
};

/// Connect to a reader module via serial port.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
///
/// # Returns
/// * `Ok(RfidReaderHandle)` - Connected handle for communication
/// * `Err(RfidError)` - Connection failed
pub async fn connect(
    port: &str,
) -> Result<RfidReaderHandle<tokio_serial::SerialStream>, RfidError> {
    RfidReaderHandle::connect(port).await
}

/// Read the tag on one channel.
///
/// # Arguments
/// * `handle` - Reader handle to communicate through
/// * `channel` - Channel index (0-7)
pub async fn read_channel<P: rfid::SerialPort>(
    handle: &mut RfidReaderHandle<P>,
    channel: u8,
) -> Result<ReadOutcome, RfidError> {
    handle.read_channel(channel).await
}

/// Write a record to the tag on one channel.
///
/// # Arguments
/// * `handle` - Reader handle to communicate through
/// * `channel` - Channel index (0-7)
/// * `record` - Record to store; manufacturer and material must be set
pub async fn write_channel<P: rfid::SerialPort>(
    handle: &mut RfidReaderHandle<P>,
    channel: u8,
    record: &TagRecord,
) -> Result<WriteOutcome, RfidError> {
    handle.write_channel(channel, record).await
}
