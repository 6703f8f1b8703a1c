//! The rfid module contains the components responsible for the reader protocol:
//! checksum, frame building and parsing, incremental framing, command
//! construction, response interpretation and the serial transport.

pub mod checksum;
pub mod command;
pub mod frame;
pub mod frame_reader;
pub mod response;
pub mod serial;
pub mod serial_mock;

pub use command::{build_read_command, build_write_command, Channel, HostCommand, IntoChannel};
pub use frame::{build_command_frame, build_response_frame, parse_frame, ParsedFrame};
pub use frame_reader::{FrameReader, ReaderState};
pub use response::{
    interpret_read_frame, interpret_write_frame, parse_read_response, parse_write_response,
    parse_write_response_with, ReadOutcome, WriteOutcome,
};
pub use serial::{RfidReaderHandle, SerialConfig, SerialPort};
