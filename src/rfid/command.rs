//! # Command Builder
//!
//! Produces the two host-to-module command frames the module understands and
//! decodes them back, e.g. when inspecting a captured exchange.

use std::fmt;

use crate::constants::{CHANNEL_COUNT, CMD_READ_CHANNEL, CMD_WRITE_CHANNEL, TAG_RECORD_LEN};
use crate::error::RfidError;
use crate::payload::record::{decode_record_with_surplus, encode_record, TagRecord};
use crate::rfid::frame::{build_command_frame, parse_frame, ParsedFrame};

/// One of the module's eight tag-storage channels, `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    pub const MIN: Channel = Channel(0);
    pub const MAX: Channel = Channel(CHANNEL_COUNT - 1);

    /// Validates `value` as a channel number.
    pub fn new(value: i64) -> Result<Channel, RfidError> {
        match u8::try_from(value) {
            Ok(v) if v < CHANNEL_COUNT => Ok(Channel(v)),
            _ => Err(RfidError::InvalidChannel(value)),
        }
    }

    /// The channel byte as sent on the wire.
    pub fn index(self) -> u8 {
        self.0
    }

    /// All channels in ascending order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..CHANNEL_COUNT).map(Channel)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> u8 {
        channel.0
    }
}

/// Conversion into a validated [`Channel`].
pub trait IntoChannel {
    fn into_channel(self) -> Result<Channel, RfidError>;
}

impl IntoChannel for Channel {
    fn into_channel(self) -> Result<Channel, RfidError> {
        Ok(self)
    }
}

macro_rules! impl_into_channel {
    ($($t:ty),*) => {
        $(
            impl IntoChannel for $t {
                fn into_channel(self) -> Result<Channel, RfidError> {
                    match i64::try_from(self) {
                        Ok(v) => Channel::new(v),
                        Err(_) => Err(RfidError::InvalidChannel(i64::MAX)),
                    }
                }
            }
        )*
    };
}

impl_into_channel!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Builds `EF 06 11 <channel> BCC FE`.
pub fn build_read_command(channel: impl IntoChannel) -> Result<Vec<u8>, RfidError> {
    let channel = channel.into_channel()?;
    build_command_frame(CMD_READ_CHANNEL, &[channel.index()])
}

/// Builds a write frame whose payload is the channel byte followed by the
/// 112-byte encoded record.
pub fn build_write_command(
    channel: impl IntoChannel,
    record: &TagRecord,
) -> Result<Vec<u8>, RfidError> {
    let channel = channel.into_channel()?;
    let block = encode_record(record)?;

    let mut payload = Vec::with_capacity(1 + TAG_RECORD_LEN);
    payload.push(channel.index());
    payload.extend_from_slice(&block);

    build_command_frame(CMD_WRITE_CHANNEL, &payload)
}

/// A decoded host-to-module command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Read { channel: Channel },
    Write { channel: Channel, record: TagRecord },
}

impl HostCommand {
    /// Parses and validates a complete command frame. A buffer shorter than
    /// its declared length is malformed here, not incomplete.
    pub fn decode(bytes: &[u8]) -> Result<HostCommand, RfidError> {
        let frame = parse_frame(bytes, false).map_err(|e| match e {
            RfidError::Incomplete { .. } => RfidError::MalformedResponse(e.to_string()),
            other => other,
        })?;
        HostCommand::from_frame(&frame)
    }

    /// Interprets an already validated command frame.
    pub fn from_frame(frame: &ParsedFrame) -> Result<HostCommand, RfidError> {
        let channel = frame
            .channel()
            .ok_or_else(|| RfidError::MalformedResponse("command frame without channel".into()))
            .and_then(|c| Channel::new(i64::from(c)))?;

        match frame.command {
            CMD_READ_CHANNEL if frame.data.len() == 1 => Ok(HostCommand::Read { channel }),
            CMD_READ_CHANNEL => Err(RfidError::MalformedResponse(format!(
                "read command carries {} data bytes, expected 1",
                frame.data.len()
            ))),
            CMD_WRITE_CHANNEL => match decode_record_with_surplus(&frame.data[1..])? {
                (record, 0) => Ok(HostCommand::Write { channel, record }),
                (_, surplus) => Err(RfidError::MalformedResponse(format!(
                    "write command carries {surplus} byte(s) past the tag record"
                ))),
            },
            other => Err(RfidError::MalformedResponse(format!(
                "unknown command code 0x{other:02X}"
            ))),
        }
    }

    /// Re-encodes the command into its frame.
    pub fn encode(&self) -> Result<Vec<u8>, RfidError> {
        match self {
            HostCommand::Read { channel } => build_read_command(*channel),
            HostCommand::Write { channel, record } => build_write_command(*channel, record),
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            HostCommand::Read { channel } | HostCommand::Write { channel, .. } => *channel,
        }
    }
}
