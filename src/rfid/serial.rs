//! # Reader Serial Communication
//!
//! This module drives one request/response exchange at a time over a byte
//! duplex. It works with a real `tokio_serial` port or with any other type
//! implementing [`SerialPort`], such as the in-memory
//! [`MockSerialPort`](crate::rfid::serial_mock::MockSerialPort).
//!
//! The protocol is strictly half-duplex: a command is sent only after the
//! previous response was parsed or timed out. Retrying is left to the caller.
//! A reply that arrives after its exchange timed out can still be sitting in
//! the port when the next command goes out, so channel exchanges only accept
//! a response carrying the channel they asked for.

use std::time::Duration;

use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;

use crate::error::RfidError;
use crate::payload::record::TagRecord;
use crate::rfid::command::{build_read_command, build_write_command, Channel, IntoChannel};
use crate::rfid::frame::ParsedFrame;
use crate::rfid::frame_reader::FrameReader;
use crate::rfid::response::{interpret_read_frame, interpret_write_frame, ReadOutcome, WriteOutcome};
use crate::util::logging::{log_frame_hex, log_frame_structured};

/// Pause between reads when the port reports no data.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Trait for serial port operations
#[async_trait::async_trait]
pub trait SerialPort: AsyncReadExt + AsyncWriteExt + Unpin + Send {
    async fn flush(&mut self) -> Result<(), std::io::Error>;
}

#[async_trait::async_trait]
impl SerialPort for tokio_serial::SerialStream {
    async fn flush(&mut self) -> Result<(), std::io::Error> {
        AsyncWriteExt::flush(self).await
    }
}

#[async_trait::async_trait]
impl SerialPort for crate::rfid::serial_mock::MockSerialPort {
    async fn flush(&mut self) -> Result<(), std::io::Error> {
        Ok(())
    }
}

/// Configuration for serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    /// Upper bound for receiving one complete response frame
    pub timeout: Duration,
    /// Accept write acknowledgements that echo the read command code
    pub accept_read_echo_ack: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: 115_200,
            timeout: Duration::from_secs(1),
            accept_read_echo_ack: false,
        }
    }
}

/// Handle to a reader/writer module behind a serial port.
pub struct RfidReaderHandle<P: SerialPort> {
    port: P,
    config: SerialConfig,
    reader: FrameReader,
}

impl RfidReaderHandle<tokio_serial::SerialStream> {
    /// Opens `port_name` with the default configuration (115200 8N1).
    pub async fn connect(port_name: &str) -> Result<Self, RfidError> {
        Self::connect_with_config(port_name, SerialConfig::default()).await
    }

    /// Opens `port_name` with a custom configuration.
    pub async fn connect_with_config(
        port_name: &str,
        config: SerialConfig,
    ) -> Result<Self, RfidError> {
        let port = tokio_serial::new(port_name, config.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .timeout(config.timeout)
            .open_native_async()
            .map_err(|e| RfidError::SerialPortError(e.to_string()))?;

        debug!("opened {port_name} at {} baud", config.baudrate);
        Ok(Self::new(port, config))
    }
}

impl<P: SerialPort> RfidReaderHandle<P> {
    /// Wraps an already open port.
    pub fn new(port: P, config: SerialConfig) -> Self {
        RfidReaderHandle {
            port,
            config,
            reader: FrameReader::for_responses(),
        }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Releases the underlying port.
    pub fn into_inner(self) -> P {
        self.port
    }

    /// Writes one command frame. Bytes still buffered from an earlier
    /// exchange are dropped first.
    pub async fn send_command(&mut self, frame: &[u8]) -> Result<(), RfidError> {
        self.reader.clear();
        log_frame_hex("TX", frame);
        self.port
            .write_all(frame)
            .await
            .map_err(|e| RfidError::SerialPortError(e.to_string()))?;
        SerialPort::flush(&mut self.port)
            .await
            .map_err(|e| RfidError::SerialPortError(e.to_string()))
    }

    /// Reads until one response frame is complete or the timeout elapses.
    pub async fn recv_frame(&mut self) -> Result<ParsedFrame, RfidError> {
        self.receive(None).await
    }

    /// Reads until a response for `channel` is complete or the timeout
    /// elapses. Responses for any other channel are dropped.
    pub async fn recv_reply(&mut self, channel: Channel) -> Result<ParsedFrame, RfidError> {
        self.receive(Some(channel)).await
    }

    async fn receive(&mut self, channel: Option<Channel>) -> Result<ParsedFrame, RfidError> {
        let limit = self.config.timeout;
        let received = tokio::time::timeout(limit, self.read_until_reply(channel)).await;
        match received {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "no complete response within {limit:?} ({} byte(s) buffered)",
                    self.reader.buffered()
                );
                Err(RfidError::Timeout)
            }
        }
    }

    async fn read_until_reply(&mut self, channel: Option<Channel>) -> Result<ParsedFrame, RfidError> {
        loop {
            let frame = self.read_until_frame().await?;
            match (channel, frame.channel()) {
                (Some(wanted), Some(got)) if got != wanted.index() => {
                    warn!("dropping stale response for channel {got}, waiting on channel {wanted}");
                }
                _ => return Ok(frame),
            }
        }
    }

    async fn read_until_frame(&mut self) -> Result<ParsedFrame, RfidError> {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(result) = self.reader.next_frame() {
                match &result {
                    Ok(frame) => log_frame_structured("RX", frame),
                    Err(e) => warn!("discarding response frame: {e}"),
                }
                return result;
            }

            let n = self
                .port
                .read(&mut chunk)
                .await
                .map_err(|e| RfidError::SerialPortError(e.to_string()))?;
            if n == 0 {
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            }
            log_frame_hex("RX", &chunk[..n]);
            self.reader.feed(&chunk[..n]);
        }
    }

    /// Sends a command and waits for its response frame.
    pub async fn request_response(&mut self, frame: &[u8]) -> Result<ParsedFrame, RfidError> {
        self.send_command(frame).await?;
        self.recv_frame().await
    }

    /// Reads the tag on `channel`.
    pub async fn read_channel(&mut self, channel: impl IntoChannel) -> Result<ReadOutcome, RfidError> {
        let channel = channel.into_channel()?;
        let command = build_read_command(channel)?;
        self.send_command(&command).await?;
        let frame = self.recv_reply(channel).await?;
        let outcome = interpret_read_frame(&frame)?;

        if let ReadOutcome::TagPresent {
            channel,
            surplus_bytes,
            ..
        } = &outcome
        {
            if *surplus_bytes > 0 {
                warn!("channel {channel}: ignored {surplus_bytes} byte(s) after the tag record");
            }
        }
        Ok(outcome)
    }

    /// Validates `record` and writes it to the tag on `channel`.
    pub async fn write_channel(
        &mut self,
        channel: impl IntoChannel,
        record: &TagRecord,
    ) -> Result<WriteOutcome, RfidError> {
        let channel = channel.into_channel()?;
        record.validate()?;
        let command = build_write_command(channel, record)?;
        self.send_command(&command).await?;
        let frame = self.recv_reply(channel).await?;
        interpret_write_frame(&frame, self.config.accept_read_echo_ack)
    }
}
