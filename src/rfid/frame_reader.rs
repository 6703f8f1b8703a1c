//! Incremental frame reader for bytes that arrive piecemeal from the wire.
//!
//! Uses `bytes::BytesMut` for the pending input and the frame under
//! construction. The state machine runs
//! `AwaitingHeader -> AwaitingLength -> AwaitingBody -> Complete`:
//!
//! - bytes other than `0xEF` while awaiting a header are discarded;
//! - a length byte below the minimum frame size drops the candidate and
//!   resynchronises on the next `0xEF`;
//! - a body whose last byte is not the terminator is treated as a false header
//!   and every byte after that header is scanned again, so a real frame hidden
//!   behind line noise is not lost;
//! - a body that ends on the terminator but fails its checksum is rescanned the
//!   same way; the checksum error is held back and reported only if no valid
//!   frame starts inside the rejected bytes;
//! - `Complete` holds one validated (or checksum-failed) frame until it is
//!   taken, after which the reader is back in `AwaitingHeader`.
//!
//! A reader is owned by one session; it is not meant to be shared between
//! threads without external locking.
//!
//! # Example
//!
//! ```rust
//! use rfid_tag_rs::rfid::frame_reader::FrameReader;
//!
//! let mut reader = FrameReader::for_responses();
//! assert!(reader.push(&[0x00, 0xEF, 0x07, 0x11]).is_empty());
//! let frames = reader.push(&[0x02, 0x01, 0x05, 0xFE]);
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].as_ref().unwrap().status, Some(0x02));
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::constants::{FRAME_HEADER, FRAME_TERMINATOR, MAX_FRAME_LEN};
use crate::error::RfidError;
use crate::rfid::frame::{minimum_frame_len, parse_frame, ParsedFrame};

/// Position of the reader inside the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    AwaitingHeader,
    AwaitingLength,
    /// Header and length seen; `length` is the declared total frame size.
    AwaitingBody { length: usize },
    /// A full frame has been delimited and waits in [`FrameReader::take_frame`].
    Complete,
}

/// Byte-at-a-time frame assembler.
#[derive(Debug)]
pub struct FrameReader {
    /// Bytes fed but not yet consumed by the state machine.
    input: BytesMut,
    /// Bytes of the frame under construction.
    frame: BytesMut,
    state: ReaderState,
    expect_status: bool,
    ready: Option<Result<ParsedFrame, RfidError>>,
    /// Checksum failure waiting for its rescan to finish.
    held: Option<RfidError>,
    /// Bytes at the front of `input` that belong to the held candidate.
    held_span: usize,
    discarded: usize,
}

impl FrameReader {
    /// Creates a reader; `expect_status` selects response (`true`) or command framing.
    pub fn new(expect_status: bool) -> Self {
        Self {
            input: BytesMut::with_capacity(MAX_FRAME_LEN),
            frame: BytesMut::with_capacity(MAX_FRAME_LEN),
            state: ReaderState::AwaitingHeader,
            expect_status,
            ready: None,
            held: None,
            held_span: 0,
            discarded: 0,
        }
    }

    /// Reader for module-to-host frames.
    pub fn for_responses() -> Self {
        Self::new(true)
    }

    /// Reader for host-to-module frames.
    pub fn for_commands() -> Self {
        Self::new(false)
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Number of bytes dropped while searching for a frame header.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Bytes held by the reader, queued input and partial frame together.
    pub fn buffered(&self) -> usize {
        self.input.len() + self.frame.len()
    }

    /// Queues bytes without running the state machine.
    pub fn feed(&mut self, data: &[u8]) {
        self.input.extend_from_slice(data);
    }

    /// Runs the state machine over queued input until a frame completes or
    /// the input runs out.
    pub fn advance(&mut self) -> ReaderState {
        while self.state != ReaderState::Complete && self.input.has_remaining() {
            let byte = self.input.get_u8();
            self.held_span = self.held_span.saturating_sub(1);
            self.step(byte);
            self.release_held();
        }
        self.state
    }

    /// Hands out the completed frame and returns the reader to `AwaitingHeader`.
    pub fn take_frame(&mut self) -> Option<Result<ParsedFrame, RfidError>> {
        if self.state != ReaderState::Complete {
            return None;
        }
        self.state = ReaderState::AwaitingHeader;
        self.ready.take()
    }

    /// Advances and takes the next frame, if one is available.
    pub fn next_frame(&mut self) -> Option<Result<ParsedFrame, RfidError>> {
        self.advance();
        self.take_frame()
    }

    /// Feeds `data` and collects every frame it completes.
    pub fn push(&mut self, data: &[u8]) -> Vec<Result<ParsedFrame, RfidError>> {
        self.feed(data);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame() {
            frames.push(frame);
        }
        frames
    }

    /// Drops all buffered bytes and any completed frame.
    pub fn clear(&mut self) {
        self.input.clear();
        self.frame.clear();
        self.ready = None;
        self.held = None;
        self.held_span = 0;
        self.state = ReaderState::AwaitingHeader;
    }

    fn step(&mut self, byte: u8) {
        match self.state {
            ReaderState::AwaitingHeader => {
                if byte == FRAME_HEADER {
                    self.frame.put_u8(byte);
                    self.state = ReaderState::AwaitingLength;
                } else {
                    self.discarded += 1;
                }
            }
            ReaderState::AwaitingLength => {
                let length = byte as usize;
                if length < minimum_frame_len(self.expect_status) {
                    self.discarded += self.frame.len() + 1;
                    self.frame.clear();
                    self.state = ReaderState::AwaitingHeader;
                } else {
                    self.frame.put_u8(byte);
                    self.state = ReaderState::AwaitingBody { length };
                }
            }
            ReaderState::AwaitingBody { length } => {
                self.frame.put_u8(byte);
                if self.frame.len() == length {
                    self.finish();
                }
            }
            ReaderState::Complete => {}
        }
    }

    fn finish(&mut self) {
        let frame = self.frame.split().freeze();
        if frame.last() != Some(&FRAME_TERMINATOR) {
            // false header: rescan everything after it ahead of the queued input
            self.replay(&frame);
            return;
        }
        match parse_frame(&frame, self.expect_status) {
            Err(e @ RfidError::ChecksumMismatch { .. }) => {
                self.held.get_or_insert(e);
                self.replay(&frame);
            }
            result => {
                // a frame found by the rescan supersedes the held failure
                self.held = None;
                self.held_span = 0;
                self.ready = Some(result);
                self.state = ReaderState::Complete;
            }
        }
    }

    fn replay(&mut self, frame: &[u8]) {
        self.discarded += 1;
        let mut replay = BytesMut::with_capacity(frame.len() - 1 + self.input.len());
        replay.extend_from_slice(&frame[1..]);
        replay.extend_from_slice(&self.input);
        self.input = replay;
        if self.held.is_some() {
            self.held_span += frame.len() - 1;
        }
        self.state = ReaderState::AwaitingHeader;
    }

    /// Reports a held checksum failure once its rescan found nothing.
    fn release_held(&mut self) {
        if self.held_span == 0 && self.state == ReaderState::AwaitingHeader {
            if let Some(e) = self.held.take() {
                self.ready = Some(Err(e));
                self.state = ReaderState::Complete;
            }
        }
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::for_responses()
    }
}
