//! # Frame Logging Utilities
//!
//! Hex dumps and one-line summaries of reader traffic, emitted through the
//! `log` facade at debug level.

use crate::rfid::frame::ParsedFrame;
use crate::util::hex::format_hex_compact;

/// Limit hex output to prevent log spam
const MAX_LOG_BYTES: usize = 64;

/// Log raw bytes as hex, truncated to [`MAX_LOG_BYTES`].
pub fn log_frame_hex(prefix: &str, data: &[u8]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    log::debug!("{prefix}: {}", hex_for_log(data));
}

/// Log a parsed frame as a one-line summary.
pub fn log_frame_structured(prefix: &str, frame: &ParsedFrame) {
    log::debug!("{prefix}: {}", describe_frame(frame));
}

/// One-line summary such as `cmd=0x11 sta=0x02 len=7 data=[01]`.
pub fn describe_frame(frame: &ParsedFrame) -> String {
    let status = frame
        .status
        .map(|s| format!(" sta=0x{s:02X}"))
        .unwrap_or_default();
    format!(
        "cmd=0x{:02X}{status} len={} data=[{}]",
        frame.command,
        frame.length,
        hex_for_log(&frame.data)
    )
}

fn hex_for_log(data: &[u8]) -> String {
    if data.len() > MAX_LOG_BYTES {
        format!(
            "{} ... ({} bytes total)",
            format_hex_compact(&data[..MAX_LOG_BYTES]),
            data.len()
        )
    } else {
        format_hex_compact(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_frame() {
        let frame = ParsedFrame {
            length: 7,
            command: 0x11,
            status: Some(0x02),
            data: vec![0x01],
            checksum: 0x05,
        };
        assert_eq!(describe_frame(&frame), "cmd=0x11 sta=0x02 len=7 data=[01]");
    }

    #[test]
    fn test_long_data_truncated() {
        let text = hex_for_log(&[0xAA; 100]);
        assert!(text.ends_with("... (100 bytes total)"));
    }
}
