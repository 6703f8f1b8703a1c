//! # Utility Modules
//!
//! Hex encoding/decoding and frame logging helpers shared by the transport
//! layer and the CLI.

pub mod hex;
pub mod logging;

pub use hex::{decode_hex, encode_hex_upper, format_hex_compact, pretty_hex, HexError};
pub use logging::{describe_frame, log_frame_hex, log_frame_structured};
