#![no_main]

use libfuzzer_sys::fuzz_target;
use rfid_tag_rs::rfid::command::HostCommand;
use rfid_tag_rs::rfid::frame::parse_frame;
use rfid_tag_rs::{parse_read_response, parse_write_response_with};

fuzz_target!(|data: &[u8]| {
    // Any input must be rejected or accepted without panicking
    let _ = parse_frame(data, true);
    let _ = parse_frame(data, false);
    let _ = HostCommand::decode(data);
    let _ = parse_read_response(data);
    let _ = parse_write_response_with(data, true);

    // Force the declared length to match so the deeper checks run
    if data.len() >= 6 && data.len() <= 255 {
        let mut framed = data.to_vec();
        framed[0] = 0xEF;
        framed[1] = data.len() as u8;
        let last = framed.len() - 1;
        framed[last] = 0xFE;
        let _ = parse_read_response(&framed);
        let _ = HostCommand::decode(&framed);
    }
});
