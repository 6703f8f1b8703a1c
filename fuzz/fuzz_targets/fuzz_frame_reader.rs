#![no_main]

use libfuzzer_sys::fuzz_target;
use rfid_tag_rs::rfid::frame_reader::FrameReader;

fuzz_target!(|data: &[u8]| {
    let Some((&split, stream)) = data.split_first() else {
        return;
    };

    let mut reader = FrameReader::for_responses();
    let chunk = usize::from(split).max(1);
    let mut frames = 0;
    for piece in stream.chunks(chunk) {
        frames += reader.push(piece).len();
    }

    // Every complete frame is at least six bytes long
    assert!(frames * 6 <= stream.len());
    assert!(reader.buffered() <= stream.len());
});
