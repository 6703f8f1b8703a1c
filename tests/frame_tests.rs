//! Tests for frame building and parsing, including the captured exchanges
//! from the reader's protocol sheet.

use proptest::prelude::*;
use rfid_tag_rs::constants::MAX_COMMAND_PAYLOAD;
use rfid_tag_rs::error::RfidError;
use rfid_tag_rs::payload::encode_record;
use rfid_tag_rs::rfid::command::{build_read_command, build_write_command, Channel, HostCommand};
use rfid_tag_rs::rfid::frame::{build_command_frame, build_response_frame, parse_frame};
use rfid_tag_rs::rfid::response::{parse_read_response, parse_write_response};
use rfid_tag_rs::{ReadOutcome, TagRecord, WriteOutcome};

const READ_CHANNEL_1: [u8; 6] = [0xEF, 0x06, 0x11, 0x01, 0x06, 0xFE];
const READ_NO_TAG: [u8; 7] = [0xEF, 0x07, 0x11, 0x02, 0x01, 0x05, 0xFE];
const WRITE_NO_TAG: [u8; 7] = [0xEF, 0x07, 0x12, 0x02, 0x01, 0x06, 0xFE];

fn read_tag_present() -> Vec<u8> {
    let mut bytes = vec![0xEF, 0x77, 0x11, 0x00, 0x01];
    bytes.extend_from_slice(&[0u8; 112]);
    bytes.extend_from_slice(&[0x77, 0xFE]);
    bytes
}

fn pla() -> TagRecord {
    TagRecord {
        version: 1000,
        manufacturer: "MINGDA".into(),
        material: "PLA".into(),
        color: "Red".into(),
        diameter_target_um: 1750,
        weight_nominal_g: 1000,
        print_temp_c: 200,
        bed_temp_c: 60,
        density: 1240,
    }
}

/// Tests that the read command for channel 1 matches the captured bytes and
/// decodes back to channel 1.
#[test]
fn test_read_command_scenario() {
    assert_eq!(build_read_command(1).unwrap(), READ_CHANNEL_1.to_vec());

    let frame = parse_frame(&READ_CHANNEL_1, false).unwrap();
    assert_eq!(frame.command, 0x11);
    assert_eq!(frame.channel(), Some(1));
    assert_eq!(frame.status, None);
    assert_eq!(
        HostCommand::decode(&READ_CHANNEL_1).unwrap(),
        HostCommand::Read {
            channel: Channel::new(1).unwrap()
        }
    );
}

/// Tests the full tag-present read response.
#[test]
fn test_read_tag_present_scenario() {
    let bytes = read_tag_present();
    assert_eq!(bytes.len(), 119);

    let frame = parse_frame(&bytes, true).unwrap();
    assert_eq!(frame.status, Some(0x00));
    assert_eq!(frame.channel(), Some(1));
    assert_eq!(frame.data.len(), 113);

    match parse_read_response(&bytes).unwrap() {
        ReadOutcome::TagPresent {
            channel,
            record,
            surplus_bytes,
        } => {
            assert_eq!(channel, 1);
            assert_eq!(record, TagRecord::default());
            assert_eq!(surplus_bytes, 0);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

/// Tests the "no tag" read response.
#[test]
fn test_read_no_tag_scenario() {
    assert_eq!(
        parse_read_response(&READ_NO_TAG).unwrap(),
        ReadOutcome::TagAbsent { channel: 1 }
    );
}

/// Tests the "no tag" write acknowledgement.
#[test]
fn test_write_no_tag_scenario() {
    assert_eq!(
        parse_write_response(&WRITE_NO_TAG).unwrap(),
        WriteOutcome::TagAbsent { channel: 1 }
    );
}

/// Tests that a write command carries the channel and the encoded record.
#[test]
fn test_write_command_layout() {
    let record = pla();
    let bytes = build_write_command(3, &record).unwrap();
    assert_eq!(bytes.len(), 118);
    assert_eq!(&bytes[..4], &[0xEF, 0x76, 0x12, 0x03]);
    assert_eq!(&bytes[4..116], &encode_record(&record).unwrap()[..]);
    assert_eq!(bytes[117], 0xFE);

    assert_eq!(
        HostCommand::decode(&bytes).unwrap(),
        HostCommand::Write {
            channel: Channel::new(3).unwrap(),
            record
        }
    );
}

/// Tests channel validation at the edges of the range.
#[test]
fn test_channel_bounds() {
    assert!(build_read_command(0).is_ok());
    assert!(build_read_command(7).is_ok());
    assert_eq!(build_read_command(8), Err(RfidError::InvalidChannel(8)));
    assert_eq!(build_read_command(-1), Err(RfidError::InvalidChannel(-1)));
    assert!(matches!(
        build_write_command(9, &pla()),
        Err(RfidError::InvalidChannel(9))
    ));
}

/// Tests the one-byte length limit on both frame kinds.
#[test]
fn test_payload_too_large() {
    assert_eq!(
        build_command_frame(0x12, &[0u8; 251]),
        Err(RfidError::PayloadTooLarge { len: 251, max: 250 })
    );
    assert_eq!(
        build_response_frame(0x11, 0x00, &[0u8; 250]),
        Err(RfidError::PayloadTooLarge { len: 250, max: 249 })
    );
    let largest = build_command_frame(0x12, &[0u8; MAX_COMMAND_PAYLOAD]).unwrap();
    assert_eq!(largest.len(), 255);
}

/// Tests that truncated input asks for more bytes.
#[test]
fn test_incomplete_input() {
    assert_eq!(
        parse_frame(&READ_NO_TAG[..4], true),
        Err(RfidError::Incomplete { needed: 3 })
    );
    assert_eq!(
        parse_frame(&[0xEF], true),
        Err(RfidError::Incomplete { needed: 5 })
    );
    assert!(parse_frame(&[], false).unwrap_err().is_incomplete());
}

/// Tests that bytes past the declared length are rejected.
#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = READ_NO_TAG.to_vec();
    bytes.push(0x00);
    assert!(matches!(
        parse_frame(&bytes, true),
        Err(RfidError::MalformedResponse(_))
    ));
}

/// Tests header, terminator and checksum faults.
#[test]
fn test_framing_faults() {
    let mut bad_header = READ_NO_TAG;
    bad_header[0] = 0xEE;
    assert!(matches!(
        parse_frame(&bad_header, true),
        Err(RfidError::MalformedResponse(_))
    ));

    let mut bad_terminator = READ_NO_TAG;
    bad_terminator[6] = 0xFF;
    assert!(matches!(
        parse_frame(&bad_terminator, true),
        Err(RfidError::MalformedResponse(_))
    ));

    let mut bad_bcc = READ_NO_TAG;
    bad_bcc[5] = 0x04;
    assert_eq!(
        parse_frame(&bad_bcc, true),
        Err(RfidError::ChecksumMismatch {
            expected: 0x04,
            calculated: 0x05
        })
    );
}

fn assert_rejected(result: Result<(), RfidError>, context: &str) {
    match result {
        Err(RfidError::ChecksumMismatch { .. }) | Err(RfidError::MalformedResponse(_)) => {}
        other => panic!("{context}: expected rejection, got {other:?}"),
    }
}

/// Tests that flipping any single bit outside the channel byte of the
/// captured frames never yields a successful parse.
#[test]
fn test_single_bit_corruption_rejected() {
    let cases: Vec<(&str, Vec<u8>, usize)> = vec![
        ("read command", READ_CHANNEL_1.to_vec(), 3),
        ("read tag present", read_tag_present(), 4),
        ("read no tag", READ_NO_TAG.to_vec(), 4),
        ("write no tag", WRITE_NO_TAG.to_vec(), 4),
    ];

    for (name, bytes, channel_index) in cases {
        for index in (0..bytes.len()).filter(|&i| i != channel_index) {
            for bit in 0..8 {
                let mut corrupted = bytes.clone();
                corrupted[index] ^= 1 << bit;
                let context = format!("{name} byte {index} bit {bit}");
                let result = match name {
                    "read command" => HostCommand::decode(&corrupted).map(|_| ()),
                    "write no tag" => parse_write_response(&corrupted).map(|_| ()),
                    _ => parse_read_response(&corrupted).map(|_| ()),
                };
                assert_rejected(result, &context);
            }
        }
    }
}

prop_compose! {
    fn arb_record()(
        manufacturer in "[A-Za-z0-9]{1,16}",
        material in "[A-Z]{1,16}",
        color in "[a-z]{0,32}",
        diameter_target_um in 0u32..=0xFFFF,
        print_temp_c in 0u32..=0xFFFF,
    ) -> TagRecord {
        TagRecord {
            version: 1000,
            manufacturer,
            material,
            color,
            diameter_target_um,
            weight_nominal_g: 1000,
            print_temp_c,
            bed_temp_c: 60,
            density: 1240,
        }
    }
}

proptest! {
    #[test]
    fn prop_write_frame_symmetry(channel in 0u8..8, record in arb_record()) {
        let mut payload = vec![channel];
        payload.extend_from_slice(&encode_record(&record).unwrap());

        let bytes = build_command_frame(0x12, &payload).unwrap();
        let frame = parse_frame(&bytes, false).unwrap();
        prop_assert_eq!(frame.command, 0x12);
        prop_assert_eq!(frame.data, payload);
    }

    #[test]
    fn prop_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..300), status in any::<bool>()) {
        let _ = parse_frame(&bytes, status);
    }
}
