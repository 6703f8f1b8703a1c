//! Tests for the block check character shared by every frame.

use proptest::prelude::*;
use rfid_tag_rs::rfid::checksum::{compute, verify};

/// Tests the BCC of the documented read command for channel 1.
#[test]
fn test_read_command_bcc() {
    assert_eq!(compute(&[0xEF, 0x06, 0x11, 0x01]), 0x06);
}

/// Tests the BCC of the documented "no tag" read response.
#[test]
fn test_no_tag_response_bcc() {
    assert_eq!(compute(&[0xEF, 0x07, 0x11, 0x02, 0x01]), 0x05);
}

/// Tests the BCC of a full 119-byte response carrying an all-zero record.
#[test]
fn test_full_record_response_bcc() {
    let mut bytes = vec![0xEF, 0x77, 0x11, 0x00, 0x01];
    bytes.extend_from_slice(&[0u8; 112]);
    assert_eq!(compute(&bytes), 0x77);
}

/// Tests that the BCC of an empty input is the complement of zero.
#[test]
fn test_empty_input() {
    assert_eq!(compute(&[]), 0xFF);
}

proptest! {
    #[test]
    fn prop_own_checksum_verifies(bytes in prop::collection::vec(any::<u8>(), 1..256)) {
        prop_assert!(verify(&bytes, compute(&bytes)));
    }

    #[test]
    fn prop_bit_flip_in_data_fails(
        bytes in prop::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let bcc = compute(&bytes);
        let mut flipped = bytes.clone();
        let i = index.index(flipped.len());
        flipped[i] ^= 1 << bit;
        prop_assert!(!verify(&flipped, bcc));
    }

    #[test]
    fn prop_bit_flip_in_checksum_fails(
        bytes in prop::collection::vec(any::<u8>(), 1..256),
        bit in 0u8..8,
    ) {
        let bcc = compute(&bytes) ^ (1 << bit);
        prop_assert!(!verify(&bytes, bcc));
    }
}
