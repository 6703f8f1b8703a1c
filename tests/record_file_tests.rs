//! Tests for records kept as JSON files, the format `rfid-cli write` reads.

use std::io::Write;

use rfid_tag_rs::{build_write_command, TagRecord};
use tempfile::NamedTempFile;

fn load(path: &std::path::Path) -> TagRecord {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Tests loading a hand-written record file and framing it for a write.
#[test]
fn test_record_file_to_write_frame() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "version": 1000,
            "manufacturer": "MINGDA",
            "material": "PLA",
            "color": "Sky Blue",
            "diameter_target_um": 1750,
            "weight_nominal_g": 1000,
            "print_temp_c": 205,
            "bed_temp_c": 60,
            "density": 1240
        }}"#
    )
    .unwrap();

    let record = load(file.path());
    assert!(record.validate().is_ok());
    assert_eq!(record.color, "Sky Blue");

    let frame = build_write_command(0, &record).unwrap();
    assert_eq!(frame.len(), 118);
    assert_eq!(&frame[22..25], b"PLA");
}

/// Tests that a record written to disk loads back unchanged.
#[test]
fn test_record_file_round_trip() {
    let record = TagRecord {
        version: 1001,
        manufacturer: "Acme".into(),
        material: "Nylon".into(),
        color: "Natural".into(),
        diameter_target_um: 2850,
        weight_nominal_g: 2000,
        print_temp_c: 260,
        bed_temp_c: 90,
        density: 1140,
    };

    let file = NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(file.as_file(), &record).unwrap();
    assert_eq!(load(file.path()), record);
}

/// Tests that a record missing a field is rejected by the JSON loader.
#[test]
fn test_record_file_missing_field() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "manufacturer": "Acme" }}"#).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    assert!(serde_json::from_str::<TagRecord>(&text).is_err());
}
