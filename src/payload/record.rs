//! # Tag Record Codec
//!
//! Maps the 112-byte material-property block stored on a tag to a typed
//! [`TagRecord`] and back, following [`TAG_RECORD_LAYOUT`](super::layout::TAG_RECORD_LAYOUT).
//!
//! ## Encoding rules
//!
//! - Unsigned fields are big-endian and must fit their width, otherwise
//!   [`RfidError::FieldOverflow`] is returned.
//! - Text fields keep only the ASCII characters of the input, are cut at the
//!   field width and right-padded with `0x00`.
//! - The reserved tail is zero-filled.
//!
//! ## Decoding rules
//!
//! - Text fields are read at their full width, trailing `0x00` and space bytes
//!   are stripped and the rest is decoded as lossy UTF-8.
//! - Input shorter than 112 bytes is [`RfidError::InvalidLength`]; bytes past
//!   112 are ignored and reported by [`decode_record_with_surplus`].

use serde::{Deserialize, Serialize};

use super::layout::{
    FieldSpec, BED_TEMP, COLOR, DENSITY, DIAMETER, MANUFACTURER, MATERIAL, PRINT_TEMP, VERSION,
    WEIGHT,
};
use crate::constants::TAG_RECORD_LEN;
use crate::error::RfidError;

/// Decoded material-property record of one tag.
///
/// Numeric fields are held wider than their wire width so that out-of-range
/// input is caught by the encoder instead of being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Format version with three implied decimals (`1000` is `1.000`)
    pub version: u32,
    pub manufacturer: String,
    pub material: String,
    pub color: String,
    /// Target filament diameter in micrometres (`1750` is 1.75 mm)
    pub diameter_target_um: u32,
    pub weight_nominal_g: u32,
    pub print_temp_c: u32,
    pub bed_temp_c: u32,
    /// Density as stored on the tag (`1240` for 1.24 g/cm³)
    pub density: u32,
}

impl TagRecord {
    /// Encodes this record into its 112-byte block.
    pub fn encode(&self) -> Result<[u8; TAG_RECORD_LEN], RfidError> {
        encode_record(self)
    }

    /// Decodes a record from the first 112 bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<TagRecord, RfidError> {
        decode_record(bytes)
    }

    /// Renders the version with its three implied decimals.
    pub fn version_string(&self) -> String {
        format!("{}.{:03}", self.version / 1000, self.version % 1000)
    }

    /// Parses a dotted version such as `"1.75"` into its implied-decimal form.
    pub fn parse_version(text: &str) -> Result<u32, RfidError> {
        let invalid = || RfidError::InvalidRecord(format!("invalid version: {text:?}"));
        let text = text.trim().trim_start_matches(&['V', 'v'][..]);
        let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
        let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || frac.len() > 3 || !digits(whole) || !digits(frac) {
            return Err(invalid());
        }
        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let frac: u32 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<3}").parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(1000)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(invalid)
    }

    /// Target diameter in millimetres.
    pub fn diameter_mm(&self) -> f32 {
        self.diameter_target_um as f32 / 1000.0
    }

    /// Checks the fields a writable record must carry.
    pub fn validate(&self) -> Result<(), RfidError> {
        if self.manufacturer.trim().is_empty() {
            return Err(RfidError::InvalidRecord("manufacturer must not be empty".into()));
        }
        if self.material.trim().is_empty() {
            return Err(RfidError::InvalidRecord("material must not be empty".into()));
        }
        Ok(())
    }
}

/// Encodes `record` into exactly [`TAG_RECORD_LEN`] bytes.
pub fn encode_record(record: &TagRecord) -> Result<[u8; TAG_RECORD_LEN], RfidError> {
    let mut out = [0u8; TAG_RECORD_LEN];

    put_unsigned(&mut out, &VERSION, record.version)?;
    put_text(&mut out, &MANUFACTURER, &record.manufacturer);
    put_text(&mut out, &MATERIAL, &record.material);
    put_text(&mut out, &COLOR, &record.color);
    put_unsigned(&mut out, &DIAMETER, record.diameter_target_um)?;
    put_unsigned(&mut out, &WEIGHT, record.weight_nominal_g)?;
    put_unsigned(&mut out, &PRINT_TEMP, record.print_temp_c)?;
    put_unsigned(&mut out, &BED_TEMP, record.bed_temp_c)?;
    put_unsigned(&mut out, &DENSITY, record.density)?;

    Ok(out)
}

/// Decodes a record, ignoring any bytes past the first 112.
pub fn decode_record(bytes: &[u8]) -> Result<TagRecord, RfidError> {
    decode_record_with_surplus(bytes).map(|(record, _)| record)
}

/// Decodes a record and returns how many trailing bytes were ignored.
pub fn decode_record_with_surplus(bytes: &[u8]) -> Result<(TagRecord, usize), RfidError> {
    if bytes.len() < TAG_RECORD_LEN {
        return Err(RfidError::InvalidLength {
            expected: TAG_RECORD_LEN,
            actual: bytes.len(),
        });
    }
    let block = &bytes[..TAG_RECORD_LEN];

    let record = TagRecord {
        version: get_unsigned(block, &VERSION),
        manufacturer: get_text(block, &MANUFACTURER),
        material: get_text(block, &MATERIAL),
        color: get_text(block, &COLOR),
        diameter_target_um: get_unsigned(block, &DIAMETER),
        weight_nominal_g: get_unsigned(block, &WEIGHT),
        print_temp_c: get_unsigned(block, &PRINT_TEMP),
        bed_temp_c: get_unsigned(block, &BED_TEMP),
        density: get_unsigned(block, &DENSITY),
    };

    Ok((record, bytes.len() - TAG_RECORD_LEN))
}

fn put_unsigned(out: &mut [u8], spec: &FieldSpec, value: u32) -> Result<(), RfidError> {
    let max = spec.max_unsigned();
    if value > max {
        return Err(RfidError::FieldOverflow {
            field: spec.name,
            value,
            max,
        });
    }
    let be = value.to_be_bytes();
    out[spec.range()].copy_from_slice(&be[be.len() - spec.width..]);
    Ok(())
}

fn put_text(out: &mut [u8], spec: &FieldSpec, text: &str) {
    let ascii = text
        .chars()
        .filter(char::is_ascii)
        .take(spec.width)
        .map(|c| c as u8);
    for (slot, byte) in out[spec.range()].iter_mut().zip(ascii) {
        *slot = byte;
    }
}

fn get_unsigned(block: &[u8], spec: &FieldSpec) -> u32 {
    block[spec.range()]
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn get_text(block: &[u8], spec: &FieldSpec) -> String {
    let raw = &block[spec.range()];
    let end = raw
        .iter()
        .rposition(|&b| b != 0x00 && b != b' ')
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
