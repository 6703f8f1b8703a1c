//! Field table of the 112-byte tag record.
//!
//! Offsets are derived from the declaration order; a compile-time check keeps
//! the table contiguous and exactly [`TAG_RECORD_LEN`] bytes wide.

use crate::constants::TAG_RECORD_LEN;

/// How a field's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Big-endian unsigned integer of the field's width
    Unsigned,
    /// ASCII, `0x00`-padded on write, NUL/space-stripped on read
    Text,
    /// Opaque, zero-filled on write
    Reserved,
}

/// One entry of the record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Byte range of this field inside an encoded record.
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }

    /// Largest value an unsigned field of this width can hold.
    pub const fn max_unsigned(&self) -> u32 {
        if self.width >= 4 {
            u32::MAX
        } else {
            (1u32 << (self.width * 8)) - 1
        }
    }
}

pub const VERSION: FieldSpec = FieldSpec { name: "version", offset: 0, width: 2, kind: FieldKind::Unsigned };
pub const MANUFACTURER: FieldSpec = FieldSpec { name: "manufacturer", offset: 2, width: 16, kind: FieldKind::Text };
pub const MATERIAL: FieldSpec = FieldSpec { name: "material", offset: 18, width: 16, kind: FieldKind::Text };
pub const COLOR: FieldSpec = FieldSpec { name: "color", offset: 34, width: 32, kind: FieldKind::Text };
pub const DIAMETER: FieldSpec = FieldSpec { name: "diameter_target_um", offset: 66, width: 2, kind: FieldKind::Unsigned };
pub const WEIGHT: FieldSpec = FieldSpec { name: "weight_nominal_g", offset: 68, width: 2, kind: FieldKind::Unsigned };
pub const PRINT_TEMP: FieldSpec = FieldSpec { name: "print_temp_c", offset: 70, width: 2, kind: FieldKind::Unsigned };
pub const BED_TEMP: FieldSpec = FieldSpec { name: "bed_temp_c", offset: 72, width: 2, kind: FieldKind::Unsigned };
pub const DENSITY: FieldSpec = FieldSpec { name: "density", offset: 74, width: 2, kind: FieldKind::Unsigned };
pub const RESERVED: FieldSpec = FieldSpec { name: "reserved", offset: 76, width: 36, kind: FieldKind::Reserved };

/// The full record layout in wire order.
pub const TAG_RECORD_LAYOUT: [FieldSpec; 10] = [
    VERSION,
    MANUFACTURER,
    MATERIAL,
    COLOR,
    DIAMETER,
    WEIGHT,
    PRINT_TEMP,
    BED_TEMP,
    DENSITY,
    RESERVED,
];

const fn layout_is_contiguous(layout: &[FieldSpec]) -> bool {
    let mut expected_offset = 0;
    let mut i = 0;
    while i < layout.len() {
        if layout[i].offset != expected_offset {
            return false;
        }
        expected_offset += layout[i].width;
        i += 1;
    }
    expected_offset == TAG_RECORD_LEN
}

const _: () = assert!(layout_is_contiguous(&TAG_RECORD_LAYOUT));

/// Looks up a field by name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    const LAYOUT: &[FieldSpec] = &TAG_RECORD_LAYOUT;
    LAYOUT.iter().find(|f| f.name == name)
}
