//! The payload module holds the tag record model and its fixed-width codec.

pub mod layout;
pub mod record;

pub use layout::{FieldKind, FieldSpec, TAG_RECORD_LAYOUT};
pub use record::{decode_record, decode_record_with_surplus, encode_record, TagRecord};
