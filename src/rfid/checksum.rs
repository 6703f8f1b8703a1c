//! # Block Check Character
//!
//! The BCC is the one's complement of the XOR of every byte from the frame
//! header through the last data byte. It never covers the BCC itself or the
//! terminator.

/// Computes the BCC over `bytes`.
pub fn compute(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |acc, b| acc ^ b)
}

/// Recomputes the BCC over `bytes` and compares it with `claimed`.
pub fn verify(bytes: &[u8], claimed: u8) -> bool {
    compute(bytes) == claimed
}
