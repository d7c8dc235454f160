//! Little-endian integer and length-prefixed string encoding on byte buffers.
//!
//! Every multi-byte value on the wire is unsigned little-endian. Strings are
//! a one-byte length prefix followed by raw (non-NUL-terminated) bytes.

/// Appends a little-endian `u16` to `out`.
pub fn write_u16_le(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Appends a little-endian `u32` to `out`.
pub fn write_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Appends a one-byte-length-prefixed string. `bytes.len()` must fit in a `u8`;
/// callers are expected to have validated this (request/response bodies in
/// this protocol never carry strings anywhere near 255 bytes).
pub fn write_lp_string(out: &mut Vec<u8>, bytes: &[u8]) {
    debug_assert!(bytes.len() <= u8::MAX as usize);
    out.push(bytes.len() as u8);
    out.extend_from_slice(bytes);
}

/// Reads a little-endian `u16` from the start of `input`.
///
/// Panics if `input` has fewer than 2 bytes; callers must have already
/// length-checked the body against the command's minimum size.
pub fn read_u16_le(input: &[u8]) -> u16 {
    u16::from_le_bytes([input[0], input[1]])
}

/// Reads a little-endian `u32` from the start of `input`.
pub fn read_u32_le(input: &[u8]) -> u32 {
    u32::from_le_bytes([input[0], input[1], input[2], input[3]])
}
