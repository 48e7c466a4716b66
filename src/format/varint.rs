//! Unsigned variable-length integers
//!
//! Little-endian base-128: seven value bits per byte, high bit set on every
//! byte except the last. Small block numbers take a single byte.

use bytes::BufMut;

/// Longest valid encoding of a `u64`
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` to `buf`
pub fn put_uvarint<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes `put_uvarint` writes for `value`
pub fn uvarint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Read a varint from the front of `buf`, returning `(value, bytes_consumed)`
///
/// Returns `None` if the input ends mid-value or the value does not fit in
/// 64 bits.
pub fn read_uvarint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate().take(MAX_VARINT_LEN) {
        let bits = u64::from(byte & 0x7f);
        let shift = 7 * i as u32;
        // The tenth byte may only carry the top bit of a u64.
        if i == MAX_VARINT_LEN - 1 && bits > 1 {
            return None;
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
