//! Utility functions used across the library.

/// XORs `block_a` and `block_b` into `output`, over `output.len()` bytes.
///
/// Constant-time and bounds-check-free by contract: callers pass equal-length
/// block slices sized to the transform's block size.
///
/// # Panics (by contract)
///
/// Panics if `block_a` or `block_b` is shorter than `output`. Never hit in
/// correct usage because the CBC wrappers validate lengths at construction.
#[inline(always)]
pub const fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < output.len() {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}
