//! src/padding.rs
//! PKCS7 padding: the mode switch, the fill helper, and validated stripping.

use crate::error::CipherError;
use secure_gate::ConstantTimeEq;

/// Final-block policy for the cipher adapters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Padding {
    /// PKCS7: the sink always emits one final padded block on close (a full
    /// block of value `block_size` when the stream length is block-aligned,
    /// including the empty stream); the source validates and strips the
    /// padding from the true final block.
    #[default]
    Pkcs7,
    /// No padding: input must be block-aligned; nothing extra is ever
    /// emitted, and an unaligned tail fails loudly.
    None,
}

/// Fills `block[data_len..]` with the PKCS7 padding value
/// `block.len() - data_len`.
///
/// With `data_len == 0` this produces a full block of pure padding, the
/// PKCS7 encoding of "no data in this block".
pub(crate) fn apply_pkcs7(block: &mut [u8], data_len: usize) {
    debug_assert!(data_len < block.len());
    let code = (block.len() - data_len) as u8;
    block[data_len..].fill(code);
}

/// Validates the PKCS7 padding of a decrypted final block and returns the
/// number of data bytes that precede it.
///
/// The padding value must be in `[1, block_size]` and that many trailing
/// bytes must all equal it; the trailing comparison is constant-time.
pub(crate) fn strip_pkcs7(block: &[u8]) -> Result<usize, CipherError> {
    let block_size = block.len();
    let code = block[block_size - 1] as usize;

    // Value range is non-secret, early return is fine.
    if code == 0 || code > block_size {
        return Err(CipherError::CorruptPadding("padding value out of range"));
    }

    let data_len = block_size - code;
    let expected = vec![code as u8; code];
    if !block[data_len..].ct_eq(&expected[..]) {
        return Err(CipherError::CorruptPadding("inconsistent trailing bytes"));
    }

    Ok(data_len)
}
