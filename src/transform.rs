//! src/transform.rs
//! The block transform capability consumed by the cipher adapters.

use crate::error::CipherError;
use crate::segment::Segment;

/// One block's worth of cipher processing.
///
/// Implementations read exactly [`block_size`](BlockTransform::block_size)
/// bytes starting at `input_offset` and write exactly that many starting at
/// `output_offset`. Chaining state (CBC and friends) belongs to the
/// transform; the adapters never inspect or reset it, which is why
/// `process_block` takes `&mut self`.
///
/// The adapters are generic over this trait so ECB, CBC or future modes can
/// be substituted without touching the alignment machinery.
pub trait BlockTransform {
    /// Block size in bytes; positive and fixed for this instance's lifetime.
    fn block_size(&self) -> usize;

    /// Transforms one block from `input` at `input_offset` into `output` at
    /// `output_offset`.
    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError>;
}

/// Validates a transform's block size at adapter construction.
///
/// A block must fit a single segment so the transform can always write into
/// one writable region.
pub(crate) fn check_block_size(block_size: usize) -> Result<usize, CipherError> {
    if block_size == 0 || block_size > Segment::SIZE {
        return Err(CipherError::UnsupportedBlockSize(block_size));
    }
    Ok(block_size)
}

/// Bounds check shared by the bundled transforms.
pub(crate) fn require_window(
    len: usize,
    offset: usize,
    block_size: usize,
    role: &str,
) -> Result<(), CipherError> {
    if offset.checked_add(block_size).is_none_or(|end| end > len) {
        return Err(CipherError::Transform(format!(
            "{role} buffer too short: need {block_size} bytes at offset {offset}, have {len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_bounds() {
        assert!(matches!(
            check_block_size(0),
            Err(CipherError::UnsupportedBlockSize(0))
        ));
        assert!(check_block_size(16).is_ok());
        assert!(check_block_size(Segment::SIZE).is_ok());
        assert!(check_block_size(Segment::SIZE + 1).is_err());
    }

    #[test]
    fn window_bounds() {
        assert!(require_window(32, 16, 16, "input").is_ok());
        assert!(require_window(32, 17, 16, "input").is_err());
        assert!(require_window(0, usize::MAX, 16, "input").is_err());
    }
}
