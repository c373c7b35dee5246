//! Unit-test helpers. A byte-wise XOR transform whose output is computable
//! by hand, with a configurable block size.

use crate::error::CipherError;
use crate::transform::{require_window, BlockTransform};

pub(crate) struct XorTransform {
    key: u8,
    block_size: usize,
}

impl XorTransform {
    pub(crate) fn new(key: u8, block_size: usize) -> Self {
        XorTransform { key, block_size }
    }
}

impl BlockTransform for XorTransform {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError> {
        require_window(input.len(), input_offset, self.block_size, "input")?;
        require_window(output.len(), output_offset, self.block_size, "output")?;
        for i in 0..self.block_size {
            output[output_offset + i] = input[input_offset + i] ^ self.key;
        }
        Ok(())
    }
}
