//! src/cipher/cbc.rs
//! CBC chaining wrappers over any single-block transform.
//!
//! Chaining is hand-rolled with [`xor_blocks`], the same shape as a CBC
//! streaming loop: encrypt XORs the plaintext block with the previous
//! ciphertext block before the inner transform, decrypt XORs after it.
//! The IV seeds the chain and must match the inner block size.

use crate::aliases::{Aes256Key32, Iv16};
use crate::cipher::aes::{Aes256Decryptor, Aes256Encryptor, AES_BLOCK_SIZE};
use crate::error::CipherError;
use crate::transform::{require_window, BlockTransform};
use crate::utils::xor_blocks;
use secure_gate::RevealSecret;

fn check_iv(iv: &[u8], block_size: usize) -> Result<Vec<u8>, CipherError> {
    if iv.len() != block_size {
        return Err(CipherError::Transform(format!(
            "CBC initialization vector must be {block_size} bytes, got {}",
            iv.len()
        )));
    }
    Ok(iv.to_vec())
}

/// CBC encryption over an inner block transform.
pub struct CbcEncryptor<T: BlockTransform> {
    inner: T,
    /// Previous ciphertext block; starts as the IV.
    chain: Vec<u8>,
    staging: Vec<u8>,
}

impl<T: BlockTransform> CbcEncryptor<T> {
    pub fn new(inner: T, iv: &[u8]) -> Result<Self, CipherError> {
        let block_size = inner.block_size();
        Ok(CbcEncryptor {
            chain: check_iv(iv, block_size)?,
            staging: vec![0u8; block_size],
            inner,
        })
    }
}

impl CbcEncryptor<Aes256Encryptor> {
    /// AES-256-CBC encryptor. The typed IV fixes the length at the AES block
    /// size, so construction cannot fail, and the IV zeroizes on drop like
    /// the key.
    pub fn aes256(key: &Aes256Key32, iv: &Iv16) -> Self {
        CbcEncryptor {
            chain: iv.expose_secret().to_vec(),
            staging: vec![0u8; AES_BLOCK_SIZE],
            inner: Aes256Encryptor::new(key),
        }
    }
}

impl<T: BlockTransform> BlockTransform for CbcEncryptor<T> {
    fn block_size(&self) -> usize {
        self.inner.block_size()
    }

    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError> {
        let block_size = self.inner.block_size();
        require_window(input.len(), input_offset, block_size, "input")?;
        require_window(output.len(), output_offset, block_size, "output")?;

        xor_blocks(
            &input[input_offset..input_offset + block_size],
            &self.chain,
            &mut self.staging,
        );
        self.inner
            .process_block(&self.staging, 0, output, output_offset)?;
        self.chain
            .copy_from_slice(&output[output_offset..output_offset + block_size]);
        Ok(())
    }
}

/// CBC decryption over an inner block transform.
pub struct CbcDecryptor<T: BlockTransform> {
    inner: T,
    /// Previous ciphertext block; starts as the IV.
    chain: Vec<u8>,
    staging: Vec<u8>,
    saved: Vec<u8>,
}

impl<T: BlockTransform> CbcDecryptor<T> {
    pub fn new(inner: T, iv: &[u8]) -> Result<Self, CipherError> {
        let block_size = inner.block_size();
        Ok(CbcDecryptor {
            chain: check_iv(iv, block_size)?,
            staging: vec![0u8; block_size],
            saved: vec![0u8; block_size],
            inner,
        })
    }
}

impl CbcDecryptor<Aes256Decryptor> {
    /// AES-256-CBC decryptor with a typed, zeroizing IV.
    pub fn aes256(key: &Aes256Key32, iv: &Iv16) -> Self {
        CbcDecryptor {
            chain: iv.expose_secret().to_vec(),
            staging: vec![0u8; AES_BLOCK_SIZE],
            saved: vec![0u8; AES_BLOCK_SIZE],
            inner: Aes256Decryptor::new(key),
        }
    }
}

impl<T: BlockTransform> BlockTransform for CbcDecryptor<T> {
    fn block_size(&self) -> usize {
        self.inner.block_size()
    }

    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError> {
        let block_size = self.inner.block_size();
        require_window(input.len(), input_offset, block_size, "input")?;
        require_window(output.len(), output_offset, block_size, "output")?;

        // The ciphertext block becomes the next chain value; save it before
        // the inner transform in case input and output alias the same region.
        self.saved
            .copy_from_slice(&input[input_offset..input_offset + block_size]);
        self.inner
            .process_block(input, input_offset, &mut self.staging, 0)?;
        xor_blocks(
            &self.staging,
            &self.chain,
            &mut output[output_offset..output_offset + block_size],
        );
        std::mem::swap(&mut self.chain, &mut self.saved);
        Ok(())
    }
}
