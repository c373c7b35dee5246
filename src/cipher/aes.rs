//! src/cipher/aes.rs
//! AES-256 single-block transforms — one block in, one block out, no mode.
//!
//! Key material stays wrapped in [`Aes256Key32`] until the moment the
//! schedule is built; the expanded schedule lives inside the `aes` cipher
//! object and is never exposed.

use crate::aliases::Aes256Key32;
use crate::error::CipherError;
use crate::transform::{require_window, BlockTransform};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};
use secure_gate::RevealSecret;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Encrypting AES-256 block transform.
pub struct Aes256Encryptor {
    cipher: Aes256Enc,
}

impl Aes256Encryptor {
    pub fn new(key: &Aes256Key32) -> Self {
        Aes256Encryptor {
            cipher: Aes256Enc::new(key.expose_secret().into()),
        }
    }
}

impl BlockTransform for Aes256Encryptor {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError> {
        require_window(input.len(), input_offset, AES_BLOCK_SIZE, "input")?;
        require_window(output.len(), output_offset, AES_BLOCK_SIZE, "output")?;

        let mut bytes = [0u8; AES_BLOCK_SIZE];
        bytes.copy_from_slice(&input[input_offset..input_offset + AES_BLOCK_SIZE]);
        let mut block = AesBlock::from(bytes);
        self.cipher.encrypt_block(&mut block);
        output[output_offset..output_offset + AES_BLOCK_SIZE].copy_from_slice(block.as_slice());
        Ok(())
    }
}

/// Decrypting AES-256 block transform.
pub struct Aes256Decryptor {
    cipher: Aes256Dec,
}

impl Aes256Decryptor {
    pub fn new(key: &Aes256Key32) -> Self {
        Aes256Decryptor {
            cipher: Aes256Dec::new(key.expose_secret().into()),
        }
    }
}

impl BlockTransform for Aes256Decryptor {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError> {
        require_window(input.len(), input_offset, AES_BLOCK_SIZE, "input")?;
        require_window(output.len(), output_offset, AES_BLOCK_SIZE, "output")?;

        let mut bytes = [0u8; AES_BLOCK_SIZE];
        bytes.copy_from_slice(&input[input_offset..input_offset + AES_BLOCK_SIZE]);
        let mut block = AesBlock::from(bytes);
        self.cipher.decrypt_block(&mut block);
        output[output_offset..output_offset + AES_BLOCK_SIZE].copy_from_slice(block.as_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 appendix C.3: AES-256, key 00..1f, plaintext 00112233...ff.
    const FIPS_KEY: [u8; 32] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
        0x1e, 0x1f,
    ];
    const FIPS_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    const FIPS_CIPHER: [u8; 16] = [
        0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49, 0x60,
        0x89,
    ];

    #[test]
    fn fips_197_known_answer() {
        let key = Aes256Key32::new(FIPS_KEY);
        let mut enc = Aes256Encryptor::new(&key);
        let mut out = [0u8; 16];
        enc.process_block(&FIPS_PLAIN, 0, &mut out, 0).unwrap();
        assert_eq!(out, FIPS_CIPHER);

        let mut dec = Aes256Decryptor::new(&key);
        let mut back = [0u8; 16];
        dec.process_block(&out, 0, &mut back, 0).unwrap();
        assert_eq!(back, FIPS_PLAIN);
    }

    #[test]
    fn offsets_are_respected() {
        let key = Aes256Key32::new(FIPS_KEY);
        let mut enc = Aes256Encryptor::new(&key);

        let mut input = [0u8; 48];
        input[16..32].copy_from_slice(&FIPS_PLAIN);
        let mut output = [0u8; 48];
        enc.process_block(&input, 16, &mut output, 32).unwrap();
        assert_eq!(&output[32..48], &FIPS_CIPHER);
        assert_eq!(&output[..32], &[0u8; 32]);
    }

    #[test]
    fn short_buffers_are_rejected() {
        let key = Aes256Key32::new(FIPS_KEY);
        let mut enc = Aes256Encryptor::new(&key);
        let input = [0u8; 15];
        let mut output = [0u8; 16];
        assert!(matches!(
            enc.process_block(&input, 0, &mut output, 0),
            Err(CipherError::Transform(_))
        ));
    }
}
