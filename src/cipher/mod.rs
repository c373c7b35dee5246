// src/cipher/mod.rs

//! Bundled block transforms.
//!
//! Core pieces: raw AES-256 single-block transforms over the `aes` crate,
//! and CBC chaining wrappers that work over any [`BlockTransform`].
//!
//! [`BlockTransform`]: crate::BlockTransform

pub(crate) mod aes;
pub(crate) mod cbc;

pub use aes::{Aes256Decryptor, Aes256Encryptor, AES_BLOCK_SIZE};
pub use cbc::{CbcDecryptor, CbcEncryptor};
