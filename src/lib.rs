// src/lib.rs

//! # cipherpipe
//!
//! Streaming block-cipher adapters over a pooled segment buffer.
//!
//! Two symmetric components do the work:
//!
//! - [`CipherSink`] wraps a downstream [`Sink`]: arbitrary-length writes are
//!   accumulated to the transform's block size, transformed, and emitted;
//!   `close` applies PKCS7 padding (when configured) before the final block.
//! - [`CipherSource`] wraps an upstream [`Source`]: raw bytes are pulled,
//!   transformed block by block, and served to the caller; when padding is
//!   stripped, a one-block lookahead keeps the final block back until the
//!   upstream end confirms it really is final.
//!
//! Both are generic over [`BlockTransform`], so ECB, CBC or anything else
//! with a fixed block size plugs in without touching the alignment logic.
//! Data moves through pooled [`Segment`]s: a full block inside one segment
//! is transformed directly from that segment's memory, with no intermediate
//! copy.
//!
//! ```
//! use cipherpipe::{
//!     aliases::{Aes256Key32, Iv16}, Buffer, CbcEncryptor, CipherSink, Padding, Sink,
//! };
//!
//! # fn main() -> Result<(), cipherpipe::CipherError> {
//! let key = Aes256Key32::new([7u8; 32]);
//! let iv = Iv16::new([3u8; 16]);
//!
//! // Encrypt 100 bytes through a sink into a buffer: 112 bytes out
//! // (7 whole blocks of ciphertext after PKCS7 padding).
//! let mut encrypted = Buffer::new();
//! let encryptor = CbcEncryptor::aes256(&key, &iv);
//! let mut sink = CipherSink::new(encryptor, &mut encrypted, Padding::Pkcs7)?;
//! let mut plain = Buffer::new();
//! plain.write_slice(&[0x42u8; 100]);
//! sink.write(&mut plain, 100)?;
//! sink.close()?;
//! drop(sink);
//! assert_eq!(encrypted.size(), 112);
//! # Ok(())
//! # }
//! ```

pub mod aliases;
pub mod buffer;
pub mod cipher;
pub mod error;
pub mod io;
pub mod padding;
pub mod segment;
pub mod sink;
pub mod source;
pub mod transform;
pub mod utils;

#[cfg(test)]
pub(crate) mod tests_support;

// High-level API — this is what most users import
pub use buffer::Buffer;
pub use cipher::{Aes256Decryptor, Aes256Encryptor, CbcDecryptor, CbcEncryptor, AES_BLOCK_SIZE};
pub use error::CipherError;
pub use io::{BufferedSink, BufferedSource, ReadSource, Sink, Source, Timeout, WriteSink};
pub use padding::Padding;
pub use segment::Segment;
pub use sink::CipherSink;
pub use source::CipherSource;
pub use transform::BlockTransform;
