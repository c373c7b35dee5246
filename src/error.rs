//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All fallible operations return [`Result<T, CipherError>`](CipherError).

use thiserror::Error;

/// The error type for all cipherpipe operations.
///
/// Every variant is fatal to the operation that raised it; the adapters never
/// retry internally. Retrying, where it makes sense at all, is a stream-level
/// concern of the caller.
#[derive(Error, Debug)]
pub enum CipherError {
    /// The sink or source was used after `close`.
    ///
    /// The closed flag is monotonic: once an adapter is closed it stays
    /// closed, and every subsequent `write`/`read` fails with this variant.
    #[error("stream is closed")]
    Closed,

    /// A write requested more bytes than the source buffer holds.
    ///
    /// `write(source, byte_count)` consumes exactly `byte_count` bytes from
    /// the head of `source`; asking for more than is available is a caller
    /// bug, reported eagerly before any byte is consumed.
    #[error("requested {requested} bytes but source holds only {available}")]
    ShortSource { requested: usize, available: usize },

    /// The block transform rejected its configuration at construction.
    ///
    /// Block sizes must be in `1..=Segment::SIZE` so a whole block always
    /// fits a single writable segment.
    #[error("unsupported block size: {0}")]
    UnsupportedBlockSize(usize),

    /// A partial block was pending at finalization with padding disabled,
    /// or the raw stream ended mid-block on the source side.
    ///
    /// Padding-disabled transforms require block-aligned input; failing
    /// loudly beats silently dropping or zero-filling the remainder.
    #[error("incomplete final block: {0} bytes pending")]
    IncompleteBlock(usize),

    /// PKCS7 padding validation failed on the final decrypted block.
    ///
    /// Either the padding byte value was outside `[1, block_size]` or the
    /// trailing bytes were inconsistent. This is a data-integrity error and
    /// is never silently recovered.
    #[error("corrupt PKCS7 padding: {0}")]
    CorruptPadding(&'static str),

    /// The block transform failed during processing or finalization.
    #[error("transform error: {0}")]
    Transform(String),

    /// I/O error from a wrapped `std::io` endpoint.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&'static str> for CipherError {
    fn from(msg: &'static str) -> Self {
        CipherError::Transform(msg.to_string())
    }
}
