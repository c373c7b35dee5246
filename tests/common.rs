//! tests/common.rs
//! Shared fixtures: a hand-computable XOR transform, a one-byte-at-a-time
//! forwarding source, and pipeline helpers used across test files.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use cipherpipe::{
    BlockTransform, Buffer, CipherError, CipherSink, CipherSource, Padding, Sink, Source,
};

/// Standard XOR key used across test files; `b ^ XOR_KEY` is trivial to
/// compute by hand, so ciphertext bytes can be asserted exactly.
pub const XOR_KEY: u8 = 0x5A;

/// Standard block size used across test files.
pub const BLOCK: usize = 16;

/// Byte-wise XOR "cipher": self-inverse, deterministic, block size 16.
#[derive(Default)]
pub struct XorTransform;

impl BlockTransform for XorTransform {
    fn block_size(&self) -> usize {
        BLOCK
    }

    fn process_block(
        &mut self,
        input: &[u8],
        input_offset: usize,
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<(), CipherError> {
        for i in 0..BLOCK {
            output[output_offset + i] = input[input_offset + i] ^ XOR_KEY;
        }
        Ok(())
    }
}

/// Forwards reads to the wrapped source one byte at a time, regardless of
/// what the caller asked for. Exercises the block-alignment state machine
/// with the worst possible upstream chunking.
pub struct SingleByteSource<S: Source>(pub S);

impl<S: Source> Source for SingleByteSource<S> {
    fn read(
        &mut self,
        sink: &mut Buffer,
        _byte_count: usize,
    ) -> Result<Option<usize>, CipherError> {
        self.0.read(sink, 1)
    }

    fn close(&mut self) -> Result<(), CipherError> {
        self.0.close()
    }
}

/// Encrypts `data` through a [`CipherSink`], delivering it in `chunk`-sized
/// writes, and returns the produced bytes.
pub fn encrypt_chunked<T: BlockTransform>(
    transform: T,
    padding: Padding,
    data: &[u8],
    chunk: usize,
) -> Result<Vec<u8>, CipherError> {
    assert!(chunk > 0);
    let mut encrypted = Buffer::new();
    let mut sink = CipherSink::new(transform, &mut encrypted, padding)?;
    for piece in data.chunks(chunk) {
        let mut staging = Buffer::new();
        staging.write_slice(piece);
        sink.write(&mut staging, piece.len())?;
    }
    sink.close()?;
    drop(sink);
    Ok(encrypted.to_vec())
}

/// Single bulk-write encryption.
pub fn encrypt_all<T: BlockTransform>(
    transform: T,
    padding: Padding,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    encrypt_chunked(transform, padding, data, data.len().max(1))
}

/// Drains a [`CipherSource`] over `source`, reading `read_size` bytes at a
/// time, and returns everything produced.
pub fn drain_source<S: Source, T: BlockTransform>(
    transform: T,
    padding: Padding,
    source: S,
    read_size: usize,
) -> Result<Vec<u8>, CipherError> {
    assert!(read_size > 0);
    let mut cipher_source = CipherSource::new(transform, source, padding)?;
    let mut out = Buffer::new();
    while cipher_source.read(&mut out, read_size)?.is_some() {}
    Ok(out.to_vec())
}

/// Bulk decryption of an in-memory byte string.
pub fn decrypt_all<T: BlockTransform>(
    transform: T,
    padding: Padding,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    drain_source(transform, padding, buffer_of(data), 4096)
}

/// Buffer preloaded with `data`.
pub fn buffer_of(data: &[u8]) -> Buffer {
    let mut buffer = Buffer::new();
    buffer.write_slice(data);
    buffer
}
