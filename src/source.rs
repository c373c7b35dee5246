//! src/source.rs
//! CipherSource — pull-side block-cipher adapter.
//!
//! Pulls raw bytes from a wrapped source, transforms complete blocks, and
//! serves the result to the caller. In the padding-stripping configuration
//! the most recently transformed block is held back as a one-slot lookahead:
//! it is only released once the next block proves it was not final, or
//! unpadded once the upstream end confirms it was.

use crate::buffer::Buffer;
use crate::error::CipherError;
use crate::io::{BufferedSource, Source, Timeout};
use crate::padding::{self, Padding};
use crate::transform::{check_block_size, BlockTransform};

/// A [`Source`] that processes every byte through a [`BlockTransform`] while
/// reading from a wrapped source.
///
/// Tolerates any upstream chunking, one-byte delivery included. Single-use:
/// exhaustion is permanent and reads after [`close`](Source::close) fail.
pub struct CipherSource<S: Source, T: BlockTransform> {
    source: BufferedSource<S>,
    transform: T,
    padding: Padding,
    block_size: usize,
    /// Staging copy for raw blocks that straddle a segment boundary.
    staging: Box<[u8]>,
    /// One-slot lookahead: the transformed block not yet proven non-final.
    /// Only meaningful while `holding`; Pkcs7 mode only.
    held: Box<[u8]>,
    holding: bool,
    /// Transform destination that trades places with `held` each block, so
    /// steady-state decryption never allocates.
    spare: Box<[u8]>,
    /// Transformed bytes ready for the caller.
    ready: Buffer,
    exhausted: bool,
    closed: bool,
    #[cfg(test)]
    pub(crate) direct_blocks: usize,
    #[cfg(test)]
    pub(crate) staged_blocks: usize,
}

impl<S: Source, T: BlockTransform> CipherSource<S, T> {
    /// Wraps `source`, transforming everything read through `transform`.
    ///
    /// `Padding::Pkcs7` means *strip on finalization* (the decrypt path);
    /// encrypting through a source works with `Padding::None` and
    /// block-aligned input.
    pub fn new(transform: T, source: S, padding: Padding) -> Result<Self, CipherError> {
        let block_size = check_block_size(transform.block_size())?;
        Ok(CipherSource {
            source: BufferedSource::new(source),
            transform,
            padding,
            block_size,
            staging: vec![0u8; block_size].into_boxed_slice(),
            held: vec![0u8; block_size].into_boxed_slice(),
            holding: false,
            spare: vec![0u8; block_size].into_boxed_slice(),
            ready: Buffer::new(),
            exhausted: false,
            closed: false,
            #[cfg(test)]
            direct_blocks: 0,
            #[cfg(test)]
            staged_blocks: 0,
        })
    }

    /// Advances the pipeline one step: transforms the next raw block, or
    /// finalizes once the upstream ends.
    fn refill(&mut self) -> Result<(), CipherError> {
        if self.source.request(self.block_size)? {
            self.process_raw_block()
        } else {
            self.finish()
        }
    }

    fn process_raw_block(&mut self) -> Result<(), CipherError> {
        let block_size = self.block_size;
        let direct = self
            .source
            .buffer
            .head()
            .is_some_and(|head| head.len() >= block_size);

        match self.padding {
            Padding::None => {
                // No lookahead needed: release straight into the ready
                // buffer's writable region.
                if direct {
                    {
                        let out = self.ready.writable_segment(block_size);
                        let out_offset = out.limit;
                        let head = self.source.buffer.head().expect("request satisfied");
                        self.transform
                            .process_block(&head.data, head.pos, &mut out.data, out_offset)?;
                    }
                    self.ready.commit(block_size);
                    self.source.buffer.advance_head(block_size);
                    #[cfg(test)]
                    {
                        self.direct_blocks += 1;
                    }
                } else {
                    let n = self.source.buffer.read_slice(&mut self.staging);
                    debug_assert_eq!(n, block_size);
                    {
                        let out = self.ready.writable_segment(block_size);
                        let out_offset = out.limit;
                        self.transform
                            .process_block(&self.staging, 0, &mut out.data, out_offset)?;
                    }
                    self.ready.commit(block_size);
                    #[cfg(test)]
                    {
                        self.staged_blocks += 1;
                    }
                }
            }
            Padding::Pkcs7 => {
                // Transform into the spare block, then trade it with the
                // lookahead slot; the previous occupant is now proven
                // non-final and can be released.
                if direct {
                    {
                        let head = self.source.buffer.head().expect("request satisfied");
                        self.transform
                            .process_block(&head.data, head.pos, &mut self.spare, 0)?;
                    }
                    self.source.buffer.advance_head(block_size);
                    #[cfg(test)]
                    {
                        self.direct_blocks += 1;
                    }
                } else {
                    let n = self.source.buffer.read_slice(&mut self.staging);
                    debug_assert_eq!(n, block_size);
                    self.transform
                        .process_block(&self.staging, 0, &mut self.spare, 0)?;
                    #[cfg(test)]
                    {
                        self.staged_blocks += 1;
                    }
                }
                if self.holding {
                    self.ready.write_slice(&self.held);
                }
                std::mem::swap(&mut self.held, &mut self.spare);
                self.holding = true;
            }
        }
        Ok(())
    }

    /// Upstream ended: validate alignment and release the held block.
    fn finish(&mut self) -> Result<(), CipherError> {
        self.exhausted = true;

        let leftover = self.source.buffer.size();
        if leftover > 0 {
            return Err(CipherError::IncompleteBlock(leftover));
        }

        if self.padding == Padding::Pkcs7 && self.holding {
            self.holding = false;
            let data_len = padding::strip_pkcs7(&self.held)?;
            self.ready.write_slice(&self.held[..data_len]);
        }
        // No held block means the upstream was empty: a correctly-empty
        // result, not an error.
        Ok(())
    }
}

impl<S: Source, T: BlockTransform> Source for CipherSource<S, T> {
    fn read(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>, CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        if byte_count == 0 {
            return Ok(Some(0));
        }

        while self.ready.is_empty() && !self.exhausted {
            self.refill()?;
        }
        if self.ready.is_empty() {
            return Ok(None);
        }

        let n = byte_count.min(self.ready.size());
        sink.transfer_from(&mut self.ready, n);
        Ok(Some(n))
    }

    fn close(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.ready.clear();
        self.source.close()
    }

    fn timeout(&self) -> Timeout {
        self.source.timeout()
    }
}
