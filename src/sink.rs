//! src/sink.rs
//! CipherSink — push-side block-cipher adapter.
//!
//! Accepts arbitrary-length writes, accumulates to the transform's block
//! size, and emits transformed blocks downstream. A full block that sits
//! entirely inside one source segment is transformed straight from that
//! segment's memory into a writable region of the downstream buffer; only
//! blocks straddling a segment boundary pay a copy through the pending
//! block buffer.

use crate::buffer::Buffer;
use crate::error::CipherError;
use crate::io::{BufferedSink, Sink, Timeout};
use crate::padding::{self, Padding};
use crate::transform::{check_block_size, BlockTransform};

/// A [`Sink`] that processes every byte through a [`BlockTransform`] while
/// writing to a wrapped sink.
///
/// Single-use: after [`close`](Sink::close) all writes fail. Close is
/// idempotent and always attempts to close the wrapped sink, even when
/// finalization fails; the first error wins.
pub struct CipherSink<S: Sink, T: BlockTransform> {
    sink: BufferedSink<S>,
    transform: T,
    padding: Padding,
    block_size: usize,
    /// Bytes accumulated toward the next block; fill count below.
    pending: Box<[u8]>,
    pending_len: usize,
    closed: bool,
    #[cfg(test)]
    pub(crate) direct_blocks: usize,
    #[cfg(test)]
    pub(crate) staged_blocks: usize,
}

impl<S: Sink, T: BlockTransform> CipherSink<S, T> {
    /// Wraps `sink`, transforming everything written through `transform`.
    pub fn new(transform: T, sink: S, padding: Padding) -> Result<Self, CipherError> {
        let block_size = check_block_size(transform.block_size())?;
        Ok(CipherSink {
            sink: BufferedSink::new(sink),
            transform,
            padding,
            block_size,
            pending: vec![0u8; block_size].into_boxed_slice(),
            pending_len: 0,
            closed: false,
            #[cfg(test)]
            direct_blocks: 0,
            #[cfg(test)]
            staged_blocks: 0,
        })
    }

    /// Consumes one run of bytes from the head segment, returning how many
    /// were consumed. At most one block is transformed per call.
    fn update(&mut self, source: &mut Buffer, remaining: usize) -> Result<usize, CipherError> {
        let head_len = source
            .head()
            .expect("write checked the source size")
            .len()
            .min(remaining);

        if self.pending_len > 0 {
            let needed = self.block_size - self.pending_len;
            if head_len < needed {
                // Can't complete the block; stage what the head offers.
                let head = source.head().expect("nonempty");
                self.pending[self.pending_len..self.pending_len + head_len]
                    .copy_from_slice(&head.readable()[..head_len]);
                self.pending_len += head_len;
                source.advance_head(head_len);
                return Ok(head_len);
            }

            // Complete the staged block and transform it.
            let head = source.head().expect("nonempty");
            self.pending[self.pending_len..].copy_from_slice(&head.readable()[..needed]);
            self.pending_len = 0;
            self.process_pending()?;
            source.advance_head(needed);
            #[cfg(test)]
            {
                self.staged_blocks += 1;
            }
            return Ok(needed);
        }

        if head_len < self.block_size {
            // Empty pending buffer, not enough for a block: stage.
            let head = source.head().expect("nonempty");
            self.pending[..head_len].copy_from_slice(&head.readable()[..head_len]);
            self.pending_len = head_len;
            source.advance_head(head_len);
            return Ok(head_len);
        }

        // Full block inside the head segment: transform directly from the
        // segment's memory into the downstream writable region.
        {
            let out = self.sink.buffer.writable_segment(self.block_size);
            let out_offset = out.limit;
            let head = source.head().expect("nonempty");
            self.transform
                .process_block(&head.data, head.pos, &mut out.data, out_offset)?;
        }
        self.sink.buffer.commit(self.block_size);
        source.advance_head(self.block_size);
        #[cfg(test)]
        {
            self.direct_blocks += 1;
        }
        Ok(self.block_size)
    }

    /// Transforms the (full) pending block into the downstream buffer.
    fn process_pending(&mut self) -> Result<(), CipherError> {
        let out = self.sink.buffer.writable_segment(self.block_size);
        let out_offset = out.limit;
        self.transform
            .process_block(&self.pending, 0, &mut out.data, out_offset)?;
        self.sink.buffer.commit(self.block_size);
        Ok(())
    }

    fn do_final(&mut self) -> Result<(), CipherError> {
        match self.padding {
            Padding::Pkcs7 => {
                // Always one final block: partial data padded up, or a full
                // block of pure padding when the stream was block-aligned.
                padding::apply_pkcs7(&mut self.pending, self.pending_len);
                self.pending_len = 0;
                self.process_pending()
            }
            Padding::None => {
                if self.pending_len > 0 {
                    return Err(CipherError::IncompleteBlock(self.pending_len));
                }
                Ok(())
            }
        }
    }
}

impl<S: Sink, T: BlockTransform> Sink for CipherSink<S, T> {
    fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<(), CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        if byte_count > source.size() {
            return Err(CipherError::ShortSource {
                requested: byte_count,
                available: source.size(),
            });
        }

        let mut remaining = byte_count;
        while remaining > 0 {
            remaining -= self.update(source, remaining)?;
        }
        self.sink.emit()
    }

    fn flush(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        self.sink.flush()
    }

    fn close(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut thrown = self.do_final().err();
        if let Err(e) = self.sink.close() {
            thrown.get_or_insert(e);
        }
        match thrown {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn timeout(&self) -> Timeout {
        self.sink.timeout()
    }
}
