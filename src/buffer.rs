//! src/buffer.rs
//! Segment-chain byte buffer.
//!
//! A [`Buffer`] owns a chain of pooled [`Segment`]s plus a running byte
//! count. All pipeline data lives in buffers; moving data between buffers
//! moves whole segments wherever possible and only copies when a request
//! stops mid-segment.

use crate::segment::{pool, Segment};
use std::collections::VecDeque;

/// A growable byte buffer backed by a chain of pooled segments.
///
/// Single-writer by design: a buffer is owned by exactly one pipeline stage
/// at a time and is never shared across threads.
#[derive(Default)]
pub struct Buffer {
    segments: VecDeque<Segment>,
    size: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Total readable bytes across the chain.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Appends `bytes`, filling the tail segment before taking new ones.
    pub fn write_slice(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let segment = self.writable_segment(1);
            let n = bytes.len().min(segment.spare());
            segment.writable()[..n].copy_from_slice(&bytes[..n]);
            self.commit(n);
            bytes = &bytes[n..];
        }
    }

    /// Drains up to `out.len()` bytes into `out`, returning the count moved.
    pub fn read_slice(&mut self, out: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < out.len() {
            let Some(head) = self.head() else { break };
            let n = head.len().min(out.len() - copied);
            out[copied..copied + n].copy_from_slice(&head.readable()[..n]);
            copied += n;
            self.advance_head(n);
        }
        copied
    }

    /// Returns a tail segment with at least `min_capacity` writable bytes,
    /// taking a fresh segment from the pool when the current tail is full.
    ///
    /// Pair with [`commit`](Buffer::commit) once bytes have been written
    /// into the segment's writable region.
    pub fn writable_segment(&mut self, min_capacity: usize) -> &mut Segment {
        debug_assert!(min_capacity <= Segment::SIZE);
        let needs_new = self
            .segments
            .back()
            .is_none_or(|s| s.spare() < min_capacity);
        if needs_new {
            self.segments.push_back(pool::take());
        }
        self.segments.back_mut().expect("tail segment just ensured")
    }

    /// Accounts for `byte_count` bytes written into the tail segment's
    /// writable region.
    pub fn commit(&mut self, byte_count: usize) {
        let tail = self.segments.back_mut().expect("commit without a tail segment");
        debug_assert!(byte_count <= tail.spare());
        tail.limit += byte_count;
        self.size += byte_count;
    }

    /// The first segment holding readable bytes, if any.
    #[inline]
    pub(crate) fn head(&self) -> Option<&Segment> {
        self.segments.front()
    }

    /// Consumes `byte_count` bytes from the head segment's window, recycling
    /// the segment the instant it is fully consumed.
    ///
    /// `byte_count` must not exceed the head window.
    pub fn advance_head(&mut self, byte_count: usize) {
        let head = self.segments.front_mut().expect("advance on empty buffer");
        debug_assert!(byte_count <= head.len());
        head.pos += byte_count;
        self.size -= byte_count;
        if head.is_empty() {
            let head = self.segments.pop_front().expect("head exists");
            pool::recycle(head);
        }
    }

    /// Moves `byte_count` bytes from the head of `other` to the tail of
    /// `self`. Whole segments are moved without copying; only a trailing
    /// partial request copies.
    pub fn transfer_from(&mut self, other: &mut Buffer, byte_count: usize) {
        debug_assert!(byte_count <= other.size);
        let mut remaining = byte_count;
        while remaining > 0 {
            let head_len = other.head().expect("sized above").len();
            if head_len <= remaining {
                let segment = other.segments.pop_front().expect("head exists");
                other.size -= head_len;
                remaining -= head_len;
                self.size += head_len;
                self.segments.push_back(segment);
            } else {
                // Trailing partial request: copy out of the head window.
                let n = remaining;
                let head = other.segments.front().expect("head exists");
                self.write_slice(&head.readable()[..n]);
                other.advance_head(n);
                remaining = 0;
            }
        }
    }

    /// Recycles an empty tail segment left behind by a
    /// [`writable_segment`](Buffer::writable_segment) reservation that was
    /// never committed.
    pub(crate) fn drop_empty_tail(&mut self) {
        if self.segments.back().is_some_and(Segment::is_empty) {
            let tail = self.segments.pop_back().expect("tail exists");
            pool::recycle(tail);
        }
    }

    /// Non-consuming snapshot of the readable bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size);
        for segment in &self.segments {
            out.extend_from_slice(segment.readable());
        }
        out
    }

    /// Discards all readable bytes, recycling every segment.
    pub fn clear(&mut self) {
        while let Some(mut segment) = self.segments.pop_front() {
            segment.pos = segment.limit;
            pool::recycle(segment);
        }
        self.size = 0;
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.size)
            .field("segments", &self.segments.len())
            .finish()
    }
}
