//! src/segment.rs
//! Fixed-capacity buffer segments and the thread-local segment pool.
//!
//! A [`Segment`] is one node of a [`Buffer`](crate::Buffer)'s chain: an owned
//! byte region with a readable window `[pos, limit)`. Segments move between
//! buffers and the pool; they are never shared or aliased. Recycling is a
//! move: once a segment is handed back to the pool the previous owner must
//! not touch it again.

/// One fixed-capacity chunk of a pooled byte buffer.
pub struct Segment {
    /// Backing storage, always `Segment::SIZE` bytes.
    pub(crate) data: Box<[u8]>,
    /// First readable byte.
    pub(crate) pos: usize,
    /// One past the last readable byte; `[limit, SIZE)` is writable.
    pub(crate) limit: usize,
}

impl Segment {
    /// Capacity of every segment, in bytes.
    pub const SIZE: usize = 8192;

    pub(crate) fn new() -> Self {
        Segment {
            data: vec![0u8; Self::SIZE].into_boxed_slice(),
            pos: 0,
            limit: 0,
        }
    }

    /// Number of readable bytes in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.limit - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.limit
    }

    /// Remaining writable capacity after the window.
    #[inline]
    pub fn spare(&self) -> usize {
        Self::SIZE - self.limit
    }

    /// The readable window as a slice.
    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.pos..self.limit]
    }

    /// The writable region after the window as a slice.
    #[inline]
    pub(crate) fn writable(&mut self) -> &mut [u8] {
        let limit = self.limit;
        &mut self.data[limit..]
    }

    fn reset(&mut self) {
        self.pos = 0;
        self.limit = 0;
    }
}

/// Thread-local free list of segments.
///
/// Capped so a burst of large buffers does not pin memory forever. `take`
/// and `recycle` are free functions like the rest of the crate treats the
/// pool: a capability, not an object.
pub mod pool {
    use super::Segment;
    use std::cell::RefCell;

    /// Upper bound on pooled bytes per thread.
    pub const MAX_SIZE: usize = 64 * 1024;

    thread_local! {
        static FREE_LIST: RefCell<Vec<Segment>> = const { RefCell::new(Vec::new()) };
    }

    /// Takes a segment from the pool, allocating a fresh one if empty.
    pub fn take() -> Segment {
        FREE_LIST.with(|free| free.borrow_mut().pop().unwrap_or_else(Segment::new))
    }

    /// Returns a fully-consumed segment for reuse.
    ///
    /// Must only be called once the segment's readable window is exhausted;
    /// the caller gives up ownership and must never touch the segment again.
    pub fn recycle(mut segment: Segment) {
        debug_assert!(segment.is_empty(), "recycled a segment with unread data");
        segment.reset();
        FREE_LIST.with(|free| {
            let mut free = free.borrow_mut();
            if (free.len() + 1) * Segment::SIZE <= MAX_SIZE {
                free.push(segment);
            }
            // Over the cap: drop the segment and let the allocator have it.
        });
    }

    /// Pooled segment count, for pool-hygiene tests.
    #[cfg(test)]
    pub(crate) fn pooled() -> usize {
        FREE_LIST.with(|free| free.borrow().len())
    }
}
