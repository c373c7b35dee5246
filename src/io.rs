//! src/io.rs
//! Sink/Source capability traits, the forwarded [`Timeout`] value, minimal
//! buffering wrappers, and bridges to `std::io` endpoints.
//!
//! The cipher adapters only ever rely on this surface: a push side that
//! accepts `write(buffer, byte_count)` and a pull side that fills a buffer
//! or signals end of stream with `Ok(None)`.

use crate::buffer::Buffer;
use crate::error::CipherError;
use crate::segment::Segment;
use std::io::{Read, Write};
use std::time::Duration;

/// A timeout forwarded along a pipeline.
///
/// Adapters never interpret this value; they hand back whatever the wrapped
/// resource reports. Blocking behavior belongs to the endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    duration: Option<Duration>,
}

impl Timeout {
    /// No timeout: the endpoint blocks indefinitely.
    pub const NONE: Timeout = Timeout { duration: None };

    pub fn of(duration: Duration) -> Timeout {
        Timeout {
            duration: Some(duration),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// A destination for byte streams.
pub trait Sink {
    /// Consumes exactly `byte_count` bytes from the head of `source`.
    fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<(), CipherError>;

    /// Pushes buffered bytes to their final destination.
    fn flush(&mut self) -> Result<(), CipherError>;

    /// Releases held resources. Implementations must be idempotent.
    fn close(&mut self) -> Result<(), CipherError>;

    fn timeout(&self) -> Timeout {
        Timeout::NONE
    }
}

/// A supplier of byte streams.
pub trait Source {
    /// Moves up to `byte_count` bytes to the tail of `sink`, returning the
    /// count moved, or `Ok(None)` once the stream is exhausted.
    fn read(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>, CipherError>;

    /// Releases held resources. Implementations must be idempotent.
    fn close(&mut self) -> Result<(), CipherError>;

    fn timeout(&self) -> Timeout {
        Timeout::NONE
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<(), CipherError> {
        (**self).write(source, byte_count)
    }

    fn flush(&mut self) -> Result<(), CipherError> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<(), CipherError> {
        (**self).close()
    }

    fn timeout(&self) -> Timeout {
        (**self).timeout()
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn read(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>, CipherError> {
        (**self).read(sink, byte_count)
    }

    fn close(&mut self) -> Result<(), CipherError> {
        (**self).close()
    }

    fn timeout(&self) -> Timeout {
        (**self).timeout()
    }
}

// A Buffer terminates either end of a pipeline: writes move segments in,
// reads move segments out, and close is a no-op.

impl Sink for Buffer {
    fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<(), CipherError> {
        if byte_count > source.size() {
            return Err(CipherError::ShortSource {
                requested: byte_count,
                available: source.size(),
            });
        }
        self.transfer_from(source, byte_count);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CipherError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), CipherError> {
        Ok(())
    }
}

impl Source for Buffer {
    fn read(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>, CipherError> {
        if self.is_empty() {
            return Ok(None);
        }
        let n = byte_count.min(self.size());
        sink.transfer_from(self, n);
        Ok(Some(n))
    }

    fn close(&mut self) -> Result<(), CipherError> {
        Ok(())
    }
}

/// A sink with an internal staging buffer.
///
/// The cipher sink writes transformed blocks straight into this buffer
/// (via `writable_segment`/`commit`) and asks it to emit afterwards, so
/// every block lands in downstream segment memory without a detour.
pub struct BufferedSink<S: Sink> {
    pub(crate) buffer: Buffer,
    sink: S,
    closed: bool,
}

impl<S: Sink> BufferedSink<S> {
    pub fn new(sink: S) -> Self {
        BufferedSink {
            buffer: Buffer::new(),
            sink,
            closed: false,
        }
    }

    /// Appends `bytes` and emits.
    pub fn write_slice(&mut self, bytes: &[u8]) -> Result<(), CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        self.buffer.write_slice(bytes);
        self.emit()
    }

    /// Writes everything currently buffered to the wrapped sink.
    pub fn emit(&mut self) -> Result<(), CipherError> {
        let n = self.buffer.size();
        if n > 0 {
            self.sink.write(&mut self.buffer, n)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        self.emit()?;
        self.sink.flush()
    }

    /// Emits buffered bytes, then closes the wrapped sink. The wrapped close
    /// is attempted even when the emit fails; the first error wins.
    pub fn close(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut thrown = self.emit().err();
        if let Err(e) = self.sink.close() {
            thrown.get_or_insert(e);
        }
        match thrown {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn timeout(&self) -> Timeout {
        self.sink.timeout()
    }
}

impl<S: Sink> Sink for BufferedSink<S> {
    fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<(), CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        Sink::write(&mut self.buffer, source, byte_count)?;
        self.emit()
    }

    fn flush(&mut self) -> Result<(), CipherError> {
        BufferedSink::flush(self)
    }

    fn close(&mut self) -> Result<(), CipherError> {
        BufferedSink::close(self)
    }

    fn timeout(&self) -> Timeout {
        BufferedSink::timeout(self)
    }
}

/// A source with an internal read-ahead buffer.
///
/// `request` absorbs arbitrary upstream chunking: the cipher source asks for
/// one block's worth of raw bytes and never cares whether the upstream
/// delivered them one byte at a time.
pub struct BufferedSource<S: Source> {
    pub(crate) buffer: Buffer,
    source: S,
    closed: bool,
    at_end: bool,
}

impl<S: Source> BufferedSource<S> {
    pub fn new(source: S) -> Self {
        BufferedSource {
            buffer: Buffer::new(),
            source,
            closed: false,
            at_end: false,
        }
    }

    /// Pulls from upstream until the buffer holds at least `byte_count`
    /// bytes, or the upstream ends. Returns whether the request was met.
    pub fn request(&mut self, byte_count: usize) -> Result<bool, CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        while self.buffer.size() < byte_count {
            if self.at_end {
                return Ok(false);
            }
            match self.source.read(&mut self.buffer, Segment::SIZE)? {
                Some(_) => {}
                None => self.at_end = true,
            }
        }
        Ok(true)
    }

    /// True once the upstream has ended and the buffer is drained.
    pub fn exhausted(&mut self) -> Result<bool, CipherError> {
        Ok(!self.request(1)?)
    }

    pub fn close(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.buffer.clear();
        self.source.close()
    }

    pub fn timeout(&self) -> Timeout {
        self.source.timeout()
    }
}

impl<S: Source> Source for BufferedSource<S> {
    fn read(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>, CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        if byte_count == 0 {
            return Ok(Some(0));
        }
        if !self.request(1)? {
            return Ok(None);
        }
        let n = byte_count.min(self.buffer.size());
        sink.transfer_from(&mut self.buffer, n);
        Ok(Some(n))
    }

    fn close(&mut self) -> Result<(), CipherError> {
        BufferedSource::close(self)
    }

    fn timeout(&self) -> Timeout {
        BufferedSource::timeout(self)
    }
}

/// Adapts a [`std::io::Read`] endpoint to the [`Source`] trait.
pub struct ReadSource<R: Read> {
    reader: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        ReadSource { reader }
    }
}

impl<R: Read> Source for ReadSource<R> {
    fn read(&mut self, sink: &mut Buffer, byte_count: usize) -> Result<Option<usize>, CipherError> {
        if byte_count == 0 {
            return Ok(Some(0));
        }
        let segment = sink.writable_segment(1);
        let want = byte_count.min(segment.spare());
        let n = self.reader.read(&mut segment.writable()[..want])?;
        if n == 0 {
            // EOF: hand an uncommitted reservation back to the pool instead
            // of leaving an empty segment in the chain.
            sink.drop_empty_tail();
            return Ok(None);
        }
        sink.commit(n);
        Ok(Some(n))
    }

    fn close(&mut self) -> Result<(), CipherError> {
        Ok(())
    }
}

/// Adapts a [`std::io::Write`] endpoint to the [`Sink`] trait.
pub struct WriteSink<W: Write> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        WriteSink { writer }
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn write(&mut self, source: &mut Buffer, byte_count: usize) -> Result<(), CipherError> {
        if byte_count > source.size() {
            return Err(CipherError::ShortSource {
                requested: byte_count,
                available: source.size(),
            });
        }
        let mut remaining = byte_count;
        while remaining > 0 {
            let head = source.head().expect("sized above");
            let n = head.len().min(remaining);
            self.writer.write_all(&head.readable()[..n])?;
            source.advance_head(n);
            remaining -= n;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CipherError> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), CipherError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_as_sink_and_source() {
        let mut upstream = Buffer::new();
        upstream.write_slice(b"pipeline bytes");

        let mut middle = Buffer::new();
        let n = upstream.read(&mut middle, 8).unwrap();
        assert_eq!(n, Some(8));
        assert_eq!(middle.to_vec(), b"pipeline");

        let n = upstream.read(&mut middle, 100).unwrap();
        assert_eq!(n, Some(6));
        assert_eq!(upstream.read(&mut middle, 1).unwrap(), None);
    }

    #[test]
    fn buffered_source_request_tolerates_chunking() {
        let mut raw = Buffer::new();
        raw.write_slice(&[5u8; 40]);
        let mut source = BufferedSource::new(raw);
        assert!(source.request(40).unwrap());
        assert!(!source.request(41).unwrap());
        assert!(!source.exhausted().unwrap());
    }

    #[test]
    fn read_source_eof_returns_the_reserved_segment() {
        use crate::segment::pool;

        // Prime the pool so take/recycle counts are observable.
        pool::recycle(pool::take());
        let before = pool::pooled();

        let mut source = ReadSource::new(std::io::Cursor::new(Vec::<u8>::new()));
        let mut buffer = Buffer::new();
        assert_eq!(source.read(&mut buffer, 1024).unwrap(), None);

        // The segment reserved for the EOF probe went straight back.
        assert_eq!(pool::pooled(), before);
        assert!(buffer.is_empty());
    }

    #[test]
    fn read_source_bridges_std_io() {
        let data = b"abcdefgh".to_vec();
        let mut source = ReadSource::new(std::io::Cursor::new(data));
        let mut buffer = Buffer::new();
        assert_eq!(source.read(&mut buffer, 1024).unwrap(), Some(8));
        assert_eq!(source.read(&mut buffer, 1024).unwrap(), None);
        assert_eq!(buffer.to_vec(), b"abcdefgh");
    }

    #[test]
    fn write_sink_bridges_std_io() {
        let mut buffer = Buffer::new();
        buffer.write_slice(b"spilled");
        let mut sink = WriteSink::new(Vec::new());
        sink.write(&mut buffer, 7).unwrap();
        sink.flush().unwrap();
        assert!(buffer.is_empty());
    }
}
