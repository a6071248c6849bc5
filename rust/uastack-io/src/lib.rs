//! Stream abstractions shared by the encoders and decoders of the protocol stack:
//! - `StreamRead`: sequential reader that may return short reads at the end of data.
//! - `StreamWrite`: sequential writer that either writes everything or fails.
//! - `StreamSeek`: cursor positioning within the valid data of a stream.
//!
//! Provides implementations for the expandable buffer, its handle and a fixed
//! read-only memory block.

use uastack_buffer::Position;
use uastack_common::Result;

pub mod memory;
pub mod utils;

pub use memory::MemoryBlock;
pub use utils::{copy_stream, read_exact, read_to_end, stream_adapter::StreamAdapter};

/// A source of bytes read sequentially from a cursor.
pub trait StreamRead {
    /// Reads up to `buf.len()` bytes at the cursor and advances it by the number of
    /// bytes read.
    ///
    /// **NOTE**: a short read (including zero bytes) is not an error, it means the cursor
    /// reached the end of the valid data. Callers that require the full amount use
    /// [`read_exact`].
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Advances the cursor by up to `length` bytes without copying them.
    ///
    /// # Returns
    ///
    /// The number of bytes actually skipped.
    fn skip(&mut self, length: usize) -> Result<usize>;
}

/// A sink of bytes written sequentially at a cursor.
pub trait StreamWrite {
    /// Writes the entire buffer at the cursor.
    ///
    /// **NOTE**: `write_all` never returns with a short write: either every byte
    /// is written, or an error is returned and the stream is left unchanged.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Pushes any pending bytes to the underlying medium.
    fn flush(&mut self) -> Result<()>;
}

/// Cursor positioning within a stream.
pub trait StreamSeek {
    /// Returns the current cursor offset.
    fn position(&self) -> Result<usize>;

    /// Moves the cursor.
    fn set_position(&mut self, position: Position) -> Result<()>;

    /// Returns the number of valid bytes in the stream.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: StreamRead + ?Sized> StreamRead for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn skip(&mut self, length: usize) -> Result<usize> {
        (**self).skip(length)
    }
}

impl<T: StreamRead + ?Sized> StreamRead for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn skip(&mut self, length: usize) -> Result<usize> {
        (**self).skip(length)
    }
}

impl<T: StreamWrite + ?Sized> StreamWrite for &mut T {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<T: StreamWrite + ?Sized> StreamWrite for Box<T> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<T: StreamSeek + ?Sized> StreamSeek for &mut T {
    fn position(&self) -> Result<usize> {
        (**self).position()
    }

    fn set_position(&mut self, position: Position) -> Result<()> {
        (**self).set_position(position)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }
}

impl<T: StreamSeek + ?Sized> StreamSeek for Box<T> {
    fn position(&self) -> Result<usize> {
        (**self).position()
    }

    fn set_position(&mut self, position: Position) -> Result<()> {
        (**self).set_position(position)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }
}
