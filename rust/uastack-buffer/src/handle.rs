//! `BufferHandle`: a buffer slot that can be released and detects use after release.

use uastack_common::{Error, Result};

use crate::{ExpandableBuffer, GrowthPolicy, Position};

/// A slot holding an [`ExpandableBuffer`], or nothing once released.
///
/// Stream sessions keep their buffer in a handle so that the buffer can be released
/// early (returning owned memory) while the session object lives on. Every operation
/// on a released handle fails with `InvalidHandle` instead of touching stale memory.
#[derive(Debug, Default)]
pub struct BufferHandle<'a> {
    buffer: Option<ExpandableBuffer<'a>>,
}

impl BufferHandle<'static> {
    /// Allocates a new buffer and returns a live handle to it.
    pub fn create(initial_size: usize, policy: GrowthPolicy) -> Result<BufferHandle<'static>> {
        Ok(Self::from_buffer(ExpandableBuffer::allocate(
            initial_size,
            policy,
        )?))
    }
}

impl<'a> BufferHandle<'a> {
    pub fn from_buffer(buffer: ExpandableBuffer<'a>) -> BufferHandle<'a> {
        BufferHandle {
            buffer: Some(buffer),
        }
    }

    /// A handle that does not hold a buffer yet.
    pub fn released() -> BufferHandle<'a> {
        BufferHandle { buffer: None }
    }

    /// Places `buffer` into the slot, releasing the buffer held so far (if any).
    pub fn initialize(&mut self, buffer: ExpandableBuffer<'a>) {
        self.release();
        self.buffer = Some(buffer);
    }

    /// Releases the buffer and invalidates the handle. Owned storage is freed.
    ///
    /// Releasing an already released handle does nothing.
    pub fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.release();
        }
    }

    /// Drops the storage of the held buffer, keeping the handle valid with an empty
    /// buffer under the same growth policy. See [`ExpandableBuffer::clear`].
    pub fn clear(&mut self) -> Result<()> {
        self.get_mut()?.clear();
        Ok(())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.buffer.is_some()
    }

    #[inline]
    pub fn get(&self) -> Result<&ExpandableBuffer<'a>> {
        self.buffer.as_ref().ok_or_else(Error::invalid_handle)
    }

    #[inline]
    pub fn get_mut(&mut self) -> Result<&mut ExpandableBuffer<'a>> {
        self.buffer.as_mut().ok_or_else(Error::invalid_handle)
    }

    /// Moves the buffer out, leaving the handle released.
    pub fn take(&mut self) -> Result<ExpandableBuffer<'a>> {
        self.buffer.take().ok_or_else(Error::invalid_handle)
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.get_mut()?.write(bytes)
    }

    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.get_mut()?.read(dest)
    }

    pub fn skip(&mut self, length: usize) -> Result<usize> {
        self.get_mut()?.skip(length)
    }

    pub fn position(&self) -> Result<usize> {
        Ok(self.get()?.position())
    }

    pub fn set_position(&mut self, position: Position) -> Result<()> {
        self.get_mut()?.set_position(position)
    }

    pub fn set_end_of_data(&mut self, end_of_data: usize) -> Result<()> {
        self.get_mut()?.set_end_of_data(end_of_data)
    }

    pub fn data(&self) -> Result<&[u8]> {
        Ok(self.get()?.data())
    }

    pub fn set_empty(&mut self) -> Result<()> {
        self.get_mut()?.set_empty();
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.get()?.is_empty())
    }
}

impl<'a> From<ExpandableBuffer<'a>> for BufferHandle<'a> {
    fn from(buffer: ExpandableBuffer<'a>) -> Self {
        BufferHandle::from_buffer(buffer)
    }
}
