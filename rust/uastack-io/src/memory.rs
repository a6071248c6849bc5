use uastack_buffer::{BufferHandle, ExpandableBuffer, Position};
use uastack_common::{Result, verify_arg};

use crate::{StreamRead, StreamSeek, StreamWrite};

impl StreamRead for ExpandableBuffer<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        ExpandableBuffer::read(self, buf)
    }

    fn skip(&mut self, length: usize) -> Result<usize> {
        ExpandableBuffer::skip(self, length)
    }
}

impl StreamWrite for ExpandableBuffer<'_> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        ExpandableBuffer::write(self, buf)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl StreamSeek for ExpandableBuffer<'_> {
    fn position(&self) -> Result<usize> {
        Ok(ExpandableBuffer::position(self))
    }

    fn set_position(&mut self, position: Position) -> Result<()> {
        ExpandableBuffer::set_position(self, position)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.end_of_data())
    }
}

impl StreamRead for BufferHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        BufferHandle::read(self, buf)
    }

    fn skip(&mut self, length: usize) -> Result<usize> {
        BufferHandle::skip(self, length)
    }
}

impl StreamWrite for BufferHandle<'_> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        BufferHandle::write(self, buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.get()?;
        Ok(())
    }
}

impl StreamSeek for BufferHandle<'_> {
    fn position(&self) -> Result<usize> {
        BufferHandle::position(self)
    }

    fn set_position(&mut self, position: Position) -> Result<()> {
        BufferHandle::set_position(self, position)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.get()?.end_of_data())
    }
}

/// A fixed, read-only block of memory consumed through a cursor.
///
/// Decoders use it for message bodies that were already received in full, where
/// growth and writes make no sense. Positioning follows the expandable buffer:
/// the whole block is valid data, and the cursor never moves past its end.
#[derive(Debug, Clone)]
pub struct MemoryBlock<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> MemoryBlock<'a> {
    pub fn new(data: &'a [u8]) -> MemoryBlock<'a> {
        MemoryBlock { data, position: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The bytes from the cursor to the end of the block.
    #[inline]
    pub fn unread(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    pub fn into_inner(self) -> &'a [u8] {
        self.data
    }
}

impl StreamRead for MemoryBlock<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = buf.len().min(self.remaining());
        let start = self.position;
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        self.position += count;
        Ok(count)
    }

    fn skip(&mut self, length: usize) -> Result<usize> {
        verify_arg!(
            length,
            self.position
                .checked_add(length)
                .is_some_and(|end| end <= self.data.len())
        );
        self.position += length;
        Ok(length)
    }
}

impl StreamSeek for MemoryBlock<'_> {
    fn position(&self) -> Result<usize> {
        Ok(self.position)
    }

    fn set_position(&mut self, position: Position) -> Result<()> {
        self.position = match position {
            Position::Start => 0,
            Position::End => self.data.len(),
            Position::Absolute(offset) => {
                verify_arg!(position, offset <= self.data.len());
                offset
            }
        };
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use uastack_buffer::GrowthPolicy;

    use super::*;

    #[test]
    fn test_memory_block_read() {
        let mut block = MemoryBlock::new(b"Hello, World!");
        let mut buf = [0u8; 5];
        assert_eq!(block.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"Hello");
        assert_eq!(block.position(), 5);

        assert_eq!(block.skip(2).unwrap(), 2);
        let mut buf = [0u8; 10];
        assert_eq!(block.read(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], b"World!");

        // End of data.
        assert_eq!(block.read(&mut buf).unwrap(), 0);
        assert_eq!(block.remaining(), 0);
    }

    #[test]
    fn test_memory_block_skip_past_end() {
        let mut block = MemoryBlock::new(b"abc");
        block.skip(1).unwrap();
        assert!(block.skip(3).unwrap_err().is_invalid_arg());
        assert_eq!(block.position(), 1);
        assert_eq!(block.unread(), b"bc");
        assert!(block.skip(usize::MAX).unwrap_err().is_invalid_arg());
    }

    #[test]
    fn test_memory_block_seek() {
        let mut block = MemoryBlock::new(b"0123456789");
        block.set_position(Position::End).unwrap();
        assert_eq!(StreamSeek::position(&block).unwrap(), 10);
        block.set_position(Position::Absolute(3)).unwrap();
        assert_eq!(block.unread(), b"3456789");
        assert!(
            block
                .set_position(Position::Absolute(11))
                .unwrap_err()
                .is_invalid_arg()
        );
        block.set_position(Position::Start).unwrap();
        assert_eq!(block.len().unwrap(), 10);
        assert_eq!(block.into_inner(), b"0123456789");
    }

    #[test]
    fn test_empty_memory_block() {
        let mut block = MemoryBlock::new(&[]);
        assert!(block.is_empty().unwrap());
        assert_eq!(block.read(&mut [0u8; 4]).unwrap(), 0);
        assert_eq!(block.skip(0).unwrap(), 0);
    }

    #[test]
    fn test_buffer_as_stream() {
        let mut buffer = ExpandableBuffer::allocate(0, GrowthPolicy::blocks(4)).unwrap();
        StreamWrite::write_all(&mut buffer, b"abcdef").unwrap();
        assert_eq!(StreamSeek::len(&buffer).unwrap(), 6);
        StreamSeek::set_position(&mut buffer, Position::Start).unwrap();
        assert_eq!(StreamRead::skip(&mut buffer, 4).unwrap(), 4);
        let mut buf = [0u8; 4];
        assert_eq!(StreamRead::read(&mut buffer, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
    }

    #[test]
    fn test_handle_as_stream() {
        let mut handle = BufferHandle::create(0, GrowthPolicy::blocks(4)).unwrap();
        StreamWrite::write_all(&mut handle, b"xyz").unwrap();
        StreamWrite::flush(&mut handle).unwrap();
        assert_eq!(StreamSeek::len(&handle).unwrap(), 3);
        assert_eq!(StreamSeek::position(&handle).unwrap(), 3);

        handle.release();
        let err = StreamWrite::write_all(&mut handle, b"!").unwrap_err();
        assert!(err.is_invalid_handle());
        assert!(StreamWrite::flush(&mut handle).unwrap_err().is_invalid_handle());
        assert!(StreamSeek::len(&handle).unwrap_err().is_invalid_handle());
        assert!(
            StreamRead::read(&mut handle, &mut [0u8; 1])
                .unwrap_err()
                .is_invalid_handle()
        );
    }
}
