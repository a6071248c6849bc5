//! A helper that turns any stream into a standard `std::io::Read`, `Seek` and `Write`.

use uastack_buffer::Position;
use uastack_common::Error;

use crate::{StreamRead, StreamSeek, StreamWrite};

/// Exposes a stream through the `std::io` traits, so that it can be handed to code
/// written against `std::io::Read`, `std::io::Seek` or `std::io::Write`.
///
/// Which of the three traits is available depends on what the inner stream implements.
/// Stream errors are carried inside the returned `std::io::Error` and come back out
/// unchanged when converted into [`uastack_common::Error`].
pub struct StreamAdapter<S> {
    inner: S,
}

impl<S> StreamAdapter<S> {
    pub fn new(inner: S) -> Self {
        StreamAdapter { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: StreamRead> std::io::Read for StreamAdapter<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(self.inner.read(buf)?)
    }
}

impl<S: StreamWrite> std::io::Write for StreamAdapter<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(self.inner.flush()?)
    }
}

impl<S: StreamSeek> std::io::Seek for StreamAdapter<S> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        use std::io::SeekFrom;

        let target = match pos {
            SeekFrom::Start(offset) => usize::try_from(offset).ok(),
            SeekFrom::End(offset) => {
                let len = self.inner.len()?;
                isize::try_from(offset)
                    .ok()
                    .and_then(|offset| len.checked_add_signed(offset))
            }
            SeekFrom::Current(offset) => {
                let current = self.inner.position()?;
                isize::try_from(offset)
                    .ok()
                    .and_then(|offset| current.checked_add_signed(offset))
            }
        };
        // Seeking before the start is an error, as with `std::io::Cursor`.
        let target = target.ok_or_else(|| Error::invalid_arg("pos", "0 <= position"))?;
        self.inner.set_position(Position::Absolute(target))?;
        Ok(self.inner.position()? as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Seek, SeekFrom, Write};

    use uastack_buffer::{BufferHandle, ExpandableBuffer, GrowthPolicy};

    use super::*;
    use crate::MemoryBlock;

    #[test]
    fn test_stream_adapter_read() {
        let mut adapter = StreamAdapter::new(MemoryBlock::new(b"Hello, World!"));

        let mut buf = [0u8; 5];
        assert_eq!(adapter.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"Hello");
        assert_eq!(adapter.get_ref().position(), 5);

        let mut buf = [0u8; 10];
        assert_eq!(adapter.read(&mut buf).unwrap(), 8);
        assert_eq!(&buf[..8], b", World!");

        // EOF
        assert_eq!(adapter.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_stream_adapter_std_io_compatibility() {
        let data = b"Hello, World!";
        let mut adapter = StreamAdapter::new(MemoryBlock::new(data));

        let mut result = Vec::new();
        adapter.read_to_end(&mut result).unwrap();
        assert_eq!(result, data);

        let mut adapter = StreamAdapter::new(MemoryBlock::new(data));
        let mut word = [0u8; 20];
        let err = adapter.read_exact(&mut word).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_stream_adapter_seek() {
        let mut adapter = StreamAdapter::new(MemoryBlock::new(b"Hello, World!"));

        assert_eq!(adapter.seek(SeekFrom::End(-6)).unwrap(), 7);
        let mut buf = [0u8; 6];
        adapter.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"World!");

        assert_eq!(adapter.seek(SeekFrom::Current(-8)).unwrap(), 5);
        assert_eq!(adapter.seek(SeekFrom::Start(0)).unwrap(), 0);
        assert_eq!(adapter.stream_position().unwrap(), 0);

        let err = adapter.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

        // A memory block cannot be positioned past its end.
        let err = adapter.seek(SeekFrom::Start(14)).unwrap_err();
        let err = Error::from(err);
        assert!(err.is_invalid_arg());
        assert_eq!(adapter.get_ref().position(), 0);
    }

    #[test]
    fn test_stream_adapter_write() {
        let buffer = ExpandableBuffer::allocate(0, GrowthPolicy::blocks(16)).unwrap();
        let mut adapter = StreamAdapter::new(buffer);
        write!(adapter, "id={};", 42).unwrap();
        adapter.write_all(b"done").unwrap();
        adapter.flush().unwrap();

        adapter.seek(SeekFrom::Start(3)).unwrap();
        adapter.write_all(b"77").unwrap();
        let buffer = adapter.into_inner();
        assert_eq!(buffer.data(), b"id=77;done");
        assert_eq!(buffer.capacity(), 16);
    }

    #[test]
    fn test_stream_adapter_write_error_round_trip() {
        let buffer = ExpandableBuffer::allocate(4, GrowthPolicy::fixed()).unwrap();
        let mut adapter = StreamAdapter::new(buffer);
        let err = adapter.write(b"too long").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
        assert!(Error::from(err).is_invalid_state());
        assert!(adapter.get_ref().data().is_empty());
    }

    #[test]
    fn test_stream_adapter_over_handle() {
        let mut handle = BufferHandle::create(0, GrowthPolicy::blocks(8)).unwrap();
        {
            let mut adapter = StreamAdapter::new(&mut handle);
            adapter.write_all(b"0123456789").unwrap();
            adapter.rewind().unwrap();
            let mut head = [0u8; 3];
            adapter.read_exact(&mut head).unwrap();
            assert_eq!(&head, b"012");
        }
        assert_eq!(handle.position().unwrap(), 3);

        handle.release();
        let mut adapter = StreamAdapter::new(&mut handle);
        let err = adapter.read(&mut [0u8; 1]).unwrap_err();
        assert!(Error::from(err).is_invalid_handle());
    }
}
