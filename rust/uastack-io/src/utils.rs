use uastack_common::{Error, Result};

use crate::{StreamRead, StreamWrite};

pub mod stream_adapter;

/// Chunk size used when pumping bytes between streams.
pub const COPY_CHUNK_SIZE: usize = 8 * 1024;

/// Fills `buf` completely from `reader`.
///
/// A stream that runs out of data first is reported as `EndOfStream`, carrying the
/// number of bytes requested and the number actually available. The bytes that were
/// available are consumed and left at the front of `buf`.
pub fn read_exact<R: StreamRead + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut pos = 0;
    while pos < buf.len() {
        match reader.read(&mut buf[pos..])? {
            0 => return Err(Error::end_of_stream(buf.len(), pos)),
            bytes => pos += bytes,
        }
    }
    Ok(())
}

/// Reads everything from the cursor to the end of the stream, appending it to `out`.
pub fn read_to_end<R: StreamRead + ?Sized>(reader: &mut R, out: &mut Vec<u8>) -> Result<usize> {
    let start = out.len();
    let mut chunk = [0u8; COPY_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk)? {
            0 => return Ok(out.len() - start),
            bytes => out.extend_from_slice(&chunk[..bytes]),
        }
    }
}

/// Pumps the rest of `reader` into `writer`, returning the number of bytes copied.
pub fn copy_stream<R, W>(reader: &mut R, writer: &mut W) -> Result<usize>
where
    R: StreamRead + ?Sized,
    W: StreamWrite + ?Sized,
{
    let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
    let mut total = 0;
    loop {
        let bytes = reader.read(&mut chunk)?;
        if bytes == 0 {
            break;
        }
        writer.write_all(&chunk[..bytes])?;
        total += bytes;
    }
    log::trace!("copied {total} bytes between streams");
    Ok(total)
}
