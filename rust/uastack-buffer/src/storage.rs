//! Backing memory of an expandable buffer, either owned or borrowed from the caller.

use uastack_common::{Error, Result};

/// The byte region behind an [`ExpandableBuffer`](crate::ExpandableBuffer).
///
/// The length of the region is the buffer capacity. Owned storage keeps
/// `vec.len() == capacity` (the tail is zero-filled on growth), so the whole capacity
/// is always addressable.
pub enum Storage<'a> {
    /// Memory allocated by (or handed over to) the buffer; freed when the buffer goes away.
    Owned(Vec<u8>),
    /// Caller memory; never freed by the buffer.
    Borrowed(&'a mut [u8]),
}

impl<'a> Storage<'a> {
    /// Allocates `len` zeroed bytes, reporting allocator failure instead of aborting.
    pub fn allocate_zeroed(len: usize) -> Result<Storage<'a>> {
        let mut vec = Vec::new();
        vec.try_reserve_exact(len)
            .map_err(|_| Error::alloc_failed(len))?;
        vec.resize(len, 0);
        Ok(Storage::Owned(vec))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Storage::Owned(_))
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Owned(vec) => vec,
            Storage::Borrowed(slice) => slice,
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(vec) => vec,
            Storage::Borrowed(slice) => slice,
        }
    }

    /// Extends the region to `new_len` bytes, zero-filling the tail.
    ///
    /// Borrowed memory cannot be reallocated, so its content is moved into a new
    /// owned allocation; the caller's slice is not written to afterwards.
    /// On failure the storage is left untouched.
    pub fn grow(&mut self, new_len: usize) -> Result<()> {
        debug_assert!(new_len >= self.len());
        match self {
            Storage::Owned(vec) => {
                let additional = new_len - vec.len();
                vec.try_reserve_exact(additional)
                    .map_err(|_| Error::alloc_failed(new_len))?;
                vec.resize(new_len, 0);
            }
            Storage::Borrowed(slice) => {
                let mut vec = Vec::new();
                vec.try_reserve_exact(new_len)
                    .map_err(|_| Error::alloc_failed(new_len))?;
                vec.extend_from_slice(slice);
                vec.resize(new_len, 0);
                log::trace!(
                    "moving {} borrowed bytes into an owned allocation of {} bytes",
                    slice.len(),
                    new_len
                );
                *self = Storage::Owned(vec);
            }
        }
        Ok(())
    }

    /// Consumes the storage, returning its first `len` bytes as a vector.
    /// Owned memory is reused; borrowed memory is copied.
    pub fn into_vec(self, len: usize) -> Vec<u8> {
        match self {
            Storage::Owned(mut vec) => {
                vec.truncate(len);
                vec
            }
            Storage::Borrowed(slice) => slice[..len.min(slice.len())].to_vec(),
        }
    }
}

impl Default for Storage<'_> {
    fn default() -> Self {
        Storage::Owned(Vec::new())
    }
}

impl std::fmt::Debug for Storage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_owned() { "Owned" } else { "Borrowed" };
        f.debug_struct(kind).field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let storage = Storage::allocate_zeroed(8).unwrap();
        assert!(storage.is_owned());
        assert_eq!(storage.as_slice(), &[0u8; 8]);

        let storage = Storage::allocate_zeroed(0).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_grow_owned() {
        let mut storage = Storage::Owned(b"abc".to_vec());
        storage.grow(6).unwrap();
        assert_eq!(storage.as_slice(), b"abc\0\0\0");
    }

    #[test]
    fn test_grow_borrowed_moves_to_owned() {
        let mut region = *b"xyz";
        {
            let mut storage = Storage::Borrowed(&mut region);
            storage.as_mut_slice()[0] = b'X';
            storage.grow(5).unwrap();
            assert!(storage.is_owned());
            storage.as_mut_slice()[1] = b'Y';
            assert_eq!(storage.as_slice(), b"XYz\0\0");
        }
        // Writes made after the move do not reach the caller's memory.
        assert_eq!(&region, b"Xyz");
    }

    #[test]
    fn test_into_vec() {
        let storage = Storage::Owned(b"hello".to_vec());
        assert_eq!(storage.into_vec(3), b"hel");

        let mut region = *b"world";
        let storage = Storage::Borrowed(&mut region);
        assert_eq!(storage.into_vec(2), b"wo");
    }
}
