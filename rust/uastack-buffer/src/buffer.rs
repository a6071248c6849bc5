use uastack_common::{Error, Result, verify_arg};

use crate::{
    config::{BufferConfig, GrowthPolicy},
    storage::Storage,
};

/// Cursor target accepted by [`ExpandableBuffer::set_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Offset zero.
    Start,
    /// The current end of valid data.
    End,
    /// An explicit offset, which must not exceed the buffer capacity.
    Absolute(usize),
}

impl From<usize> for Position {
    fn from(offset: usize) -> Self {
        Position::Absolute(offset)
    }
}

/// An expandable memory buffer with a read/write cursor.
///
/// The buffer tracks three offsets that always satisfy
/// `position <= end_of_data <= capacity`:
/// - `position` is where the next read or write happens,
/// - `end_of_data` is one past the last valid byte,
/// - `capacity` is the length of the backing storage.
///
/// Writes past the capacity grow the storage according to the buffer's
/// [`GrowthPolicy`]. Reads never go past `end_of_data`, and report short counts
/// instead of failing. Every failing operation leaves the buffer unchanged.
///
/// The storage is either owned (and freed together with the buffer) or borrowed
/// from the caller for the lifetime `'a` (and never freed by the buffer).
pub struct ExpandableBuffer<'a> {
    storage: Storage<'a>,
    end_of_data: usize,
    position: usize,
    policy: GrowthPolicy,
}

impl ExpandableBuffer<'static> {
    /// Creates a buffer with `initial_size` bytes of freshly allocated, empty storage.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the policy is bounded below `initial_size`, or if the
    ///   policy is fixed-size and `initial_size` is zero (such a buffer could never
    ///   hold any data).
    /// - `OutOfMemory` if the allocation fails.
    pub fn allocate(
        initial_size: usize,
        policy: GrowthPolicy,
    ) -> Result<ExpandableBuffer<'static>> {
        policy.check_initial_size(initial_size)?;
        verify_arg!(block_size, !policy.is_fixed() || initial_size != 0);
        Ok(ExpandableBuffer {
            storage: Storage::allocate_zeroed(initial_size)?,
            end_of_data: 0,
            position: 0,
            policy,
        })
    }

    /// Creates an owned buffer sized by the configuration.
    pub fn with_config(config: &BufferConfig) -> Result<ExpandableBuffer<'static>> {
        config.validate()?;
        Self::allocate(config.initial_size, config.policy())
    }

    /// Wraps `data` without copying it, taking ownership.
    ///
    /// The whole vector counts as valid data: `end_of_data == capacity == data.len()`,
    /// and the cursor starts at zero.
    pub fn from_vec(data: Vec<u8>, policy: GrowthPolicy) -> Result<ExpandableBuffer<'static>> {
        Self::from_storage(Storage::Owned(data), policy)
    }
}

impl<'a> ExpandableBuffer<'a> {
    /// Wraps caller memory without copying it. The memory is never freed by the buffer.
    ///
    /// The whole slice counts as valid data. If a write needs more room than the slice
    /// provides (and the policy allows growth), the content moves into an owned
    /// allocation and the caller's slice is no longer written to.
    pub fn wrap(data: &'a mut [u8], policy: GrowthPolicy) -> Result<ExpandableBuffer<'a>> {
        Self::from_storage(Storage::Borrowed(data), policy)
    }

    /// Wraps existing storage, treating all of it as valid data.
    pub fn from_storage(
        storage: Storage<'a>,
        policy: GrowthPolicy,
    ) -> Result<ExpandableBuffer<'a>> {
        policy.check_initial_size(storage.len())?;
        Ok(ExpandableBuffer {
            end_of_data: storage.len(),
            storage,
            position: 0,
            policy,
        })
    }

    /// Releases the buffer. Owned storage is freed, borrowed storage is left to the caller.
    ///
    /// Dropping the buffer has the same effect.
    pub fn release(self) {
        log::trace!(
            "releasing {} buffer of {} bytes",
            if self.is_owned() { "owned" } else { "borrowed" },
            self.capacity()
        );
    }

    /// Total length of the backing storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Offset one past the last valid byte.
    #[inline]
    pub fn end_of_data(&self) -> usize {
        self.end_of_data
    }

    /// Current read/write cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of valid bytes between the cursor and the end of data.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end_of_data - self.position
    }

    /// How the buffer grows when a write needs more room.
    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Whether releasing the buffer frees its storage.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.storage.is_owned()
    }

    /// Returns `true` when the buffer holds no valid data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end_of_data == 0
    }

    /// The valid bytes, `[0, end_of_data)`. The cursor does not move.
    ///
    /// The view borrows the buffer, so it cannot outlive the next mutating call
    /// (which may grow and relocate the storage).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.storage.as_slice()[..self.end_of_data]
    }

    /// The whole backing storage, `[0, capacity)`, for filling in place.
    ///
    /// After filling, declare the amount of valid data with
    /// [`set_end_of_data`](Self::set_end_of_data).
    #[inline]
    pub fn storage_mut(&mut self) -> &mut [u8] {
        self.storage.as_mut_slice()
    }

    /// Copies `bytes` into the buffer at the cursor, growing the storage if needed.
    ///
    /// Bytes already present at and after the cursor are overwritten. The cursor
    /// advances by `bytes.len()` and `end_of_data` is extended if the write goes
    /// past it; a write that ends before `end_of_data` leaves it unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if growth is needed and the buffer is fixed-size.
    /// - `OutOfMemory` if growth would exceed the capacity ceiling, or the
    ///   allocation fails.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self
            .position
            .checked_add(bytes.len())
            .ok_or_else(|| Error::alloc_failed(usize::MAX))?;
        if end > self.capacity() {
            self.grow(end)?;
        }
        self.storage.as_mut_slice()[self.position..end].copy_from_slice(bytes);
        self.position = end;
        self.end_of_data = self.end_of_data.max(end);
        Ok(())
    }

    /// Copies up to `dest.len()` bytes from the cursor into `dest`, never reading past
    /// the end of data, and advances the cursor by the number of bytes copied.
    ///
    /// Returns the number of bytes copied; zero means the cursor is at the end of data.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize> {
        let count = dest.len().min(self.remaining());
        let start = self.position;
        dest[..count].copy_from_slice(&self.storage.as_slice()[start..start + count]);
        self.position += count;
        Ok(count)
    }

    /// Advances the cursor by `length` bytes without copying, stopping at the end of
    /// data. Returns the number of bytes actually skipped.
    ///
    /// Skipping never grows the buffer: a `length` that would carry the cursor past
    /// the capacity is rejected with `InvalidArgument`.
    pub fn skip(&mut self, length: usize) -> Result<usize> {
        verify_arg!(
            length,
            self.position
                .checked_add(length)
                .is_some_and(|end| end <= self.capacity())
        );
        let count = length.min(self.remaining());
        self.position += count;
        Ok(count)
    }

    /// Moves the cursor.
    ///
    /// Moving it to an explicit offset past the end of data (but within the capacity)
    /// extends the valid data up to that offset, so that the cursor never passes the
    /// end of data. The bytes added this way are zeroed, so content left over from
    /// before a `set_empty` or a shrinking `set_end_of_data` never becomes valid again.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if an explicit offset exceeds the capacity.
    pub fn set_position(&mut self, position: Position) -> Result<()> {
        let offset = match position {
            Position::Start => 0,
            Position::End => self.end_of_data,
            Position::Absolute(offset) => {
                verify_arg!(position, offset <= self.capacity());
                offset
            }
        };
        if offset > self.end_of_data {
            self.storage.as_mut_slice()[self.end_of_data..offset].fill(0);
            self.end_of_data = offset;
        }
        self.position = offset;
        Ok(())
    }

    /// Declares how many bytes of the storage are valid, typically after filling it
    /// through [`storage_mut`](Self::storage_mut). A cursor past the new end is pulled
    /// back to it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `end_of_data` exceeds the capacity.
    pub fn set_end_of_data(&mut self, end_of_data: usize) -> Result<()> {
        verify_arg!(end_of_data, end_of_data <= self.capacity());
        self.end_of_data = end_of_data;
        self.position = self.position.min(end_of_data);
        Ok(())
    }

    /// Resets the cursor and the end of data to zero, keeping the storage for reuse.
    pub fn set_empty(&mut self) {
        self.position = 0;
        self.end_of_data = 0;
    }

    /// Makes sure that `additional` bytes can be written at the cursor without
    /// further growth, growing now if needed.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let end = self
            .position
            .checked_add(additional)
            .ok_or_else(|| Error::alloc_failed(usize::MAX))?;
        if end > self.capacity() {
            self.grow(end)?;
        }
        Ok(())
    }

    /// Drops the storage (freeing it if owned) and resets the buffer to an empty,
    /// capacity-0 state with the same growth policy.
    ///
    /// A fixed-size buffer cannot grow back, so it keeps its storage instead: the
    /// content is zeroed and the buffer becomes empty with its capacity unchanged.
    pub fn clear(&mut self) {
        if self.policy.is_fixed() {
            self.storage.as_mut_slice().fill(0);
        } else {
            self.storage = Storage::default();
        }
        self.set_empty();
    }

    /// Consumes the buffer, returning the valid bytes. Owned storage is reused,
    /// borrowed storage is copied.
    pub fn into_vec(self) -> Vec<u8> {
        self.storage.into_vec(self.end_of_data)
    }

    #[cold]
    fn grow(&mut self, required: usize) -> Result<()> {
        let new_capacity = match self.policy.grow_to(required) {
            Ok(capacity) => capacity,
            Err(e) => {
                log::debug!(
                    "cannot grow buffer from {} to {} bytes ({:?}): {}",
                    self.capacity(),
                    required,
                    self.policy,
                    e
                );
                return Err(e);
            }
        };
        log::trace!(
            "growing buffer from {} to {} bytes",
            self.capacity(),
            new_capacity
        );
        self.storage.grow(new_capacity)
    }
}

impl std::fmt::Debug for ExpandableBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandableBuffer")
            .field("position", &self.position)
            .field("end_of_data", &self.end_of_data)
            .field("capacity", &self.capacity())
            .field("policy", &self.policy)
            .field("owned", &self.is_owned())
            .finish_non_exhaustive()
    }
}

impl std::io::Read for ExpandableBuffer<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(ExpandableBuffer::read(self, buf)?)
    }
}

impl std::io::Write for ExpandableBuffer<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        ExpandableBuffer::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::io::Seek for ExpandableBuffer<'_> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        let target = match pos {
            std::io::SeekFrom::Start(offset) => usize::try_from(offset).ok(),
            std::io::SeekFrom::End(offset) => isize::try_from(offset)
                .ok()
                .and_then(|offset| self.end_of_data.checked_add_signed(offset)),
            std::io::SeekFrom::Current(offset) => isize::try_from(offset)
                .ok()
                .and_then(|offset| self.position.checked_add_signed(offset)),
        };
        let target =
            target.ok_or_else(|| Error::invalid_arg("position", "0 <= position <= capacity"))?;
        self.set_position(Position::Absolute(target))?;
        Ok(self.position as u64)
    }
}
