//! Expandable byte buffer used by the encoders and decoders of the protocol stack
//! to accumulate or consume message bytes.
//!
//! - [`ExpandableBuffer`]: contiguous storage with a cursor, growing in fixed
//!   increments up to an optional ceiling.
//! - [`GrowthPolicy`] and [`BufferConfig`]: how a buffer is sized and how it grows.
//! - [`BufferHandle`]: a releasable slot that rejects use after release.
//!
//! ```
//! use uastack_buffer::{ExpandableBuffer, GrowthPolicy, Position};
//!
//! let mut buffer = ExpandableBuffer::allocate(0, GrowthPolicy::blocks(16)).unwrap();
//! buffer.write(b"0123456789").unwrap();
//! assert_eq!(buffer.capacity(), 16);
//!
//! buffer.set_position(Position::Start).unwrap();
//! let mut head = [0u8; 4];
//! assert_eq!(buffer.read(&mut head).unwrap(), 4);
//! assert_eq!(&head, b"0123");
//! ```

pub mod buffer;
pub mod config;
pub mod handle;
pub mod storage;

pub use buffer::{ExpandableBuffer, Position};
pub use config::{BufferConfig, GrowthPolicy};
pub use handle::BufferHandle;
pub use storage::Storage;
