//! Core definitions (error type, result alias and precondition checks), relied upon
//! by all uastack-* crates.

pub mod error;
pub mod result;

pub use error::{Error, ErrorKind};
pub use result::Result;
