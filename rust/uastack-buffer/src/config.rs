//! Growth policy and serializable buffer sizing configuration.

use serde::{Deserialize, Serialize};
use uastack_common::{Error, Result, verify_arg};

/// Default growth increment used by [`BufferConfig::default`].
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Describes how (and whether) a buffer may grow.
///
/// - `block_size` is the growth granularity: capacity only ever takes values that are
///   multiples of it (or `max_size`, when the ceiling is not itself a multiple).
///   Zero means the buffer is fixed-size.
/// - `max_size` is the capacity ceiling. Zero means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrowthPolicy {
    pub block_size: usize,
    pub max_size: usize,
}

impl GrowthPolicy {
    /// A policy that never grows the buffer.
    pub const fn fixed() -> GrowthPolicy {
        GrowthPolicy {
            block_size: 0,
            max_size: 0,
        }
    }

    /// Unbounded growth in increments of `block_size`.
    pub const fn blocks(block_size: usize) -> GrowthPolicy {
        GrowthPolicy {
            block_size,
            max_size: 0,
        }
    }

    /// Returns the same policy with a capacity ceiling of `max_size` (zero removes it).
    pub const fn with_max_size(self, max_size: usize) -> GrowthPolicy {
        GrowthPolicy { max_size, ..self }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.block_size == 0
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.max_size != 0
    }

    /// Checks whether a buffer holding `initial_size` bytes may be governed by this policy.
    pub fn check_initial_size(&self, initial_size: usize) -> Result<()> {
        verify_arg!(max_size, !self.is_bounded() || initial_size <= self.max_size);
        Ok(())
    }

    /// Computes the capacity a buffer must grow to in order to hold `required` bytes.
    ///
    /// The result is the smallest multiple of `block_size` that is `>= required`,
    /// capped at `max_size` when the policy is bounded.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the policy is fixed-size.
    /// - `OutOfMemory` if `required` exceeds `max_size`, or the rounded capacity
    ///   does not fit in `usize`.
    pub fn grow_to(&self, required: usize) -> Result<usize> {
        if self.is_fixed() {
            return Err(Error::invalid_state("growth of a fixed-size buffer"));
        }
        if self.is_bounded() && required > self.max_size {
            return Err(Error::out_of_memory(required, self.max_size));
        }
        let capacity = required
            .div_ceil(self.block_size)
            .checked_mul(self.block_size)
            .ok_or_else(|| Error::alloc_failed(required))?;
        if self.is_bounded() {
            Ok(capacity.min(self.max_size))
        } else {
            Ok(capacity)
        }
    }
}

/// Buffer sizing as it appears in an application's configuration file.
///
/// All fields are optional when deserializing:
///
/// ```
/// # use uastack_buffer::BufferConfig;
/// let config: BufferConfig = serde_json::from_str(r#"{ "max_size": 65536 }"#).unwrap();
/// assert_eq!(config.initial_size, 0);
/// assert_eq!(config.block_size, uastack_buffer::config::DEFAULT_BLOCK_SIZE);
/// assert_eq!(config.max_size, 65536);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Capacity allocated up front.
    pub initial_size: usize,
    /// Growth increment, zero for a fixed-size buffer.
    pub block_size: usize,
    /// Capacity ceiling, zero for unbounded.
    pub max_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig {
            initial_size: 0,
            block_size: DEFAULT_BLOCK_SIZE,
            max_size: 0,
        }
    }
}

impl BufferConfig {
    pub fn policy(&self) -> GrowthPolicy {
        GrowthPolicy {
            block_size: self.block_size,
            max_size: self.max_size,
        }
    }

    /// Validates the configuration for a freshly allocated buffer.
    pub fn validate(&self) -> Result<()> {
        self.policy().check_initial_size(self.initial_size)?;
        verify_arg!(block_size, self.block_size != 0 || self.initial_size != 0);
        Ok(())
    }
}
