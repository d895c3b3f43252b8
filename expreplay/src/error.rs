//! Errors in the library.
use thiserror::Error;

/// Errors returned by replay buffers.
///
/// None of them is fatal: a failed [`add`](crate::ReplayBufferBase::add) or
/// [`sample`](crate::ReplayBufferBase::sample) leaves the buffer unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// Construction-time validation failure.
    #[error("Invalid replay buffer configuration: {0}")]
    InvalidConfiguration(String),

    /// Sampling from a buffer holding no transition.
    #[error("Replay buffer is empty")]
    EmptyBuffer,

    /// Sampling from a buffer holding fewer transitions than its minimum capacity.
    #[error("Insufficient samples in replay buffer: {capacity} < {min_capacity}")]
    InsufficientSamples {
        /// Number of transitions in the buffer.
        capacity: usize,

        /// Minimum number of transitions required for sampling.
        min_capacity: usize,
    },

    /// A transition field does not have the length the buffer was built for.
    #[error("Size mismatch of {field}: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Name of the field.
        field: &'static str,

        /// Configured length.
        expected: usize,

        /// Length of the given vector.
        actual: usize,
    },

    /// Eviction attempted while the buffer is at its minimum capacity.
    #[error("Cannot evict from replay buffer at its floor: {capacity} <= {min_capacity}")]
    EvictionAtFloor {
        /// Number of transitions in the buffer.
        capacity: usize,

        /// Minimum number of transitions the buffer keeps.
        min_capacity: usize,
    },
}

impl ReplayError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
