//! Replay buffer interface.
use super::{Transition, TransitionBatch};
use crate::ReplayError;

/// Interface of replay buffers.
///
/// A learner drives the buffer from a single thread: it calls [`add`](Self::add)
/// on every environment step and [`sample`](Self::sample) whenever it takes an
/// optimization step. The buffer never calls back into the learner.
pub trait ReplayBufferBase {
    /// Copies a transition into the buffer, evicting old transitions if the
    /// buffer is full.
    ///
    /// On error the buffer is left unchanged.
    fn add(&mut self, tr: &Transition) -> Result<(), ReplayError>;

    /// Samples a batch of transitions.
    ///
    /// Fails with [`ReplayError::EmptyBuffer`] if the buffer holds no transition
    /// and with [`ReplayError::InsufficientSamples`] if it holds fewer than
    /// [`min_capacity`](Self::min_capacity) transitions.
    fn sample(&mut self) -> Result<TransitionBatch, ReplayError>;

    /// Returns the number of transitions currently stored.
    fn capacity(&self) -> usize;

    /// Returns the maximum number of transitions the buffer can store.
    fn max_capacity(&self) -> usize;

    /// Returns the number of transitions required before sampling is allowed.
    fn min_capacity(&self) -> usize;

    /// Returns the number of transitions requested per sample.
    fn batch_size(&self) -> usize;

    /// Returns the occupied slots, oldest first.
    fn sample_from(&self) -> Vec<usize>;

    /// Returns `true` if the buffer stores [`max_capacity`](Self::max_capacity) transitions.
    fn is_full(&self) -> bool {
        self.capacity() >= self.max_capacity()
    }

    /// Returns `true` if [`sample`](Self::sample) would succeed.
    fn is_ready(&self) -> bool {
        self.capacity() > 0 && self.capacity() >= self.min_capacity()
    }
}
