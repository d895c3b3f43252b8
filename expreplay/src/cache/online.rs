//! Replay buffer of a single transition, for online learning.
use super::SlotStorage;
use crate::{ReplayBufferBase, ReplayError, Transition, TransitionBatch};
use log::warn;

/// A buffer holding only the latest transition.
///
/// Every [`add`](ReplayBufferBase::add) overwrites the stored transition and
/// every [`sample`](ReplayBufferBase::sample) returns it, so a learner using
/// this buffer learns purely online.
///
/// [`capacity`](ReplayBufferBase::capacity) is constant 1, even before the
/// first add; use [`is_ready`](ReplayBufferBase::is_ready) to know whether
/// [`sample`](ReplayBufferBase::sample) would succeed.
pub struct OnlineCache {
    storage: SlotStorage,
    has_data: bool,
    ignored_batch_sizes: Option<(usize, usize)>,
}

impl OnlineCache {
    /// Creates a buffer.
    ///
    /// Batch sizes other than 1 cannot be honoured and are ignored with a
    /// warning.
    pub fn new(
        feature_size: usize,
        action_size: usize,
        include_next_action: bool,
        remove_size: usize,
        sample_size: usize,
    ) -> Self {
        let ignored_batch_sizes = if remove_size > 1 || sample_size > 1 {
            warn!(
                "Online replay buffer ignores remove_size = {} and sample_size = {}",
                remove_size, sample_size
            );
            Some((remove_size, sample_size))
        } else {
            None
        };

        Self {
            storage: SlotStorage::new(1, feature_size, action_size, include_next_action, false),
            has_data: false,
            ignored_batch_sizes,
        }
    }

    /// Returns `(remove_size, sample_size)` given at construction if any of
    /// them was ignored.
    pub fn ignored_batch_sizes(&self) -> Option<(usize, usize)> {
        self.ignored_batch_sizes
    }

    /// Returns the stored transition.
    pub fn get(&self) -> Option<Transition> {
        if self.has_data {
            Some(self.storage.read(0))
        } else {
            None
        }
    }
}

impl ReplayBufferBase for OnlineCache {
    fn add(&mut self, tr: &Transition) -> Result<(), ReplayError> {
        tr.check_sizes(
            self.storage.feature_size(),
            self.storage.action_size(),
            self.storage.include_next_action(),
        )?;
        self.storage.write(0, tr);
        self.has_data = true;
        Ok(())
    }

    fn sample(&mut self) -> Result<TransitionBatch, ReplayError> {
        if !self.has_data {
            return Err(ReplayError::EmptyBuffer);
        }
        Ok(self.storage.gather(&[0]))
    }

    fn capacity(&self) -> usize {
        1
    }

    fn max_capacity(&self) -> usize {
        1
    }

    fn min_capacity(&self) -> usize {
        1
    }

    fn batch_size(&self) -> usize {
        1
    }

    fn sample_from(&self) -> Vec<usize> {
        if self.has_data {
            vec![0]
        } else {
            vec![]
        }
    }

    fn is_ready(&self) -> bool {
        self.has_data
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn test_online_round_trip() {
        let mut cache = OnlineCache::new(3, 1, true, 4, 32);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.max_capacity(), 1);
        assert_eq!(cache.min_capacity(), 1);
        assert_eq!(cache.batch_size(), 1);
        assert!(!cache.is_ready());
        assert_eq!(cache.sample(), Err(ReplayError::EmptyBuffer));

        let a = Transition::new(
            vec![0.1, f32::MIN_POSITIVE, -3.5],
            vec![2.0],
            -1.0,
            0.0,
            vec![1e-30, 7.0, 8.0],
        )
        .next_action(vec![1.0]);
        cache.add(&a).unwrap();
        assert!(cache.is_ready());
        let batch = cache.sample().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.transition(0), Some(a.clone()));

        let b = Transition::new(vec![1.0, 2.0, 3.0], vec![0.0], 1.0, 0.9, vec![4.0, 5.0, 6.0])
            .next_action(vec![3.0]);
        cache.add(&b).unwrap();
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.get(), Some(b.clone()));
        assert_eq!(cache.sample().unwrap().transition(0), Some(b));
    }

    #[test]
    fn test_ignored_batch_sizes() {
        assert_eq!(OnlineCache::new(3, 1, false, 1, 1).ignored_batch_sizes(), None);
        assert_eq!(
            OnlineCache::new(3, 1, false, 4, 1).ignored_batch_sizes(),
            Some((4, 1))
        );
        assert_eq!(
            OnlineCache::new(3, 1, false, 1, 32).ignored_batch_sizes(),
            Some((1, 32))
        );
    }
}
