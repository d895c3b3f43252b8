//! Ring buffer evicting the oldest transition one at a time.
use super::SlotStorage;
use crate::{
    selector::{ring_slot, Selector, SlotView},
    ReplayBufferBase, ReplayError, Transition, TransitionBatch,
};

/// A replay buffer with FIFO eviction of one transition per add.
///
/// This is the common replay setting, implemented without free list or
/// ledger: the write cursor always points at the oldest slot once the buffer
/// is full, so overwriting it is the eviction.
pub struct FifoRingCache {
    min_capacity: usize,
    max_capacity: usize,
    storage: SlotStorage,
    cursor: usize,
    is_full: bool,
    sampler: Box<dyn Selector>,
}

impl FifoRingCache {
    /// Creates a buffer.
    ///
    /// Fails if `sampler` has been registered as a remover or has a batch
    /// size of 0.
    pub fn new(
        sampler: Box<dyn Selector>,
        min_capacity: usize,
        max_capacity: usize,
        feature_size: usize,
        action_size: usize,
        include_next_action: bool,
        parallel_copy: bool,
    ) -> Result<Self, ReplayError> {
        if sampler.is_remover() {
            return Err(ReplayError::invalid_config(
                "the sampler is registered as a remover",
            ));
        }
        if sampler.batch_size() == 0 {
            return Err(ReplayError::invalid_config(
                "sampler batch size must be positive",
            ));
        }
        if min_capacity == 0 || min_capacity > max_capacity {
            return Err(ReplayError::invalid_config(format!(
                "min_capacity must be in 1..={}, got {}",
                max_capacity, min_capacity
            )));
        }

        Ok(Self {
            min_capacity,
            max_capacity,
            storage: SlotStorage::new(
                max_capacity,
                feature_size,
                action_size,
                include_next_action,
                parallel_copy,
            ),
            cursor: 0,
            is_full: false,
            sampler,
        })
    }

    /// Returns the `min(n, capacity)` oldest slots, oldest first.
    pub fn insert_order(&self, n: usize) -> Vec<usize> {
        let len = self.capacity();
        (0..n.min(len))
            .map(|i| ring_slot(self.cursor, len, self.max_capacity, i))
            .collect()
    }

    /// Returns the transition stored in `slot`, or `None` if the slot is empty.
    pub fn get(&self, slot: usize) -> Option<Transition> {
        if slot < self.capacity() {
            Some(self.storage.read(slot))
        } else {
            None
        }
    }
}

impl ReplayBufferBase for FifoRingCache {
    fn add(&mut self, tr: &Transition) -> Result<(), ReplayError> {
        tr.check_sizes(
            self.storage.feature_size(),
            self.storage.action_size(),
            self.storage.include_next_action(),
        )?;

        self.storage.write(self.cursor, tr);
        self.cursor += 1;
        if self.cursor == self.max_capacity {
            self.cursor = 0;
            self.is_full = true;
        }

        Ok(())
    }

    fn sample(&mut self) -> Result<TransitionBatch, ReplayError> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Err(ReplayError::EmptyBuffer);
        }
        if capacity < self.min_capacity {
            return Err(ReplayError::InsufficientSamples {
                capacity,
                min_capacity: self.min_capacity,
            });
        }

        let mut view = SlotView::ring(self.cursor, capacity, self.max_capacity);
        let ixs = self.sampler.choose(&mut view);
        Ok(self.storage.gather(&ixs))
    }

    fn capacity(&self) -> usize {
        if self.is_full {
            self.max_capacity
        } else {
            self.cursor
        }
    }

    fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    fn batch_size(&self) -> usize {
        self.sampler.batch_size()
    }

    fn sample_from(&self) -> Vec<usize> {
        self.insert_order(self.max_capacity)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selector::FifoSelector;

    fn transition(v: f32) -> Transition {
        Transition::new(vec![v], vec![v, -v], v, 1.0, vec![v + 1.0])
    }

    fn ring(max: usize) -> FifoRingCache {
        FifoRingCache::new(Box::new(FifoSelector::new(max)), 1, max, 1, 2, false, false).unwrap()
    }

    #[test]
    fn test_cursor_wraps() {
        let mut cache = ring(3);
        assert_eq!(cache.capacity(), 0);
        assert!(cache.sample_from().is_empty());

        cache.add(&transition(0.0)).unwrap();
        cache.add(&transition(1.0)).unwrap();
        assert_eq!(cache.capacity(), 2);
        assert_eq!(cache.sample_from(), vec![0, 1]);

        cache.add(&transition(2.0)).unwrap();
        assert!(cache.is_full());
        assert_eq!(cache.sample_from(), vec![0, 1, 2]);

        cache.add(&transition(3.0)).unwrap();
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.sample_from(), vec![1, 2, 0]);
        assert_eq!(cache.insert_order(2), vec![1, 2]);
        assert_eq!(cache.sample().unwrap().reward, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_get() {
        let mut cache = ring(3);
        cache.add(&transition(5.0)).unwrap();
        assert_eq!(cache.get(0), Some(transition(5.0)));
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn test_size_mismatch_keeps_cursor() {
        let mut cache = ring(3);
        let tr = Transition::new(vec![0.0], vec![0.0], 0.0, 1.0, vec![0.0]);
        assert!(matches!(
            cache.add(&tr),
            Err(ReplayError::SizeMismatch { field: "action", .. })
        ));
        assert_eq!(cache.capacity(), 0);
        assert_eq!(cache.sample(), Err(ReplayError::EmptyBuffer));
    }

    #[test]
    fn test_reject_zero_batch_size() {
        let res = FifoRingCache::new(Box::new(FifoSelector::new(0)), 1, 3, 1, 2, false, false);
        assert!(matches!(res, Err(ReplayError::InvalidConfiguration(_))));
    }
}
