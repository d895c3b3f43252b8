//! Replay buffer with arbitrary remover and sampler.
use super::{InsertOrder, SlotStorage};
use crate::{
    selector::{Selector, SlotView},
    ReplayBufferBase, ReplayError, Transition, TransitionBatch,
};
use log::trace;

/// A replay buffer supporting any combination of remover and sampler.
///
/// Slots are recycled through a free list. Occupied slots are kept in an
/// unordered in-use list, with a per-slot position table for O(1)
/// swap-removal, and in an [`InsertOrder`] ledger for FIFO selection.
///
/// When the buffer is full, [`add`](ReplayBufferBase::add) first evicts the
/// slots chosen by the remover. Eviction is refused while the buffer holds no
/// more than `min_capacity` transitions.
pub struct GeneralCache {
    min_capacity: usize,
    max_capacity: usize,
    storage: SlotStorage,

    /// Empty slots, used as a stack.
    free: Vec<usize>,

    /// Occupied slots, unordered.
    in_use: Vec<usize>,

    /// Position of each occupied slot in `in_use`.
    pos_in_use: Vec<Option<usize>>,

    order: InsertOrder,
    remover: Box<dyn Selector>,
    sampler: Box<dyn Selector>,
}

impl GeneralCache {
    /// Creates a buffer.
    ///
    /// `remover` is registered as remover here. Fails if `sampler` has
    /// already been registered as a remover, since one selector instance
    /// cannot serve both roles, or if either selector has a batch size of 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mut remover: Box<dyn Selector>,
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
        if remover.batch_size() == 0 || sampler.batch_size() == 0 {
            return Err(ReplayError::invalid_config(
                "remover and sampler batch sizes must be positive",
            ));
        }
        if min_capacity == 0 || min_capacity > max_capacity {
            return Err(ReplayError::invalid_config(format!(
                "min_capacity must be in 1..={}, got {}",
                max_capacity, min_capacity
            )));
        }
        remover.register_as_remover();

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
            // Popped from the back, so slot 0 is used first
            free: (0..max_capacity).rev().collect(),
            in_use: Vec::with_capacity(max_capacity),
            pos_in_use: vec![None; max_capacity],
            order: InsertOrder::new(max_capacity),
            remover,
            sampler,
        })
    }

    /// Evicts the slots chosen by the remover.
    fn remove(&mut self) -> Result<(), ReplayError> {
        let capacity = self.capacity();
        if capacity <= self.min_capacity {
            return Err(ReplayError::EvictionAtFloor {
                capacity,
                min_capacity: self.min_capacity,
            });
        }

        let mut ixs = {
            let mut view = SlotView::ledger(&self.in_use, &mut self.order);
            self.remover.choose(&mut view)
        };
        // Uniform removers draw with replacement
        ixs.sort_unstable();
        ixs.dedup();
        trace!("Evict slots {:?}", ixs);

        let n_released = ixs.into_iter().filter(|&ix| self.release(ix)).count();
        debug_assert_eq!(self.in_use.len(), self.order.len());

        if n_released == 0 {
            return Err(ReplayError::invalid_config(
                "the remover chose no occupied slot to evict",
            ));
        }
        Ok(())
    }

    /// Moves an occupied slot to the free list. Returns `false` if the slot
    /// was not occupied.
    fn release(&mut self, slot: usize) -> bool {
        let pos = match self.pos_in_use.get_mut(slot).and_then(|pos| pos.take()) {
            Some(pos) => pos,
            None => return false,
        };
        self.in_use.swap_remove(pos);
        if let Some(&moved) = self.in_use.get(pos) {
            self.pos_in_use[moved] = Some(pos);
        }

        // A FIFO remover has already popped the slot from the ledger
        self.order.unlink(slot);
        self.free.push(slot);
        true
    }

    /// Returns the transition stored in `slot`, or `None` if the slot is empty.
    pub fn get(&self, slot: usize) -> Option<Transition> {
        match self.pos_in_use.get(slot) {
            Some(Some(_)) => Some(self.storage.read(slot)),
            _ => None,
        }
    }

    /// Returns the sum of the rewards of the stored transitions.
    pub fn sum_rewards(&self) -> f32 {
        self.in_use
            .iter()
            .map(|&ix| self.storage.reward(ix))
            .sum()
    }
}

impl ReplayBufferBase for GeneralCache {
    fn add(&mut self, tr: &Transition) -> Result<(), ReplayError> {
        tr.check_sizes(
            self.storage.feature_size(),
            self.storage.action_size(),
            self.storage.include_next_action(),
        )?;

        if self.capacity() >= self.max_capacity {
            self.remove()?;
        }

        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                return Err(ReplayError::invalid_config(
                    "no free slot after eviction",
                ))
            }
        };
        self.pos_in_use[slot] = Some(self.in_use.len());
        self.in_use.push(slot);
        self.order.push_back(slot);
        self.storage.write(slot, tr);

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

        let ixs = {
            let mut view = SlotView::ledger(&self.in_use, &mut self.order);
            self.sampler.choose(&mut view)
        };
        Ok(self.storage.gather(&ixs))
    }

    fn capacity(&self) -> usize {
        self.in_use.len()
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
        self.order.iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selector::{FifoSelector, SelectorKind, UniformSelector};

    /// A remover that never chooses any slot.
    struct NoneSelector(bool);

    impl Selector for NoneSelector {
        fn choose(&mut self, _view: &mut SlotView<'_>) -> Vec<usize> {
            vec![]
        }

        fn batch_size(&self) -> usize {
            1
        }

        fn register_as_remover(&mut self) {
            self.0 = true;
        }

        fn is_remover(&self) -> bool {
            self.0
        }

        fn kind(&self) -> SelectorKind {
            SelectorKind::Fifo
        }
    }

    fn transition(v: f32) -> Transition {
        Transition::new(vec![v, v], vec![v], v, 0.9, vec![v + 1.0, v + 1.0])
    }

    fn rewards(batch: &TransitionBatch) -> Vec<f32> {
        batch.reward.clone()
    }

    fn fifo_fifo(remove_size: usize, min: usize, max: usize) -> GeneralCache {
        GeneralCache::new(
            Box::new(FifoSelector::new(remove_size)),
            Box::new(FifoSelector::new(max)),
            min,
            max,
            2,
            1,
            false,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_fifo_evict_batch() {
        let mut cache = fifo_fifo(2, 1, 4);
        for i in 0..4 {
            cache.add(&transition(i as f32)).unwrap();
        }
        assert_eq!(rewards(&cache.sample().unwrap()), vec![0.0, 1.0, 2.0, 3.0]);

        // Two oldest are evicted at once
        cache.add(&transition(4.0)).unwrap();
        assert_eq!(cache.capacity(), 3);
        assert_eq!(rewards(&cache.sample().unwrap()), vec![2.0, 3.0, 4.0]);

        cache.add(&transition(5.0)).unwrap();
        assert_eq!(cache.capacity(), 4);
        assert_eq!(
            rewards(&cache.sample().unwrap()),
            vec![2.0, 3.0, 4.0, 5.0]
        );
    }

    #[test]
    fn test_slots_partition() {
        let mut cache = GeneralCache::new(
            Box::new(UniformSelector::new(3, 1)),
            Box::new(UniformSelector::new(8, 2)),
            1,
            8,
            2,
            1,
            false,
            false,
        )
        .unwrap();

        for i in 0..100 {
            cache.add(&transition(i as f32)).unwrap();
            assert!(cache.capacity() <= cache.max_capacity());
            assert_eq!(cache.in_use.len() + cache.free.len(), 8);
            assert_eq!(cache.order.len(), cache.in_use.len());

            let mut slots = cache.in_use.clone();
            slots.extend(cache.free.iter());
            slots.sort_unstable();
            assert_eq!(slots, (0..8).collect::<Vec<_>>());
            for (pos, &slot) in cache.in_use.iter().enumerate() {
                assert_eq!(cache.pos_in_use[slot], Some(pos));
                assert!(cache.order.contains(slot));
            }
        }
    }

    #[test]
    fn test_uniform_remover_keeps_order() {
        let mut cache = GeneralCache::new(
            Box::new(UniformSelector::new(1, 3)),
            Box::new(FifoSelector::new(4)),
            1,
            4,
            2,
            1,
            false,
            false,
        )
        .unwrap();
        for i in 0..4 {
            cache.add(&transition(i as f32)).unwrap();
        }
        cache.add(&transition(4.0)).unwrap();
        assert_eq!(cache.capacity(), 4);

        // Survivors keep their relative order, the new transition is newest
        let rs = rewards(&cache.sample().unwrap());
        assert_eq!(rs.len(), 4);
        assert_eq!(rs[3], 4.0);
        assert!(rs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_eviction_at_floor() {
        let mut cache = fifo_fifo(1, 3, 3);
        for i in 0..3 {
            cache.add(&transition(i as f32)).unwrap();
        }
        assert_eq!(
            cache.add(&transition(3.0)),
            Err(ReplayError::EvictionAtFloor {
                capacity: 3,
                min_capacity: 3
            })
        );
        assert_eq!(cache.capacity(), 3);
        assert_eq!(rewards(&cache.sample().unwrap()), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_size_mismatch_leaves_state() {
        let mut cache = fifo_fifo(1, 1, 2);
        cache.add(&transition(0.0)).unwrap();
        let mut tr = transition(1.0);
        tr.state.push(0.0);
        assert!(matches!(
            cache.add(&tr),
            Err(ReplayError::SizeMismatch { field: "state", .. })
        ));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.free.len(), 1);
        assert_eq!(cache.sample_from(), vec![0]);
    }

    #[test]
    fn test_reject_sampler_registered_as_remover() {
        let mut sampler = FifoSelector::new(1);
        sampler.register_as_remover();
        let res = GeneralCache::new(
            Box::new(FifoSelector::new(1)),
            Box::new(sampler),
            1,
            2,
            2,
            1,
            false,
            false,
        );
        assert!(matches!(res, Err(ReplayError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_get_and_sum_rewards() {
        let mut cache = fifo_fifo(1, 1, 3);
        assert_eq!(cache.get(0), None);
        cache.add(&transition(1.0)).unwrap();
        cache.add(&transition(2.0)).unwrap();
        assert_eq!(cache.get(1), Some(transition(2.0)));
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(100), None);
        assert_eq!(cache.sum_rewards(), 3.0);
    }

    #[test]
    fn test_reject_zero_batch_size() {
        let new = |remove_size: usize, sample_size: usize| {
            GeneralCache::new(
                Box::new(FifoSelector::new(remove_size)),
                Box::new(UniformSelector::new(sample_size, 0)),
                1,
                2,
                2,
                1,
                false,
                false,
            )
        };
        assert!(matches!(new(0, 1), Err(ReplayError::InvalidConfiguration(_))));
        assert!(matches!(new(1, 0), Err(ReplayError::InvalidConfiguration(_))));
        assert!(new(1, 1).is_ok());
    }

    #[test]
    fn test_remover_choosing_nothing() {
        let mut cache = GeneralCache::new(
            Box::new(NoneSelector(false)),
            Box::new(FifoSelector::new(2)),
            1,
            2,
            2,
            1,
            false,
            false,
        )
        .unwrap();
        cache.add(&transition(0.0)).unwrap();
        cache.add(&transition(1.0)).unwrap();

        assert!(matches!(
            cache.add(&transition(2.0)),
            Err(ReplayError::InvalidConfiguration(_))
        ));
        assert_eq!(cache.capacity(), 2);
        assert_eq!(rewards(&cache.sample().unwrap()), vec![0.0, 1.0]);
    }
}
