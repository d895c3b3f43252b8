//! Policies choosing slots to sample or evict.
//!
//! A [`Selector`] chooses slots of a replay buffer through a [`SlotView`].
//! The same selector types are used both for sampling and for eviction;
//! an instance used for eviction must be marked with
//! [`Selector::register_as_remover`]. A FIFO remover pops the insertion-order
//! ledger of the buffer for every slot it chooses, a FIFO sampler only reads it.
mod fifo;
mod uniform;
use crate::cache::InsertOrder;
pub use fifo::FifoSelector;
use serde::{Deserialize, Serialize};
pub use uniform::UniformSelector;

/// Kind of a [`Selector`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum SelectorKind {
    /// Uniform sampling with replacement.
    Uniform,

    /// First in, first out.
    Fifo,
}

/// A policy choosing slots of a replay buffer.
pub trait Selector: Send {
    /// Chooses slots from the occupied slots of `view`.
    fn choose(&mut self, view: &mut SlotView<'_>) -> Vec<usize>;

    /// Returns the number of slots requested per call of [`choose`](Self::choose).
    fn batch_size(&self) -> usize;

    /// Marks this instance as the eviction policy of a buffer.
    fn register_as_remover(&mut self);

    /// Returns `true` if [`register_as_remover`](Self::register_as_remover) has been called.
    fn is_remover(&self) -> bool;

    /// Returns the kind of the selector.
    fn kind(&self) -> SelectorKind;
}

/// Builds a selector of the given kind.
///
/// `seed` is used only by selectors drawing random numbers.
pub fn build_selector(kind: SelectorKind, batch_size: usize, seed: u64) -> Box<dyn Selector> {
    match kind {
        SelectorKind::Uniform => Box::new(UniformSelector::new(batch_size, seed)),
        SelectorKind::Fifo => Box::new(FifoSelector::new(batch_size)),
    }
}

enum ViewInner<'a> {
    /// Occupied slots tracked by an in-use list and an insertion-order ledger.
    Ledger {
        in_use: &'a [usize],
        order: &'a mut InsertOrder,
    },

    /// Occupied slots of a ring buffer, ordered implicitly by the write cursor.
    Ring {
        cursor: usize,
        len: usize,
        max_capacity: usize,
    },
}

/// A view of the occupied slots of a replay buffer, handed to [`Selector`]s.
pub struct SlotView<'a> {
    inner: ViewInner<'a>,
}

impl<'a> SlotView<'a> {
    pub(crate) fn ledger(in_use: &'a [usize], order: &'a mut InsertOrder) -> Self {
        debug_assert_eq!(in_use.len(), order.len());
        Self {
            inner: ViewInner::Ledger { in_use, order },
        }
    }

    /// Creates a view of a ring buffer of `max_capacity` slots holding `len`
    /// transitions, whose next write position is `cursor`.
    pub fn ring(cursor: usize, len: usize, max_capacity: usize) -> Self {
        debug_assert!(len <= max_capacity);
        Self {
            inner: ViewInner::Ring {
                cursor,
                len,
                max_capacity,
            },
        }
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        match &self.inner {
            ViewInner::Ledger { in_use, .. } => in_use.len(),
            ViewInner::Ring { len, .. } => *len,
        }
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `i`-th occupied slot in an arbitrary but stable order.
    ///
    /// `i` must be less than [`len`](Self::len).
    pub fn slot(&self, i: usize) -> usize {
        match &self.inner {
            ViewInner::Ledger { in_use, .. } => in_use[i],
            ViewInner::Ring {
                cursor,
                len,
                max_capacity,
            } => ring_slot(*cursor, *len, *max_capacity, i),
        }
    }

    /// Returns the `min(n, len())` oldest occupied slots, oldest first.
    pub fn oldest(&self, n: usize) -> Vec<usize> {
        match &self.inner {
            ViewInner::Ledger { order, .. } => order.iter().take(n).collect(),
            ViewInner::Ring {
                cursor,
                len,
                max_capacity,
            } => (0..n.min(*len))
                .map(|i| ring_slot(*cursor, *len, *max_capacity, i))
                .collect(),
        }
    }

    /// Pops the oldest slot from the insertion-order ledger.
    ///
    /// Ring views have no ledger, their oldest slot is overwritten by the next
    /// write, and `None` is returned.
    pub fn pop_oldest(&mut self) -> Option<usize> {
        match &mut self.inner {
            ViewInner::Ledger { order, .. } => order.pop_front(),
            ViewInner::Ring { .. } => None,
        }
    }
}

/// The `i`-th oldest slot of a ring buffer.
#[inline]
pub(crate) fn ring_slot(cursor: usize, len: usize, max_capacity: usize, i: usize) -> usize {
    if len < max_capacity {
        i
    } else {
        (cursor + i) % max_capacity
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ring_view_not_full() {
        let view = SlotView::ring(3, 3, 5);
        assert_eq!(view.len(), 3);
        assert_eq!(view.oldest(10), vec![0, 1, 2]);
        assert_eq!(view.slot(2), 2);
    }

    #[test]
    fn test_ring_view_full() {
        let mut view = SlotView::ring(2, 4, 4);
        assert_eq!(view.oldest(4), vec![2, 3, 0, 1]);
        assert_eq!(view.oldest(2), vec![2, 3]);
        assert_eq!(view.pop_oldest(), None);
    }

    #[test]
    fn test_ledger_view() {
        let mut order = InsertOrder::new(4);
        order.push_back(3);
        order.push_back(1);
        let in_use = vec![1, 3];
        let mut view = SlotView::ledger(&in_use, &mut order);
        assert_eq!(view.oldest(5), vec![3, 1]);
        assert_eq!(view.pop_oldest(), Some(3));
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_build_selector() {
        let mut sel = build_selector(SelectorKind::Fifo, 3, 0);
        assert_eq!(sel.kind(), SelectorKind::Fifo);
        assert_eq!(sel.batch_size(), 3);
        assert!(!sel.is_remover());
        sel.register_as_remover();
        assert!(sel.is_remover());

        let sel = build_selector(SelectorKind::Uniform, 7, 42);
        assert_eq!(sel.kind(), SelectorKind::Uniform);
        assert_eq!(sel.batch_size(), 7);
    }
}
