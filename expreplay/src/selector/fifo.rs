//! FIFO selector.
use super::{Selector, SelectorKind, SlotView};

/// Chooses the oldest slots, oldest first.
///
/// If fewer than `batch_size` slots are occupied, only the occupied slots are
/// returned; the result is never padded. When registered as a remover, every
/// chosen slot is also popped from the front of the insertion-order ledger.
pub struct FifoSelector {
    batch_size: usize,
    is_remover: bool,
}

impl FifoSelector {
    /// Creates a FIFO selector choosing up to `batch_size` slots per call.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            is_remover: false,
        }
    }
}

impl Selector for FifoSelector {
    fn choose(&mut self, view: &mut SlotView<'_>) -> Vec<usize> {
        if !self.is_remover {
            return view.oldest(self.batch_size);
        }

        let n = self.batch_size.min(view.len());
        let mut ixs = Vec::with_capacity(n);
        for _ in 0..n {
            match view.pop_oldest() {
                Some(ix) => ixs.push(ix),
                None => break,
            }
        }
        ixs
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn register_as_remover(&mut self) {
        self.is_remover = true;
    }

    fn is_remover(&self) -> bool {
        self.is_remover
    }

    fn kind(&self) -> SelectorKind {
        SelectorKind::Fifo
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cache::InsertOrder;

    fn ledger(slots: &[usize]) -> InsertOrder {
        let mut order = InsertOrder::new(8);
        slots.iter().for_each(|&ix| order.push_back(ix));
        order
    }

    #[test]
    fn test_fifo_sampler_keeps_ledger() {
        let in_use = vec![5, 2, 7];
        let mut order = ledger(&[2, 7, 5]);
        let mut sel = FifoSelector::new(2);

        let ixs = sel.choose(&mut SlotView::ledger(&in_use, &mut order));
        assert_eq!(ixs, vec![2, 7]);
        let ixs = sel.choose(&mut SlotView::ledger(&in_use, &mut order));
        assert_eq!(ixs, vec![2, 7]);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_fifo_sampler_degraded_batch() {
        let in_use = vec![4];
        let mut order = ledger(&[4]);
        let mut sel = FifoSelector::new(3);
        let ixs = sel.choose(&mut SlotView::ledger(&in_use, &mut order));
        assert_eq!(ixs, vec![4]);
    }

    #[test]
    fn test_fifo_remover_pops_ledger() {
        let in_use = vec![5, 2, 7];
        let mut order = ledger(&[2, 7, 5]);
        let mut sel = FifoSelector::new(2);
        sel.register_as_remover();

        let ixs = sel.choose(&mut SlotView::ledger(&in_use, &mut order));
        assert_eq!(ixs, vec![2, 7]);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_fifo_ring() {
        let mut sel = FifoSelector::new(3);
        let ixs = sel.choose(&mut SlotView::ring(1, 4, 4));
        assert_eq!(ixs, vec![1, 2, 3]);
    }
}
