//! Uniform selector.
use super::{Selector, SelectorKind, SlotView};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Chooses slots uniformly at random, with replacement.
pub struct UniformSelector {
    batch_size: usize,
    rng: StdRng,
    is_remover: bool,
}

impl UniformSelector {
    /// Creates a uniform selector drawing `batch_size` slots per call.
    pub fn new(batch_size: usize, seed: u64) -> Self {
        Self {
            batch_size,
            rng: StdRng::seed_from_u64(seed),
            is_remover: false,
        }
    }
}

impl Selector for UniformSelector {
    fn choose(&mut self, view: &mut SlotView<'_>) -> Vec<usize> {
        let len = view.len();
        if len == 0 {
            return vec![];
        }

        (0..self.batch_size)
            .map(|_| view.slot(self.rng.gen_range(0..len)))
            .collect()
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
        SelectorKind::Uniform
    }
}
