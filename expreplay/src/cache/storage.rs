//! Slot-indexed flat storage of transitions.
use crate::{Transition, TransitionBatch};

/// Flat `f32` arrays holding one transition per slot.
///
/// Slot `i` owns `state[i * feature_size..(i + 1) * feature_size]`,
/// `action[i * action_size..(i + 1) * action_size]`, `reward[i]`,
/// `discount[i]` and the matching ranges of `next_state` and `next_action`.
///
/// With `parallel_copy`, the fields of a write or a gather are copied by
/// independent tasks of a [`rayon::scope`]; the call returns after all of
/// them completed.
pub(crate) struct SlotStorage {
    n_slots: usize,
    feature_size: usize,
    action_size: usize,
    include_next_action: bool,
    parallel_copy: bool,
    state: Vec<f32>,
    action: Vec<f32>,
    reward: Vec<f32>,
    discount: Vec<f32>,
    next_state: Vec<f32>,
    next_action: Vec<f32>,
}

impl SlotStorage {
    pub fn new(
        n_slots: usize,
        feature_size: usize,
        action_size: usize,
        include_next_action: bool,
        parallel_copy: bool,
    ) -> Self {
        let next_action_len = if include_next_action {
            n_slots * action_size
        } else {
            0
        };

        Self {
            n_slots,
            feature_size,
            action_size,
            include_next_action,
            parallel_copy,
            state: vec![0.; n_slots * feature_size],
            action: vec![0.; n_slots * action_size],
            reward: vec![0.; n_slots],
            discount: vec![0.; n_slots],
            next_state: vec![0.; n_slots * feature_size],
            next_action: vec![0.; next_action_len],
        }
    }

    pub fn feature_size(&self) -> usize {
        self.feature_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    pub fn include_next_action(&self) -> bool {
        self.include_next_action
    }

    /// Copies `tr` into `slot`.
    ///
    /// The sizes of `tr` must have been checked with
    /// [`Transition::check_sizes`] beforehand.
    pub fn write(&mut self, slot: usize, tr: &Transition) {
        debug_assert!(slot < self.n_slots);
        let (fs, as_) = (self.feature_size, self.action_size);
        self.reward[slot] = tr.reward;
        self.discount[slot] = tr.discount;

        let state = &mut self.state[slot * fs..(slot + 1) * fs];
        let action = &mut self.action[slot * as_..(slot + 1) * as_];
        let next_state = &mut self.next_state[slot * fs..(slot + 1) * fs];
        let next_action = match (self.include_next_action, &tr.next_action) {
            (true, Some(src)) => Some((&mut self.next_action[slot * as_..(slot + 1) * as_], src)),
            _ => None,
        };

        if self.parallel_copy {
            rayon::scope(|s| {
                s.spawn(move |_| state.copy_from_slice(&tr.state));
                s.spawn(move |_| action.copy_from_slice(&tr.action));
                s.spawn(move |_| next_state.copy_from_slice(&tr.next_state));
                if let Some((dst, src)) = next_action {
                    s.spawn(move |_| dst.copy_from_slice(src));
                }
            });
        } else {
            state.copy_from_slice(&tr.state);
            action.copy_from_slice(&tr.action);
            next_state.copy_from_slice(&tr.next_state);
            if let Some((dst, src)) = next_action {
                dst.copy_from_slice(src);
            }
        }
    }

    pub fn reward(&self, slot: usize) -> f32 {
        self.reward[slot]
    }

    /// Reads the transition stored in `slot`.
    pub fn read(&self, slot: usize) -> Transition {
        let (fs, as_) = (self.feature_size, self.action_size);
        let next_action = if self.include_next_action {
            Some(self.next_action[slot * as_..(slot + 1) * as_].to_vec())
        } else {
            None
        };

        Transition {
            state: self.state[slot * fs..(slot + 1) * fs].to_vec(),
            action: self.action[slot * as_..(slot + 1) * as_].to_vec(),
            reward: self.reward[slot],
            discount: self.discount[slot],
            next_state: self.next_state[slot * fs..(slot + 1) * fs].to_vec(),
            next_action,
        }
    }

    /// Gathers the transitions in `ixs` into a batch, in the order of `ixs`.
    pub fn gather(&self, ixs: &[usize]) -> TransitionBatch {
        let (fs, as_) = (self.feature_size, self.action_size);

        let (state, action, next_state, next_action, reward, discount) = if self.parallel_copy {
            let (mut state, mut action, mut next_state, mut next_action) =
                (vec![], vec![], vec![], vec![]);
            let (mut reward, mut discount) = (vec![], vec![]);
            rayon::scope(|s| {
                s.spawn(|_| state = gather_rows(&self.state, ixs, fs));
                s.spawn(|_| action = gather_rows(&self.action, ixs, as_));
                s.spawn(|_| next_state = gather_rows(&self.next_state, ixs, fs));
                if self.include_next_action {
                    s.spawn(|_| next_action = gather_rows(&self.next_action, ixs, as_));
                }
                s.spawn(|_| {
                    reward = gather_rows(&self.reward, ixs, 1);
                    discount = gather_rows(&self.discount, ixs, 1);
                });
            });
            (state, action, next_state, next_action, reward, discount)
        } else {
            let next_action = if self.include_next_action {
                gather_rows(&self.next_action, ixs, as_)
            } else {
                vec![]
            };
            (
                gather_rows(&self.state, ixs, fs),
                gather_rows(&self.action, ixs, as_),
                gather_rows(&self.next_state, ixs, fs),
                next_action,
                gather_rows(&self.reward, ixs, 1),
                gather_rows(&self.discount, ixs, 1),
            )
        };

        TransitionBatch {
            state,
            action,
            reward,
            discount,
            next_state,
            next_action,
            ix_sample: ixs.to_vec(),
            feature_size: fs,
            action_size: as_,
        }
    }
}

#[inline]
fn gather_rows(src: &[f32], ixs: &[usize], width: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(ixs.len() * width);
    for &ix in ixs {
        out.extend_from_slice(&src[ix * width..(ix + 1) * width]);
    }
    out
}
