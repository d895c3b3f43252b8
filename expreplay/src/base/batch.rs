//! Batch of transitions.
use super::Transition;

/// A batch of transitions sampled from a replay buffer.
///
/// Each field is a flat array with the transitions laid out contiguously in
/// selection order: the `i`-th transition occupies
/// `state[i * feature_size..(i + 1) * feature_size]`, and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    /// Observations, `len() * feature_size` values.
    pub state: Vec<f32>,

    /// Actions, `len() * action_size` values.
    pub action: Vec<f32>,

    /// Rewards, `len()` values.
    pub reward: Vec<f32>,

    /// Discounts, `len()` values.
    pub discount: Vec<f32>,

    /// Next observations, `len() * feature_size` values.
    pub next_state: Vec<f32>,

    /// Next actions, `len() * action_size` values, or empty if the buffer does
    /// not track next actions.
    pub next_action: Vec<f32>,

    /// Slots the transitions were gathered from.
    pub ix_sample: Vec<usize>,

    pub(crate) feature_size: usize,
    pub(crate) action_size: usize,
}

impl TransitionBatch {
    /// Returns the number of transitions in the batch.
    ///
    /// A FIFO sampler asked for more transitions than the buffer holds returns
    /// a shorter batch, so this may be less than the configured batch size.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Unpacks the batch into `(o_t, a_t, r_t, gamma_t, o_t+1, a_t+1)`.
    pub fn unpack(self) -> (Vec<f32>, Vec<f32>, Vec<f32>, Vec<f32>, Vec<f32>, Vec<f32>) {
        (
            self.state,
            self.action,
            self.reward,
            self.discount,
            self.next_state,
            self.next_action,
        )
    }

    /// Returns the `i`-th transition in the batch, or `None` if out of range.
    pub fn transition(&self, i: usize) -> Option<Transition> {
        if i >= self.len() {
            return None;
        }
        let (fs, as_) = (self.feature_size, self.action_size);
        let next_action = if self.next_action.is_empty() {
            None
        } else {
            Some(self.next_action[i * as_..(i + 1) * as_].to_vec())
        };

        Some(Transition {
            state: self.state[i * fs..(i + 1) * fs].to_vec(),
            action: self.action[i * as_..(i + 1) * as_].to_vec(),
            reward: self.reward[i],
            discount: self.discount[i],
            next_state: self.next_state[i * fs..(i + 1) * fs].to_vec(),
            next_action,
        })
    }

    /// Returns an iterator over the transitions in the batch.
    pub fn iter(&self) -> impl Iterator<Item = Transition> + '_ {
        (0..self.len()).filter_map(move |i| self.transition(i))
    }
}
