//! Transition.
use crate::ReplayError;

/// A transition `(o_t, a_t, r_t, gamma_t, o_t+1, a_t+1)` emitted by one environment step.
///
/// Replay buffers copy the transition into their own storage, so the caller
/// may reuse or drop it right after [`add`](crate::ReplayBufferBase::add) returns.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation `o_t`.
    pub state: Vec<f32>,

    /// Action `a_t`.
    pub action: Vec<f32>,

    /// Reward `r_t`.
    pub reward: f32,

    /// Discount `gamma_t`, typically zero at the end of an episode.
    pub discount: f32,

    /// Next observation `o_t+1`.
    pub next_state: Vec<f32>,

    /// Next action `a_t+1`, used by on-policy targets such as Sarsa.
    pub next_action: Option<Vec<f32>>,
}

impl Transition {
    /// Constructs a transition without next action.
    pub fn new(
        state: Vec<f32>,
        action: Vec<f32>,
        reward: f32,
        discount: f32,
        next_state: Vec<f32>,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            discount,
            next_state,
            next_action: None,
        }
    }

    /// Sets the next action.
    pub fn next_action(mut self, next_action: Vec<f32>) -> Self {
        self.next_action = Some(next_action);
        self
    }

    /// Checks the lengths of the vectors against the layout of a buffer.
    ///
    /// `next_action` is only checked when `include_next_action` is `true`;
    /// otherwise it is ignored.
    pub(crate) fn check_sizes(
        &self,
        feature_size: usize,
        action_size: usize,
        include_next_action: bool,
    ) -> Result<(), ReplayError> {
        check_len("state", feature_size, self.state.len())?;
        check_len("action", action_size, self.action.len())?;
        check_len("next_state", feature_size, self.next_state.len())?;

        if include_next_action {
            let actual = self.next_action.as_ref().map_or(0, |a| a.len());
            check_len("next_action", action_size, actual)?;
        }

        Ok(())
    }
}

#[inline]
fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), ReplayError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ReplayError::SizeMismatch {
            field,
            expected,
            actual,
        })
    }
}
