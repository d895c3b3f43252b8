//! Core functionalities.
mod batch;
mod replay_buffer;
mod transition;
pub use batch::TransitionBatch;
pub use replay_buffer::ReplayBufferBase;
pub use transition::Transition;
