#![warn(missing_docs)]
//! Experience replay buffers for reinforcement learning.
//!
//! A replay buffer stores fixed-size transitions `(o_t, a_t, r_t, gamma_t, o_t+1, a_t+1)`
//! in slot-indexed flat `f32` arrays and returns flattened batches of them for
//! gradient updates. Which slots are evicted when the buffer is full and which
//! slots are sampled is decided by [`Selector`]s.
//!
//! Three implementations are provided and chosen by [`ReplayBuffer::build`]:
//!
//! * [`OnlineCache`] when `min_replay_capacity == max_replay_capacity == 1`,
//! * [`FifoRingCache`] when the remover is FIFO with a remove size of 1,
//! * [`GeneralCache`] otherwise.
//!
//! ```
//! use expreplay::{ReplayBuffer, ReplayBufferBase, ReplayBufferConfig, SelectorKind, Transition};
//!
//! let config = ReplayBufferConfig::default()
//!     .feature_size(3)
//!     .action_size(1)
//!     .max_replay_capacity(100)
//!     .min_replay_capacity(1)
//!     .remove_method(SelectorKind::Fifo)
//!     .sample_method(SelectorKind::Uniform)
//!     .sample_size(4);
//! let mut buffer = ReplayBuffer::build(&config).unwrap();
//!
//! let tr = Transition::new(vec![0.0, 1.0, 2.0], vec![1.0], 1.0, 0.99, vec![1.0, 2.0, 3.0]);
//! buffer.add(&tr).unwrap();
//!
//! let batch = buffer.sample().unwrap();
//! assert_eq!(batch.len(), 4);
//! ```
pub mod error;
pub mod selector;
pub mod cache;

mod base;
pub use base::{ReplayBufferBase, Transition, TransitionBatch};

mod config;
pub use config::ReplayBufferConfig;

mod factory;
pub use factory::{create, ReplayBuffer};

pub use cache::{FifoRingCache, GeneralCache, OnlineCache};
pub use error::ReplayError;
pub use selector::{FifoSelector, Selector, SelectorKind, SlotView, UniformSelector};
