//! Replay buffer implementations.
//!
//! All of them keep transitions in slot-indexed flat arrays allocated once at
//! construction.
mod fifo_ring;
mod general;
mod online;
mod order;
mod storage;
pub use fifo_ring::FifoRingCache;
pub use general::GeneralCache;
pub use online::OnlineCache;
pub use order::{InsertOrder, Iter};
pub(crate) use storage::SlotStorage;
