//! Configuration of [`ReplayBuffer`](crate::ReplayBuffer).
use crate::SelectorKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayBuffer`](crate::ReplayBuffer).
///
/// # Examples
///
/// ```rust
/// use expreplay::{ReplayBufferConfig, SelectorKind};
///
/// let config = ReplayBufferConfig::default()
///     .feature_size(4)
///     .action_size(1)
///     .max_replay_capacity(10000)
///     .min_replay_capacity(500)
///     .sample_method(SelectorKind::Uniform)
///     .sample_size(32)
///     .seed(42);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayBufferConfig {
    /// Policy evicting transitions when the buffer is full.
    pub remove_method: SelectorKind,

    /// Policy choosing transitions to sample.
    pub sample_method: SelectorKind,

    /// Number of transitions evicted at once.
    pub remove_size: usize,

    /// Number of transitions per sampled batch.
    pub sample_size: usize,

    /// Maximum number of transitions stored.
    pub max_replay_capacity: usize,

    /// Number of transitions required before sampling, which is also the
    /// number of transitions eviction never goes below.
    pub min_replay_capacity: usize,

    /// Length of observation vectors.
    pub feature_size: usize,

    /// Length of action vectors.
    pub action_size: usize,

    /// Random seed of the selectors.
    pub seed: u64,

    /// If `true`, next actions are stored and returned.
    pub include_next_action: bool,

    /// If `true`, fields are copied by parallel tasks in `add` and `sample`.
    pub parallel_copy: bool,
}

impl Default for ReplayBufferConfig {
    fn default() -> Self {
        Self {
            remove_method: SelectorKind::Fifo,
            sample_method: SelectorKind::Uniform,
            remove_size: 1,
            sample_size: 1,
            max_replay_capacity: 10000,
            min_replay_capacity: 1,
            feature_size: 1,
            action_size: 1,
            seed: 42,
            include_next_action: false,
            parallel_copy: false,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the eviction policy.
    pub fn remove_method(mut self, v: SelectorKind) -> Self {
        self.remove_method = v;
        self
    }

    /// Sets the sampling policy.
    pub fn sample_method(mut self, v: SelectorKind) -> Self {
        self.sample_method = v;
        self
    }

    /// Sets the number of transitions evicted at once.
    pub fn remove_size(mut self, v: usize) -> Self {
        self.remove_size = v;
        self
    }

    /// Sets the batch size.
    pub fn sample_size(mut self, v: usize) -> Self {
        self.sample_size = v;
        self
    }

    /// Sets the maximum capacity.
    pub fn max_replay_capacity(mut self, v: usize) -> Self {
        self.max_replay_capacity = v;
        self
    }

    /// Sets the minimum capacity.
    pub fn min_replay_capacity(mut self, v: usize) -> Self {
        self.min_replay_capacity = v;
        self
    }

    /// Sets the length of observation vectors.
    pub fn feature_size(mut self, v: usize) -> Self {
        self.feature_size = v;
        self
    }

    /// Sets the length of action vectors.
    pub fn action_size(mut self, v: usize) -> Self {
        self.action_size = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets whether next actions are stored.
    pub fn include_next_action(mut self, v: bool) -> Self {
        self.include_next_action = v;
        self
    }

    /// Sets whether fields are copied in parallel.
    pub fn parallel_copy(mut self, v: bool) -> Self {
        self.parallel_copy = v;
        self
    }

    /// Constructs [`ReplayBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReplayBufferConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
