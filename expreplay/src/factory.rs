//! Construction of replay buffers from a configuration.
use crate::{
    selector::build_selector, FifoRingCache, GeneralCache, OnlineCache, ReplayBufferBase,
    ReplayBufferConfig, ReplayError, SelectorKind, Transition, TransitionBatch,
};
use log::debug;

/// A replay buffer of the implementation chosen from its configuration.
pub enum ReplayBuffer {
    /// Single transition, `min_replay_capacity == max_replay_capacity == 1`.
    Online(OnlineCache),

    /// FIFO eviction of one transition per add.
    FifoRing(FifoRingCache),

    /// Any other combination of remover and sampler.
    General(GeneralCache),
}

impl ReplayBuffer {
    /// Builds a replay buffer.
    ///
    /// The configuration is validated first: `min_replay_capacity` must be
    /// positive, `max_replay_capacity` at least 1 and not smaller than
    /// `sample_size` nor `min_replay_capacity`, and batch and feature sizes
    /// positive. The implementation is then chosen in this order:
    ///
    /// 1. [`OnlineCache`] if `min_replay_capacity == max_replay_capacity == 1`,
    /// 2. [`FifoRingCache`] if the remover is FIFO with `remove_size == 1`,
    /// 3. [`GeneralCache`] otherwise.
    pub fn build(config: &ReplayBufferConfig) -> Result<Self, ReplayError> {
        validate(config)?;

        let min = config.min_replay_capacity;
        let max = config.max_replay_capacity;
        let buffer = if min == 1 && max == 1 {
            Self::Online(OnlineCache::new(
                config.feature_size,
                config.action_size,
                config.include_next_action,
                config.remove_size,
                config.sample_size,
            ))
        } else if config.remove_method == SelectorKind::Fifo && config.remove_size == 1 {
            Self::FifoRing(FifoRingCache::new(
                build_selector(config.sample_method, config.sample_size, config.seed),
                min,
                max,
                config.feature_size,
                config.action_size,
                config.include_next_action,
                config.parallel_copy,
            )?)
        } else {
            // Remover and sampler draw from distinct random streams
            Self::General(GeneralCache::new(
                build_selector(config.remove_method, config.remove_size, config.seed),
                build_selector(
                    config.sample_method,
                    config.sample_size,
                    config.seed.wrapping_add(1),
                ),
                min,
                max,
                config.feature_size,
                config.action_size,
                config.include_next_action,
                config.parallel_copy,
            )?)
        };

        debug!(
            "Built {} replay buffer: capacity {}..={}, remover {:?}({}), sampler {:?}({})",
            buffer.kind_name(),
            min,
            max,
            config.remove_method,
            config.remove_size,
            config.sample_method,
            config.sample_size
        );

        Ok(buffer)
    }

    /// Returns the name of the implementation.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Online(_) => "online",
            Self::FifoRing(_) => "fifo_ring",
            Self::General(_) => "general",
        }
    }

    fn inner(&self) -> &dyn ReplayBufferBase {
        match self {
            Self::Online(b) => b,
            Self::FifoRing(b) => b,
            Self::General(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ReplayBufferBase {
        match self {
            Self::Online(b) => b,
            Self::FifoRing(b) => b,
            Self::General(b) => b,
        }
    }
}

impl ReplayBufferBase for ReplayBuffer {
    fn add(&mut self, tr: &Transition) -> Result<(), ReplayError> {
        self.inner_mut().add(tr)
    }

    fn sample(&mut self) -> Result<TransitionBatch, ReplayError> {
        self.inner_mut().sample()
    }

    fn capacity(&self) -> usize {
        self.inner().capacity()
    }

    fn max_capacity(&self) -> usize {
        self.inner().max_capacity()
    }

    fn min_capacity(&self) -> usize {
        self.inner().min_capacity()
    }

    fn batch_size(&self) -> usize {
        self.inner().batch_size()
    }

    fn sample_from(&self) -> Vec<usize> {
        self.inner().sample_from()
    }

    fn is_full(&self) -> bool {
        self.inner().is_full()
    }

    fn is_ready(&self) -> bool {
        self.inner().is_ready()
    }
}

/// Builds a replay buffer from positional arguments.
///
/// Equivalent to [`ReplayBuffer::build`] with the corresponding
/// [`ReplayBufferConfig`]; `parallel_copy` is left at its default `false`.
#[allow(clippy::too_many_arguments)]
pub fn create(
    remover: SelectorKind,
    sampler: SelectorKind,
    min_capacity: usize,
    max_capacity: usize,
    feature_size: usize,
    action_size: usize,
    remove_size: usize,
    sample_size: usize,
    seed: u64,
    include_next_action: bool,
) -> Result<ReplayBuffer, ReplayError> {
    let config = ReplayBufferConfig::default()
        .remove_method(remover)
        .sample_method(sampler)
        .min_replay_capacity(min_capacity)
        .max_replay_capacity(max_capacity)
        .feature_size(feature_size)
        .action_size(action_size)
        .remove_size(remove_size)
        .sample_size(sample_size)
        .seed(seed)
        .include_next_action(include_next_action);
    ReplayBuffer::build(&config)
}

fn validate(config: &ReplayBufferConfig) -> Result<(), ReplayError> {
    let min = config.min_replay_capacity;
    let max = config.max_replay_capacity;

    if min == 0 {
        return Err(ReplayError::invalid_config(
            "min_replay_capacity must be positive",
        ));
    }
    if max < 1 {
        return Err(ReplayError::invalid_config(
            "max_replay_capacity must be at least 1",
        ));
    }
    if max < config.sample_size {
        return Err(ReplayError::invalid_config(format!(
            "max_replay_capacity ({}) is smaller than sample_size ({})",
            max, config.sample_size
        )));
    }
    if min > max {
        return Err(ReplayError::invalid_config(format!(
            "min_replay_capacity ({}) exceeds max_replay_capacity ({})",
            min, max
        )));
    }
    if config.remove_size == 0 || config.sample_size == 0 {
        return Err(ReplayError::invalid_config(
            "remove_size and sample_size must be positive",
        ));
    }
    if config.feature_size == 0 {
        return Err(ReplayError::invalid_config("feature_size must be positive"));
    }

    Ok(())
}
