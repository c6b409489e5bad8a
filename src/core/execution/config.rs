//! Configuration for simulation execution
//!
//! Controls how a single engine runs (seed, output recording, step guard) and
//! how batches of independent replications are scheduled across threads.

use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes for replication batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    Sequential,
    /// Replications run concurrently on a Rayon thread pool
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// Configuration for simulation execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Master seed; each component's random stream is derived from it
    pub seed: u64,
    /// Keep every emitted output in an in-memory trace
    pub record_outputs: bool,
    /// Upper bound on steps for `run()`, guarding against endless zero-time loops
    pub max_steps: Option<u64>,
    /// The concurrency mode to use for replication batches
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel replications
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    pub fn new() -> Self {
        Self {
            seed: 42,
            record_outputs: false,
            max_steps: Some(1_000_000),
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_output_recording(mut self, enabled: bool) -> Self {
        self.record_outputs = enabled;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the concurrency mode for replication batches
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel replications
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
