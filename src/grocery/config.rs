//! Store configuration
//!
//! Every parameter of the checkout network: lane layout, service times,
//! admission limits and the customer distributions used by the generator.
//! Missing JSON fields take their default values.

use crate::core::error::SimError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the packer does with an online order that arrives while it is busy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackerOverflow {
    /// Hold it in a FIFO queue and pack it next
    Queue,
    /// Discard it
    Drop,
}

impl Default for PackerOverflow {
    fn default() -> Self {
        PackerOverflow::Queue
    }
}

/// Half-open service time interval `[min, max)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceRange {
    pub min: f64,
    pub max: f64,
}

impl ServiceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        if !(self.min >= 0.0 && self.max >= self.min) || !self.max.is_finite() {
            return Err(SimError::Configuration(format!(
                "{} range [{}, {}) must satisfy 0 <= min <= max",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Distribution parameters for newly generated customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Mean inter-arrival time (exponential)
    pub arrival_mean: f64,
    pub travel_mean: f64,
    pub travel_std_dev: f64,
    /// Mean pack/search time (exponential)
    pub search_mean: f64,
    pub min_items: u32,
    pub max_items: u32,
    pub online_prob: f64,
    pub card_prob: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            arrival_mean: 60.0,
            travel_mean: 300.0,
            travel_std_dev: 60.0,
            search_mean: 120.0,
            min_items: 1,
            max_items: 40,
            online_prob: 0.30,
            card_prob: 0.70,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        for (name, mean) in [
            ("arrival_mean", self.arrival_mean),
            ("search_mean", self.search_mean),
        ] {
            if !(mean > 0.0 && mean.is_finite()) {
                return Err(SimError::Configuration(format!(
                    "{} must be positive, got {}",
                    name, mean
                )));
            }
        }
        if !(self.travel_std_dev >= 0.0 && self.travel_mean.is_finite()) {
            return Err(SimError::Configuration(format!(
                "travel distribution N({}, {}) is invalid",
                self.travel_mean, self.travel_std_dev
            )));
        }
        if self.min_items > self.max_items {
            return Err(SimError::Configuration(format!(
                "item range [{}, {}] is empty",
                self.min_items, self.max_items
            )));
        }
        for (name, p) in [("online_prob", self.online_prob), ("card_prob", self.card_prob)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

/// Configuration of the whole store network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Staffed lanes, numbered first
    pub cash_lanes: usize,
    /// Self-checkout lanes, numbered after the cash lanes
    pub self_lanes: usize,
    pub cash_time_per_item: f64,
    pub self_time_per_item: f64,
    /// Customers with at most this many items prefer self-checkout
    pub self_item_limit: u32,
    /// Per-lane occupancy cap enforced by the distributor
    pub max_queue: u32,
    pub card_payment: ServiceRange,
    pub cash_payment: ServiceRange,
    pub pack_time_per_item: f64,
    pub packer_overflow: PackerOverflow,
    pub generator: GeneratorConfig,
    pub seed: u64,
    /// Simulated seconds to run
    pub end_time: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cash_lanes: 3,
            self_lanes: 2,
            cash_time_per_item: 1.0,
            self_time_per_item: 0.8,
            self_item_limit: 15,
            max_queue: 2,
            card_payment: ServiceRange::new(5.0, 15.0),
            cash_payment: ServiceRange::new(30.0, 120.0),
            pack_time_per_item: 1.0,
            packer_overflow: PackerOverflow::default(),
            generator: GeneratorConfig::default(),
            seed: 42,
            end_time: 3600.0,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lanes(mut self, cash_lanes: usize, self_lanes: usize) -> Self {
        self.cash_lanes = cash_lanes;
        self.self_lanes = self_lanes;
        self
    }

    pub fn with_max_queue(mut self, max_queue: u32) -> Self {
        self.max_queue = max_queue;
        self
    }

    pub fn with_self_item_limit(mut self, limit: u32) -> Self {
        self.self_item_limit = limit;
        self
    }

    pub fn with_packer_overflow(mut self, overflow: PackerOverflow) -> Self {
        self.packer_overflow = overflow;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = end_time;
        self
    }

    /// Total number of lanes; lane ids run `0..total_lanes()`
    pub fn total_lanes(&self) -> usize {
        self.cash_lanes + self.self_lanes
    }

    /// Per-item service time of lane `lane_id`
    pub fn time_per_item(&self, lane_id: usize) -> f64 {
        if lane_id < self.cash_lanes {
            self.cash_time_per_item
        } else {
            self.self_time_per_item
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.total_lanes() == 0 {
            return Err(SimError::Configuration(
                "the store needs at least one lane".to_string(),
            ));
        }
        if self.max_queue == 0 {
            return Err(SimError::Configuration(
                "max_queue must be at least 1".to_string(),
            ));
        }
        for (name, t) in [
            ("cash_time_per_item", self.cash_time_per_item),
            ("self_time_per_item", self.self_time_per_item),
            ("pack_time_per_item", self.pack_time_per_item),
        ] {
            if !(t > 0.0 && t.is_finite()) {
                return Err(SimError::Configuration(format!(
                    "{} must be positive, got {}",
                    name, t
                )));
            }
        }
        self.card_payment.validate("card_payment")?;
        self.cash_payment.validate("cash_payment")?;
        if !(self.end_time >= 0.0) {
            return Err(SimError::Configuration(format!(
                "end_time must be non-negative, got {}",
                self.end_time
            )));
        }
        self.generator.validate()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
