//! Grocery checkout queueing network
//!
//! Walk-in customers go generator -> distributor -> lane -> payment ->
//! traveler -> sink. Online orders leave the distributor for the packer and
//! the curbside dispatcher. The distributor throttles the generator with
//! hold/ok pulses when every lane is at capacity.

pub mod config;
pub mod curbside;
pub mod customer;
pub mod distributor;
pub mod generator;
pub mod lane;
pub mod network;
pub mod packer;
pub mod payment;
pub mod phase;
pub mod replications;
pub mod sampling;
pub mod script;
pub mod sink;
pub mod traveler;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{GeneratorConfig, PackerOverflow, ServiceRange, StoreConfig};
pub use curbside::CurbsideDispatcher;
pub use customer::{CustomerData, PaymentMethod};
pub use distributor::{lane_port, Distributor, DistributorPhase};
pub use generator::{Generator, GeneratorPhase};
pub use lane::Lane;
pub use network::{GroceryStore, PickupSystem};
pub use packer::Packer;
pub use payment::PaymentProcessor;
pub use phase::Phase;
pub use replications::{run_replications, run_store, RunSummary};
pub use script::{load_customer_script, parse_customer_script, ScriptedSource};
pub use sink::CustomerSink;
pub use traveler::Traveler;
