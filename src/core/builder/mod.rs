pub mod simulation_builder;

pub use simulation_builder::{ComponentInstance, Simulation};
