pub mod config;
pub mod event_scheduler;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{ConcurrencyMode, SimulationConfig};
pub use event_scheduler::EventScheduler;
pub use simulation_engine::{OutputRecord, SimulationEngine, SimulationObserver};
