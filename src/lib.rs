pub mod core;
pub mod grocery;

// Re-export commonly used types
pub use crate::core::builder::Simulation;
pub use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
pub use crate::core::error::{SimError, SimResult};
pub use crate::core::execution::{SimulationConfig, SimulationEngine};
pub use crate::core::types::{ComponentId, InputPort, OutputPort, SimulationTime, PASSIVE};
pub use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
