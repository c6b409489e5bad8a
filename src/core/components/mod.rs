pub mod state;
pub mod traits;
pub mod port_specs;

// Re-export commonly used types
pub use port_specs::{PortSpec, PortType};
pub use state::{downcast_state, downcast_state_mut, ComponentState};
pub use traits::{AtomicModel, TransitionContext};
