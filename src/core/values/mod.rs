pub mod events;
pub mod typed_value;
pub mod traits;
pub mod implementations;

// Re-export all public types
pub use events::Event;
pub use typed_value::TypedValue;
pub use traits::{EventInputs, EventOutputs};
pub use implementations::{InputBag, OutputBag};
