use crate::core::error::SimError;
use std::any::Any;

/// Trait for component state that allows dynamic downcasting.
/// This enables type-safe inspection of a running model's state.
pub trait ComponentState: Send {
    /// Returns a reference to the state as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to the state as Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send> ComponentState for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Helper function to safely downcast component state
pub fn downcast_state<T: 'static>(state: &dyn Any) -> Result<&T, SimError> {
    state.downcast_ref::<T>().ok_or(SimError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: "<component state>",
    })
}

/// Helper function to safely downcast mutable component state
pub fn downcast_state_mut<T: 'static>(state: &mut dyn Any) -> Result<&mut T, SimError> {
    state.downcast_mut::<T>().ok_or(SimError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: "<component state>",
    })
}
