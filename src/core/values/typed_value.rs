use crate::core::error::SimError;
use std::any::{Any, TypeId};

/// Type-erased but type-safe container for port messages
#[derive(Debug)]
pub struct TypedValue {
    data: Box<dyn Any + Send + Sync>,
    clone_fn: fn(&(dyn Any + Send + Sync)) -> Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    type_id: TypeId,
}

impl TypedValue {
    /// Create a new typed value
    pub fn new<T: Send + Sync + Clone + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            data: Box::new(value),
            clone_fn: |any| match any.downcast_ref::<T>() {
                Some(typed) => Box::new(typed.clone()),
                None => unreachable!("clone_fn is only ever paired with its own type"),
            },
        }
    }

    /// Get a reference to the contained value
    pub fn get<T: 'static>(&self) -> Result<&T, SimError> {
        self.data.downcast_ref::<T>().ok_or(SimError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: self.type_name,
        })
    }

    /// Consume the typed value and return the contained value
    pub fn into_inner<T: 'static>(self) -> Result<T, SimError> {
        let found = self.type_name;
        self.data
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| SimError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found,
            })
    }

    /// Get the type name of the contained value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the contained value is of type T
    pub fn is_type<T: 'static>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }
}

impl Clone for TypedValue {
    fn clone(&self) -> Self {
        Self {
            data: (self.clone_fn)(self.data.as_ref()),
            clone_fn: self.clone_fn,
            type_name: self.type_name,
            type_id: self.type_id,
        }
    }
}
