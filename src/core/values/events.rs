use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::typed_value::TypedValue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global event ID counter for unique event identification
static EVENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique event ID
fn next_event_id() -> u64 {
    EVENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Message crossing a coupling: the instant it was emitted plus a typed payload
#[derive(Debug, Clone)]
pub struct Event {
    pub event_id: u64,
    pub timestamp: SimulationTime,
    pub payload: TypedValue,
}

impl Event {
    /// Create a new event with an auto-generated ID
    pub fn new<T: Send + Sync + Clone + 'static>(timestamp: SimulationTime, payload: T) -> Self {
        Self {
            event_id: next_event_id(),
            timestamp,
            payload: TypedValue::new(payload),
        }
    }

    /// Get the payload as a specific type
    pub fn get_payload<T: 'static>(&self) -> Result<&T, SimError> {
        self.payload.get::<T>()
    }

    /// Extract the payload as a specific type
    pub fn into_payload<T: 'static>(self) -> Result<T, SimError> {
        self.payload.into_inner::<T>()
    }
}
