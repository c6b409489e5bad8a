use super::events::Event;
use crate::core::error::SimError;
use std::collections::BTreeMap;

/// Read access to the bags delivered to a component in one instant
pub trait EventInputs {
    /// All payloads received on `port` this instant, in delivery order.
    /// A port with no messages yields an empty bag.
    fn bag<T: 'static + Clone>(&self, port: &str) -> Result<Vec<T>, SimError>;

    /// Raw events received on `port`
    fn events(&self, port: &str) -> &[Event];

    /// Check whether at least one message arrived on `port`
    fn has_input(&self, port: &str) -> bool;

    /// Ports that received at least one message
    fn input_ports(&self) -> Vec<&str>;

    /// Total number of messages across all ports
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collection of outputs produced by one `output` call
pub trait EventOutputs {
    /// Append a typed message to the bag of `port`
    fn add<T: Send + Sync + Clone + 'static>(&mut self, port: &str, value: T) -> Result<(), SimError>;

    /// Check if an output port is valid
    fn is_valid_port(&self, port: &str) -> bool;

    /// Get all expected output port names
    fn expected_ports(&self) -> Vec<&str>;

    /// Get the collected events (consumes self)
    fn into_event_map(self) -> BTreeMap<String, Vec<Event>>;
}
