use std::collections::BTreeMap;
use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::events::Event;
use crate::core::values::traits::EventInputs;

/// Messages delivered to one component in one instant, grouped by input port
#[derive(Debug, Clone, Default)]
pub struct InputBag {
    inputs: BTreeMap<String, Vec<Event>>,
}

impl InputBag {
    /// Create a new empty bag
    pub fn new() -> Self {
        Self {
            inputs: BTreeMap::new(),
        }
    }

    /// Append a delivered event to a port's bag
    pub fn push_event(&mut self, port: &str, event: Event) {
        self.inputs.entry(port.to_string()).or_default().push(event);
    }

    /// Append a typed value with timestamp
    pub fn push<T: Send + Sync + Clone + 'static>(&mut self, port: &str, timestamp: SimulationTime, value: T) {
        self.push_event(port, Event::new(timestamp, value));
    }
}

impl EventInputs for InputBag {
    fn bag<T: 'static + Clone>(&self, port: &str) -> Result<Vec<T>, SimError> {
        self.events(port)
            .iter()
            .map(|event| event.get_payload::<T>().cloned())
            .collect()
    }

    fn events(&self, port: &str) -> &[Event] {
        self.inputs.get(port).map(Vec::as_slice).unwrap_or(&[])
    }

    fn has_input(&self, port: &str) -> bool {
        self.inputs.get(port).map_or(false, |bag| !bag.is_empty())
    }

    fn input_ports(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .filter(|(_, bag)| !bag.is_empty())
            .map(|(port, _)| port.as_str())
            .collect()
    }

    fn len(&self) -> usize {
        self.inputs.values().map(Vec::len).sum()
    }
}
