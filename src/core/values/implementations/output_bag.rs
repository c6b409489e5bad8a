use std::collections::{BTreeMap, BTreeSet};
use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::events::Event;
use crate::core::values::traits::EventOutputs;

/// Outputs of one `output` call, validated against the declared output ports
pub struct OutputBag {
    outputs: BTreeMap<String, Vec<Event>>,
    expected_ports: BTreeSet<String>,
    timestamp: SimulationTime,
}

impl OutputBag {
    /// Create an output bag accepting only the given ports
    pub fn new<I, S>(expected_ports: I, timestamp: SimulationTime) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: BTreeMap::new(),
            expected_ports: expected_ports.into_iter().map(Into::into).collect(),
            timestamp,
        }
    }

    /// Create an output bag without port validation (accepts any port)
    pub fn new_flexible(timestamp: SimulationTime) -> Self {
        Self {
            outputs: BTreeMap::new(),
            expected_ports: BTreeSet::new(),
            timestamp,
        }
    }

    pub fn timestamp(&self) -> SimulationTime {
        self.timestamp
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.values().all(Vec::is_empty)
    }
}

impl EventOutputs for OutputBag {
    fn add<T: Send + Sync + Clone + 'static>(&mut self, port: &str, value: T) -> Result<(), SimError> {
        if !self.is_valid_port(port) {
            return Err(SimError::PortNotFound {
                component: String::from("<output>"),
                port: port.to_string(),
                valid: self.expected_ports.iter().cloned().collect(),
            });
        }

        self.outputs
            .entry(port.to_string())
            .or_default()
            .push(Event::new(self.timestamp, value));
        Ok(())
    }

    fn is_valid_port(&self, port: &str) -> bool {
        self.expected_ports.is_empty() || self.expected_ports.contains(port)
    }

    fn expected_ports(&self) -> Vec<&str> {
        self.expected_ports.iter().map(String::as_str).collect()
    }

    fn into_event_map(self) -> BTreeMap<String, Vec<Event>> {
        self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_accumulate_per_port() {
        let mut outputs = OutputBag::new(["out_free", "out_to_payment"], 5.0);
        assert!(outputs.is_empty());

        outputs.add("out_free", 1usize).unwrap();
        outputs.add("out_free", 2usize).unwrap();

        let event_map = outputs.into_event_map();
        let freed = &event_map["out_free"];
        assert_eq!(freed.len(), 2);
        assert_eq!(freed[0].timestamp, 5.0);
        assert_eq!(freed[1].get_payload::<usize>().unwrap(), &2);
    }

    #[test]
    fn test_unknown_port_rejected() {
        let mut outputs = OutputBag::new(["out_free"], 0.0);
        let result = outputs.add("out_bogus", true);
        assert!(matches!(result, Err(SimError::PortNotFound { .. })));
    }

    #[test]
    fn test_flexible_accepts_any_port() {
        let mut outputs = OutputBag::new_flexible(0.0);
        assert!(outputs.add("anything", 1u32).is_ok());
        assert!(outputs.expected_ports().is_empty());
    }
}
