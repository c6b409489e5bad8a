use crate::core::components::port_specs::PortSpec;
use crate::core::components::traits::AtomicModel;
use crate::core::connections::port_validator::PortValidator;
use crate::core::error::SimError;
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::simulation_engine::SimulationEngine;
use crate::core::types::{ComponentId, InputPort, OutputPort};
use std::collections::HashMap;

/// A model registered with the builder, together with its declared ports
pub struct ComponentInstance {
    pub id: ComponentId,
    pub ports: Vec<PortSpec>,
    pub model: Box<dyn AtomicModel>,
}

/// Imperative API for assembling a network of atomic models
///
/// Components are kept in insertion order; that order fixes the seed of each
/// component's random stream and the order in which simultaneous producers
/// fill a shared input bag.
pub struct Simulation {
    /// Created component instances, in insertion order
    components: Vec<ComponentInstance>,
    /// Raw id -> position in `components`
    index: HashMap<String, usize>,
    /// Couplings: output port -> input port
    connections: Vec<(OutputPort, InputPort)>,
    /// Counter for automatic ID generation
    id_counter: u64,
    config: SimulationConfig,
}

impl Simulation {
    /// Create a new simulation with the default engine configuration
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Create a new simulation with an explicit engine configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            components: Vec::new(),
            index: HashMap::new(),
            connections: Vec::new(),
            id_counter: 0,
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Add a component with an auto-generated `<Type><n>` id
    pub fn add_component<M: AtomicModel + 'static>(&mut self, model: M) -> ComponentId {
        loop {
            let id = format!("{}{}", model.model_name(), self.id_counter);
            self.id_counter += 1;
            if !self.index.contains_key(&id) {
                return self.insert(id, model);
            }
        }
    }

    /// Add a component under a caller-chosen id
    pub fn add_named_component<M: AtomicModel + 'static>(
        &mut self,
        name: &str,
        model: M,
    ) -> Result<ComponentId, SimError> {
        if self.index.contains_key(name) {
            return Err(SimError::DuplicateComponent(name.to_string()));
        }
        Ok(self.insert(name.to_string(), model))
    }

    fn insert<M: AtomicModel + 'static>(&mut self, id: String, model: M) -> ComponentId {
        let component_id = ComponentId::new(id.clone(), std::any::type_name::<M>().to_string());
        let instance = ComponentInstance {
            id: component_id.clone(),
            ports: model.define_ports(),
            model: Box::new(model),
        };

        self.index.insert(id, self.components.len());
        self.components.push(instance);
        component_id
    }

    /// Couple an output port to an input port.
    ///
    /// Fan-out (one output feeding several inputs) and fan-in (several outputs
    /// feeding one input) are both allowed; the same coupling twice is not.
    pub fn connect(&mut self, source: OutputPort, target: InputPort) -> Result<(), SimError> {
        let source_component = self.get_component(source.component_id())?;
        PortValidator::validate_source_port(source_component, source.port_name())?;

        let target_component = self.get_component(target.component_id())?;
        PortValidator::validate_target_port(target_component, target.port_name())?;

        if self
            .connections
            .iter()
            .any(|(s, t)| s == &source && t == &target)
        {
            return Err(SimError::DuplicateCoupling {
                source_port: format!("{}.{}", source.component_id(), source.port_name()),
                target_port: format!("{}.{}", target.component_id(), target.port_name()),
            });
        }

        self.connections.push((source, target));
        Ok(())
    }

    /// Build the simulation into a SimulationEngine
    pub fn build(self) -> Result<SimulationEngine, SimError> {
        self.validate_connections()?;
        SimulationEngine::new(self.components, self.connections, self.config)
    }

    /// Validate all connections
    fn validate_connections(&self) -> Result<(), SimError> {
        for (source, target) in &self.connections {
            let source_component = self.get_component(source.component_id())?;
            PortValidator::validate_source_port(source_component, source.port_name())?;

            let target_component = self.get_component(target.component_id())?;
            PortValidator::validate_target_port(target_component, target.port_name())?;
        }
        Ok(())
    }

    fn get_component(&self, id: &ComponentId) -> Result<&ComponentInstance, SimError> {
        self.index
            .get(id.id())
            .map(|&i| &self.components[i])
            .ok_or_else(|| SimError::ComponentNotFound(id.id().to_string()))
    }

    /// Get all component IDs, in insertion order
    pub fn component_ids(&self) -> Vec<&ComponentId> {
        self.components.iter().map(|c| &c.id).collect()
    }

    /// Check if component exists
    pub fn has_component(&self, id: &ComponentId) -> bool {
        self.index.contains_key(id.id())
    }

    /// Number of couplings declared so far
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
