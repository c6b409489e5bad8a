use crate::core::builder::simulation_builder::ComponentInstance;
use crate::core::components::port_specs::{port_names, PortType};
use crate::core::error::SimError;

/// Port validation utilities for components
pub struct PortValidator;

impl PortValidator {
    /// Validate that a component has the specified output port
    pub fn validate_source_port(component: &ComponentInstance, port: &str) -> Result<(), SimError> {
        Self::validate_port(component, port, PortType::Output)
    }

    /// Validate that a component has the specified input port
    pub fn validate_target_port(component: &ComponentInstance, port: &str) -> Result<(), SimError> {
        Self::validate_port(component, port, PortType::Input)
    }

    fn validate_port(component: &ComponentInstance, port: &str, port_type: PortType) -> Result<(), SimError> {
        let has_port = component
            .ports
            .iter()
            .any(|spec| spec.name == port && spec.port_type == port_type);

        if !has_port {
            return Err(SimError::PortNotFound {
                component: component.id.id().to_string(),
                port: port.to_string(),
                valid: port_names(&component.ports, port_type),
            });
        }
        Ok(())
    }
}
