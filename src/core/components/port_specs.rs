/// Port specification for component inputs and outputs
#[derive(Debug, Clone, PartialEq)]
pub struct PortSpec {
    /// Port name
    pub name: String,
    /// Port type (input or output)
    pub port_type: PortType,
    /// Optional description for documentation
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    Input,
    Output,
}

impl PortSpec {
    /// Create a new input port
    pub fn input(name: &str) -> Self {
        Self {
            name: name.to_string(),
            port_type: PortType::Input,
            description: None,
        }
    }

    /// Create a new output port
    pub fn output(name: &str) -> Self {
        Self {
            name: name.to_string(),
            port_type: PortType::Output,
            description: None,
        }
    }

    /// Add a description to this port
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn is_input(&self) -> bool {
        self.port_type == PortType::Input
    }

    pub fn is_output(&self) -> bool {
        self.port_type == PortType::Output
    }
}

/// Names of the ports of the given type, in declaration order
pub fn port_names(ports: &[PortSpec], port_type: PortType) -> Vec<String> {
    ports
        .iter()
        .filter(|p| p.port_type == port_type)
        .map(|p| p.name.clone())
        .collect()
}
