//! Error types for the simulation host

use thiserror::Error;

/// Failures raised by the simulation host.
///
/// Routing and admission outcomes (dropped customers, ignored lane-freed
/// signals, clamped durations) are not errors and never surface here.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Component '{0}' is already registered")]
    DuplicateComponent(String),

    #[error("Port '{port}' not found on component '{component}'. Valid ports: {valid:?}")]
    PortNotFound {
        component: String,
        port: String,
        valid: Vec<String>,
    },

    #[error("Coupling {source_port} -> {target_port} already exists")]
    DuplicateCoupling {
        source_port: String,
        target_port: String,
    },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Component '{component}' returned invalid time advance {value}")]
    InvalidTimeAdvance { component: String, value: f64 },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Malformed record on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config decode error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
