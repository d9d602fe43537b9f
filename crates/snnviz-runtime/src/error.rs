//! Error types for the snnviz runtime

use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors that can occur in the snnviz runtime
///
/// Numeric setters clamp instead of failing, so these only surface for
/// lookups of neurons that do not exist and for explicit validation of a
/// deserialized configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Invalid network configuration
    #[error("Invalid network configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for invalid configuration
        reason: String,
    },

    /// Neuron not found
    #[error("Neuron {neuron_id} not found (network has {len} neurons)")]
    NeuronNotFound {
        /// Neuron ID that was not found
        neuron_id: u32,
        /// Number of neurons in the current network
        len: usize,
    },

    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },
}

impl RuntimeError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a neuron-not-found error
    pub fn neuron_not_found(neuron_id: u32, len: usize) -> Self {
        Self::NeuronNotFound { neuron_id, len }
    }
}
