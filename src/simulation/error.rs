//! Error types for the simulation core.

use thiserror::Error;

/// Errors raised by [`super::brain::NeuralBrain`] and its backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrainError {
    /// The brain was disposed and can no longer be used.
    #[error("brain has been disposed")]
    Disposed,

    /// `init` has not been called yet.
    #[error("brain is not initialized")]
    NotInitialized,

    /// Weight set has a different number of layers than the network.
    #[error("weight shape mismatch: expected {expected} layers, got {actual}")]
    ShapeMismatch {
        /// Layers in the network.
        expected: usize,
        /// Layers in the supplied weight set.
        actual: usize,
    },

    /// A single layer's tensors differ in shape from the network's.
    #[error("layer {layer} shape mismatch: expected {expected:?}, got {actual:?}")]
    LayerShapeMismatch {
        /// Index of the offending layer.
        layer: usize,
        /// `(outputs, inputs)` of the network layer.
        expected: (usize, usize),
        /// `(outputs, inputs)` of the supplied layer.
        actual: (usize, usize),
    },

    /// Input vector length differs from the configured input size.
    #[error("expected {expected} inputs, got {actual}")]
    InputSize {
        /// Configured input size.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// Output vector length differs from the configured output size.
    #[error("expected {expected} outputs, got {actual}")]
    OutputSize {
        /// Configured output size.
        expected: usize,
        /// Length of the produced vector.
        actual: usize,
    },

    /// The forward pass produced NaN or infinity.
    #[error("forward pass produced a non-finite value")]
    NonFiniteOutput,

    /// The topology cannot be built.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors raised while updating a single creature.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreatureError {
    /// The creature's brain failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Position or velocity became NaN or infinite.
    #[error("creature state became non-finite")]
    NonFiniteState,
}

/// Errors raised while loading or validating [`super::params::Params`].
#[derive(Error, Debug)]
pub enum ParamsError {
    /// A parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    Invalid {
        /// Field name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that prevent the simulation from being set up.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Configuration is unusable.
    #[error(transparent)]
    Params(#[from] ParamsError),

    /// A brain could not be constructed even from the default topology.
    #[error("brain construction failed: {0}")]
    Brain(#[from] BrainError),
}
