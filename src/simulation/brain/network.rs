//! Capability interface for numeric backends.

use ndarray::Array1;

use super::{BrainConfig, LayerWeights};
use crate::simulation::error::BrainError;

/// A feed-forward network backend.
///
/// [`super::NeuralBrain`] manages lifecycle and genetic operators purely through
/// this trait, so the backend only has to build, run and expose its tensors.
pub trait Network: Sized {
    /// Builds a randomly initialised network for `config`.
    fn build(config: &BrainConfig) -> Result<Self, BrainError>;

    /// Runs a forward pass.
    fn forward(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, BrainError>;

    /// Copies out every layer's tensors, input layer first.
    fn weights(&self) -> Vec<LayerWeights>;

    /// Replaces every layer's tensors. Shapes must match exactly.
    fn set_weights(&mut self, weights: Vec<LayerWeights>) -> Result<(), BrainError>;
}
