//! Neural network brains for creatures.
//!
//! A [`NeuralBrain`] owns a fixed-topology feed-forward network and implements the
//! genetic operators (clone, mutate, crossover) on top of the [`Network`] capability
//! trait. The default backend is the `ndarray` [`MlpNetwork`].

use ndarray::{Array1, Array2, Zip};
use rand::Rng;
use tracing::error;

use super::error::BrainError;

pub mod mlp;
pub mod network;

pub use mlp::{Mlp, MlpNetwork};
pub use network::Network;

/// Activation functions available to layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Rectified linear unit.
    Relu,
    /// Logistic sigmoid, output in (0, 1).
    Sigmoid,
}

impl Activation {
    /// Applies the activation to a single value.
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// Topology of a brain.
#[derive(Debug, Clone, PartialEq)]
pub struct BrainConfig {
    /// Length of the input vector.
    pub input_size: usize,
    /// Length of the output vector.
    pub output_size: usize,
    /// Width of each hidden layer, in order.
    pub hidden_layers: Vec<usize>,
    /// Activation used on hidden layers.
    pub hidden_activation: Activation,
    /// Activation used on the output layer.
    pub output_activation: Activation,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            input_size: 8,
            output_size: 3,
            hidden_layers: vec![16, 8],
            hidden_activation: Activation::Relu,
            output_activation: Activation::Sigmoid,
        }
    }
}

impl BrainConfig {
    /// All layer widths from input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.input_size);
        sizes.extend(&self.hidden_layers);
        sizes.push(self.output_size);
        sizes
    }

    /// Checks that every layer has at least one unit.
    pub fn validate(&self) -> Result<(), BrainError> {
        if self.layer_sizes().contains(&0) {
            return Err(BrainError::InvalidTopology(format!(
                "layer sizes must be non-zero, got {:?}",
                self.layer_sizes()
            )));
        }
        Ok(())
    }
}

/// Tensors of a single dense layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerWeights {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl LayerWeights {
    /// Number of scalar parameters in the layer.
    pub fn len(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Whether the layer holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every parameter, weights first.
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.weights.iter().chain(self.biases.iter())
    }

    /// Perturbs each parameter with probability `rate` by `uniform(-amount, amount)`.
    pub fn mutate(&mut self, rate: f32, amount: f32) {
        let mut rng = rand::rng();
        self.weights
            .mapv_inplace(|w| perturb(w, rate, amount, &mut rng));
        self.biases
            .mapv_inplace(|b| perturb(b, rate, amount, &mut rng));
    }

    /// Picks each parameter from `other` with probability `rate`, else from `self`.
    pub fn crossover(&self, other: &Self, layer: usize, rate: f32) -> Result<Self, BrainError> {
        if self.weights.dim() != other.weights.dim() || self.biases.len() != other.biases.len() {
            return Err(BrainError::LayerShapeMismatch {
                layer,
                expected: self.weights.dim(),
                actual: other.weights.dim(),
            });
        }

        let mut rng = rand::rng();
        let mut pick = |a: &f32, b: &f32| if rng.random::<f32>() < rate { *b } else { *a };
        Ok(Self {
            weights: Zip::from(&self.weights)
                .and(&other.weights)
                .map_collect(&mut pick),
            biases: Zip::from(&self.biases)
                .and(&other.biases)
                .map_collect(&mut pick),
        })
    }
}

fn perturb(value: f32, rate: f32, amount: f32, rng: &mut impl Rng) -> f32 {
    if rng.random::<f32>() < rate {
        let amount = amount.abs();
        value + rng.random_range(-amount..=amount)
    } else {
        value
    }
}

enum BrainState<N> {
    Uninitialized,
    Ready(N),
    Disposed,
}

/// A fixed-topology feed-forward brain.
///
/// The brain starts uninitialised; [`NeuralBrain::init`] builds the network.
/// After [`NeuralBrain::dispose`] every operation fails with [`BrainError::Disposed`].
/// Genetic operators never modify `self`; they return new brains.
pub struct NeuralBrain<N: Network = MlpNetwork> {
    config: BrainConfig,
    state: BrainState<N>,
}

impl<N: Network> std::fmt::Debug for NeuralBrain<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            BrainState::Uninitialized => "uninitialized",
            BrainState::Ready(_) => "ready",
            BrainState::Disposed => "disposed",
        };
        f.debug_struct("NeuralBrain")
            .field("config", &self.config)
            .field("state", &state)
            .finish()
    }
}

impl<N: Network> NeuralBrain<N> {
    /// Creates an uninitialised brain.
    pub fn new(config: BrainConfig) -> Self {
        Self {
            config,
            state: BrainState::Uninitialized,
        }
    }

    /// Creates and initialises a brain with random weights.
    pub fn random(config: BrainConfig) -> Result<Self, BrainError> {
        let mut brain = Self::new(config);
        brain.init()?;
        Ok(brain)
    }

    /// Builds the network. Does nothing if already initialised.
    pub fn init(&mut self) -> Result<(), BrainError> {
        match self.state {
            BrainState::Ready(_) => Ok(()),
            BrainState::Disposed => Err(BrainError::Disposed),
            BrainState::Uninitialized => {
                self.config.validate()?;
                self.state = BrainState::Ready(N::build(&self.config)?);
                Ok(())
            }
        }
    }

    /// Whether `init` has completed and the brain is not disposed.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, BrainState::Ready(_))
    }

    /// Whether the brain has been disposed.
    pub fn is_disposed(&self) -> bool {
        matches!(self.state, BrainState::Disposed)
    }

    fn network(&self) -> Result<&N, BrainError> {
        match &self.state {
            BrainState::Ready(network) => Ok(network),
            BrainState::Uninitialized => Err(BrainError::NotInitialized),
            BrainState::Disposed => Err(BrainError::Disposed),
        }
    }

    fn network_mut(&mut self) -> Result<&mut N, BrainError> {
        match &mut self.state {
            BrainState::Ready(network) => Ok(network),
            BrainState::Uninitialized => Err(BrainError::NotInitialized),
            BrainState::Disposed => Err(BrainError::Disposed),
        }
    }

    /// Runs the network on `inputs`.
    ///
    /// Lifecycle errors (disposed, uninitialised) are returned. A failure inside the
    /// forward pass is logged and yields a zero vector instead.
    pub fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>, BrainError> {
        let network = self.network()?;
        match network.forward(&Array1::from(inputs.to_vec())) {
            Ok(outputs) => Ok(outputs.to_vec()),
            Err(e) => {
                error!(error = %e, "prediction failed, falling back to zero output");
                Ok(vec![0.0; self.config.output_size])
            }
        }
    }

    /// Copies out the weights of every layer.
    pub fn weights(&self) -> Result<Vec<LayerWeights>, BrainError> {
        Ok(self.network()?.weights())
    }

    /// Replaces the weights of every layer.
    pub fn set_weights(&mut self, weights: Vec<LayerWeights>) -> Result<(), BrainError> {
        self.network_mut()?.set_weights(weights)
    }

    /// Total number of scalar parameters.
    pub fn parameter_count(&self) -> Result<usize, BrainError> {
        Ok(self.weights()?.iter().map(LayerWeights::len).sum())
    }

    fn with_weights(&self, weights: Vec<LayerWeights>) -> Result<Self, BrainError> {
        let mut brain = Self::random(self.config.clone())?;
        brain.set_weights(weights)?;
        Ok(brain)
    }

    /// Returns an independent brain with identical weights.
    pub fn try_clone(&self) -> Result<Self, BrainError> {
        self.with_weights(self.weights()?)
    }

    /// Returns a mutated copy.
    pub fn mutate(&self, rate: f32, amount: f32) -> Result<Self, BrainError> {
        let mut weights = self.weights()?;
        for layer in &mut weights {
            layer.mutate(rate, amount);
        }
        self.with_weights(weights)
    }

    /// Returns a child mixing `self` and `other`, then mutated.
    pub fn crossover(
        &self,
        other: &Self,
        crossover_rate: f32,
        mutation_rate: f32,
        mutation_amount: f32,
    ) -> Result<Self, BrainError> {
        let ours = self.weights()?;
        let theirs = other.weights()?;
        if ours.len() != theirs.len() {
            return Err(BrainError::ShapeMismatch {
                expected: ours.len(),
                actual: theirs.len(),
            });
        }

        let mut child = ours
            .iter()
            .zip(&theirs)
            .enumerate()
            .map(|(i, (a, b))| a.crossover(b, i, crossover_rate))
            .collect::<Result<Vec<_>, _>>()?;
        for layer in &mut child {
            layer.mutate(mutation_rate, mutation_amount);
        }
        self.with_weights(child)
    }

    /// Releases the network. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.state = BrainState::Disposed;
    }
}
