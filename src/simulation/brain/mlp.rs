//! Multi-layer perceptron backend built on `ndarray`.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

use super::network::Network;
use super::{Activation, BrainConfig, LayerWeights};
use crate::simulation::error::BrainError;

/// A single dense layer.
#[derive(Debug, Clone)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
    /// Activation applied after the affine transform.
    pub activation: Activation,
}

impl Mlp {
    /// Creates a layer with Glorot-uniform weights and zero biases.
    pub fn new_random(input_size: usize, output_size: usize, activation: Activation) -> Self {
        let limit = (6.0 / (input_size + output_size) as f32).sqrt();
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-limit, limit)),
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    /// Performs the forward pass for this layer.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;

        let activation = self.activation;
        output.mapv_inplace(|x| activation.apply(x));
        output
    }

    fn shape(&self) -> (usize, usize) {
        self.weights.dim()
    }
}

/// Dense feed-forward network: ReLU (or the configured activation) on hidden layers,
/// the output activation on the last one.
#[derive(Debug, Clone)]
pub struct MlpNetwork {
    layers: Vec<Mlp>,
    input_size: usize,
}

impl Network for MlpNetwork {
    fn build(config: &BrainConfig) -> Result<Self, BrainError> {
        config.validate()?;
        let sizes = config.layer_sizes();
        let last = sizes.len() - 2;
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let activation = if i == last {
                    config.output_activation
                } else {
                    config.hidden_activation
                };
                Mlp::new_random(pair[0], pair[1], activation)
            })
            .collect();

        Ok(Self {
            layers,
            input_size: config.input_size,
        })
    }

    fn forward(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, BrainError> {
        if inputs.len() != self.input_size {
            return Err(BrainError::InputSize {
                expected: self.input_size,
                actual: inputs.len(),
            });
        }

        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }

        if output.iter().all(|v| v.is_finite()) {
            Ok(output)
        } else {
            Err(BrainError::NonFiniteOutput)
        }
    }

    fn weights(&self) -> Vec<LayerWeights> {
        self.layers
            .iter()
            .map(|layer| LayerWeights {
                weights: layer.weights.clone(),
                biases: layer.biases.clone(),
            })
            .collect()
    }

    fn set_weights(&mut self, weights: Vec<LayerWeights>) -> Result<(), BrainError> {
        if weights.len() != self.layers.len() {
            return Err(BrainError::ShapeMismatch {
                expected: self.layers.len(),
                actual: weights.len(),
            });
        }

        for (i, (layer, incoming)) in self.layers.iter().zip(&weights).enumerate() {
            let expected = layer.shape();
            let actual = incoming.weights.dim();
            if expected != actual {
                return Err(BrainError::LayerShapeMismatch {
                    layer: i,
                    expected,
                    actual,
                });
            }
            if incoming.biases.len() != expected.0 {
                return Err(BrainError::LayerShapeMismatch {
                    layer: i,
                    expected,
                    actual: (incoming.biases.len(), actual.1),
                });
            }
        }

        for (layer, incoming) in self.layers.iter_mut().zip(weights) {
            layer.weights = incoming.weights;
            layer.biases = incoming.biases;
        }
        Ok(())
    }
}
