#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_arena::simulation::brain::{BrainConfig, LayerWeights, NeuralBrain};
use evo_arena::simulation::error::BrainError;
use ndarray::{Array1, Array2};

fn config(hidden_layers: Vec<usize>) -> BrainConfig {
    BrainConfig {
        hidden_layers,
        ..BrainConfig::default()
    }
}

fn flatten(weights: &[LayerWeights]) -> Vec<f32> {
    weights.iter().flat_map(|l| l.iter().copied()).collect()
}

#[test]
fn test_random_brain_predicts_unit_outputs() {
    let brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    assert!(brain.is_ready());

    let outputs = brain.predict(&[0.3, -0.2, 0.5, 0.0, 0.1, -0.4, 0.2, 1.0]).unwrap();
    assert_eq!(outputs.len(), 3);
    for value in outputs {
        assert!((0.0..=1.0).contains(&value), "sigmoid output out of range: {value}");
    }
}

#[test]
fn test_uninitialized_brain_reports_not_initialized() {
    let brain: NeuralBrain = NeuralBrain::new(BrainConfig::default());
    assert!(!brain.is_ready());
    assert_eq!(brain.predict(&[0.0; 8]), Err(BrainError::NotInitialized));
    assert_eq!(brain.weights().unwrap_err(), BrainError::NotInitialized);
}

#[test]
fn test_init_is_reentrant() {
    let mut brain: NeuralBrain = NeuralBrain::new(BrainConfig::default());
    brain.init().unwrap();
    let first = brain.weights().unwrap();
    brain.init().unwrap();
    assert_eq!(brain.weights().unwrap(), first);
}

#[test]
fn test_invalid_topology_is_rejected() {
    let result: Result<NeuralBrain, _> = NeuralBrain::random(config(vec![16, 0]));
    assert!(matches!(result, Err(BrainError::InvalidTopology(_))));
}

#[test]
fn test_disposed_brain_rejects_every_operation() {
    let mut brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let other: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let weights = brain.weights().unwrap();

    brain.dispose();
    assert!(brain.is_disposed());
    assert_eq!(brain.predict(&[0.0; 8]), Err(BrainError::Disposed));
    assert_eq!(brain.weights().unwrap_err(), BrainError::Disposed);
    assert_eq!(brain.set_weights(weights), Err(BrainError::Disposed));
    assert_eq!(brain.try_clone().unwrap_err(), BrainError::Disposed);
    assert_eq!(brain.mutate(0.1, 0.5).unwrap_err(), BrainError::Disposed);
    assert_eq!(
        brain.crossover(&other, 0.5, 0.1, 0.5).unwrap_err(),
        BrainError::Disposed
    );
    assert_eq!(
        other.crossover(&brain, 0.5, 0.1, 0.5).unwrap_err(),
        BrainError::Disposed
    );
    assert_eq!(brain.init(), Err(BrainError::Disposed));

    // second dispose is a no-op
    brain.dispose();
    assert!(brain.is_disposed());
}

#[test]
fn test_wrong_input_length_falls_back_to_zeros() {
    let brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    assert_eq!(brain.predict(&[1.0; 5]).unwrap(), vec![0.0; 3]);
}

#[test]
fn test_set_weights_layer_count_mismatch() {
    let mut brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let mut weights = brain.weights().unwrap();
    weights.pop();

    assert_eq!(
        brain.set_weights(weights),
        Err(BrainError::ShapeMismatch {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn test_set_weights_layer_shape_mismatch() {
    let mut brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let mut weights = brain.weights().unwrap();
    weights[1] = LayerWeights {
        weights: Array2::zeros((4, 4)),
        biases: Array1::zeros(4),
    };

    assert_eq!(
        brain.set_weights(weights),
        Err(BrainError::LayerShapeMismatch {
            layer: 1,
            expected: (8, 16),
            actual: (4, 4)
        })
    );
}

#[test]
fn test_set_weights_round_trips_and_changes_outputs() {
    let mut brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let mut weights = brain.weights().unwrap();
    for layer in &mut weights {
        layer.weights.fill(0.0);
        layer.biases.fill(0.0);
    }
    brain.set_weights(weights.clone()).unwrap();

    assert_eq!(brain.weights().unwrap(), weights);
    // all-zero network outputs sigmoid(0)
    assert_eq!(brain.predict(&[0.7; 8]).unwrap(), vec![0.5; 3]);
}

#[test]
fn test_try_clone_is_independent_copy() {
    let brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let mut copy = brain.try_clone().unwrap();
    assert_eq!(copy.weights().unwrap(), brain.weights().unwrap());

    copy.dispose();
    assert!(brain.is_ready());
}

#[test]
fn test_parameter_count() {
    let brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    // 8*16+16 + 16*8+8 + 8*3+3
    assert_eq!(brain.parameter_count().unwrap(), 307);
}

#[test]
fn test_mutation_fraction_matches_rate() {
    let brain: NeuralBrain = NeuralBrain::random(config(vec![64, 64])).unwrap();
    let mutated = brain.mutate(0.3, 0.5).unwrap();

    let before = flatten(&brain.weights().unwrap());
    let after = flatten(&mutated.weights().unwrap());
    assert_eq!(before.len(), after.len());

    let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
    let fraction = changed as f32 / before.len() as f32;
    assert!(
        (fraction - 0.3).abs() < 0.03,
        "mutated fraction {fraction} too far from 0.3"
    );
}

#[test]
fn test_mutation_amount_bounds_change() {
    let brain: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let mutated = brain.mutate(1.0, 0.25).unwrap();

    let before = flatten(&brain.weights().unwrap());
    let after = flatten(&mutated.weights().unwrap());
    for (a, b) in before.iter().zip(&after) {
        assert!((a - b).abs() <= 0.25 + 1e-6);
    }
}

#[test]
fn test_crossover_rate_selects_parent() {
    let a: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let b: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();

    let like_a = a.crossover(&b, 0.0, 0.0, 0.5).unwrap();
    assert_eq!(like_a.weights().unwrap(), a.weights().unwrap());

    let like_b = a.crossover(&b, 1.0, 0.0, 0.5).unwrap();
    assert_eq!(like_b.weights().unwrap(), b.weights().unwrap());
}

#[test]
fn test_crossover_mixes_only_parent_values() {
    let a: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let b: NeuralBrain = NeuralBrain::random(BrainConfig::default()).unwrap();
    let child = a.crossover(&b, 0.5, 0.0, 0.5).unwrap();

    let wa = flatten(&a.weights().unwrap());
    let wb = flatten(&b.weights().unwrap());
    let wc = flatten(&child.weights().unwrap());
    for ((x, y), c) in wa.iter().zip(&wb).zip(&wc) {
        assert!(c == x || c == y);
    }
}

#[test]
fn test_crossover_topology_mismatch() {
    let a: NeuralBrain = NeuralBrain::random(config(vec![16, 8])).unwrap();
    let fewer_layers: NeuralBrain = NeuralBrain::random(config(vec![16])).unwrap();
    let narrower: NeuralBrain = NeuralBrain::random(config(vec![16, 4])).unwrap();

    assert_eq!(
        a.crossover(&fewer_layers, 0.5, 0.1, 0.5).unwrap_err(),
        BrainError::ShapeMismatch {
            expected: 3,
            actual: 2
        }
    );
    assert!(matches!(
        a.crossover(&narrower, 0.5, 0.1, 0.5),
        Err(BrainError::LayerShapeMismatch { layer: 1, .. })
    ));
}
