//! # Evo Arena - Neuro-evolution in a Toroidal Arena
//!
//! A simulation of creatures with neural network brains that evolve through
//! mating and generational selection. Creatures sense the nearest food and
//! neighbour, steer and accelerate, eat, reproduce and die of starvation.
//!
//! ## Features
//!
//! - Feed-forward neural brains (ReLU hidden layers, sigmoid outputs)
//! - Per-weight crossover and random mutation
//! - Toroidal world with wrap-aware distances and collisions
//! - Event-driven food consumption against a per-tick snapshot
//! - Population regulation by generation advance from the fittest survivors
//! - Real-time visualization with macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::creature`] - Creature behavior and state
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::ecosystem`] - Main simulation logic
//! - [`simulation::controller`] - Frame-driven driver, pause and selection
//! - [`simulation::physics`] - Position integration and collisions
//! - [`simulation::events`] - Deferred state updates

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for creature brains.
    pub mod brain;
    /// Frame-driven driver with pause, stats and selection.
    pub mod controller;
    /// Creature behavior, state, and lifecycle.
    pub mod creature;
    /// Main ecosystem simulation.
    pub mod ecosystem;
    /// Error types for every simulation layer.
    pub mod error;
    /// Ring buffer of notable events for display.
    pub mod event_log;
    /// Event system for deferred state updates.
    pub mod events;
    /// Mating, brain construction and generation advances.
    pub mod evolution;
    /// Food items that creatures can consume.
    pub mod food;
    /// Trait for entities with a position and a body radius.
    pub mod locatable;
    /// Simulation parameters.
    pub mod params;
    /// Position integration and collision passes.
    pub mod physics;
    /// Aggregate statistics.
    pub mod stats;
    /// Toroidal world geometry.
    pub mod world;
}
