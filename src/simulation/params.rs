use serde::{Deserialize, Serialize};
use std::path::Path;

use super::brain::{Activation, BrainConfig};
use super::creature::{DECISION_OUTPUTS, SENSE_INPUTS};
use super::error::ParamsError;

/// Simulation parameters that control arena, energy and evolution behavior.
///
/// Every field has a default, so configuration files only need to list overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Side length of the square toroidal arena.
    pub world_size: f32,
    /// Target population size, also the size of a freshly seeded world.
    pub initial_creatures: usize,
    /// Food items placed when the world is seeded.
    pub initial_food: usize,
    /// Maximum number of live food items.
    pub max_food: usize,
    /// Expected food spawns per second while below `max_food`.
    pub food_spawn_rate: f32,
    /// Energy granted by one food item.
    pub food_energy: f32,
    /// Energy cap of every creature.
    pub max_energy: f32,
    /// Energy of newly seeded creatures and offspring.
    pub initial_energy: f32,
    /// Body radius of creatures.
    pub creature_size: f32,
    /// Energy lost per second of life.
    pub energy_decay_rate: f32,
    /// Fraction of `max_energy` a creature needs before it can reproduce.
    pub min_energy_to_reproduce: f32,
    /// Per-weight probability of mutation in offspring.
    pub mutation_rate: f32,
    /// Maximum absolute change applied to a mutated weight.
    pub mutation_amount: f32,
    /// Per-weight probability of taking the mate's weight in crossover.
    pub crossover_rate: f32,
    /// Maximum wrap-aware distance between mates.
    pub reproduction_radius: f32,
    /// Per-second probability that an energetic creature seeks a mate.
    pub reproduction_chance: f32,
    /// Number of fittest creatures kept when a new generation starts.
    pub survivor_count: usize,
    /// Upper bound for a single tick's delta in seconds.
    pub max_tick_delta: f32,
    /// Seconds a dead creature stays visible before it is removed.
    pub corpse_fade_time: f32,
    /// Widths of the hidden layers of every brain.
    pub hidden_layers: Vec<usize>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_size: 50.0,
            initial_creatures: 20,
            initial_food: 50,
            max_food: 100,
            food_spawn_rate: 5.0,
            food_energy: 10.0,
            max_energy: 100.0,
            initial_energy: 50.0,
            creature_size: 0.5,
            energy_decay_rate: 2.0,
            min_energy_to_reproduce: 0.6,
            mutation_rate: 0.1,
            mutation_amount: 0.5,
            crossover_rate: 0.5,
            reproduction_radius: 3.0,
            reproduction_chance: 0.01,
            survivor_count: 5,
            max_tick_delta: 0.1,
            corpse_fade_time: 1.0,
            hidden_layers: vec![16, 8],
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file and validates them.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Brain topology derived from these parameters.
    pub fn brain_config(&self) -> BrainConfig {
        BrainConfig {
            input_size: SENSE_INPUTS,
            output_size: DECISION_OUTPUTS,
            hidden_layers: self.hidden_layers.clone(),
            hidden_activation: Activation::Relu,
            output_activation: Activation::Sigmoid,
        }
    }

    /// Population below which a new generation is started.
    pub fn population_floor(&self) -> f32 {
        self.initial_creatures as f32 / 3.0
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<(), ParamsError> {
        positive("world_size", self.world_size)?;
        positive("food_energy", self.food_energy)?;
        positive("max_energy", self.max_energy)?;
        positive("creature_size", self.creature_size)?;
        positive("max_tick_delta", self.max_tick_delta)?;
        non_negative("food_spawn_rate", self.food_spawn_rate)?;
        non_negative("energy_decay_rate", self.energy_decay_rate)?;
        non_negative("mutation_amount", self.mutation_amount)?;
        non_negative("reproduction_radius", self.reproduction_radius)?;
        non_negative("corpse_fade_time", self.corpse_fade_time)?;
        unit_interval("min_energy_to_reproduce", self.min_energy_to_reproduce)?;
        unit_interval("mutation_rate", self.mutation_rate)?;
        unit_interval("crossover_rate", self.crossover_rate)?;
        unit_interval("reproduction_chance", self.reproduction_chance)?;

        if self.initial_creatures == 0 {
            return Err(invalid("initial_creatures", "must be at least 1"));
        }
        if self.initial_food > self.max_food {
            return Err(invalid(
                "initial_food",
                format!("{} exceeds max_food {}", self.initial_food, self.max_food),
            ));
        }
        if !(self.initial_energy > 0.0 && self.initial_energy <= self.max_energy) {
            return Err(invalid(
                "initial_energy",
                format!("must be in (0, {}], got {}", self.max_energy, self.initial_energy),
            ));
        }
        if self.hidden_layers.is_empty() || self.hidden_layers.contains(&0) {
            return Err(invalid(
                "hidden_layers",
                format!("need non-zero widths, got {:?}", self.hidden_layers),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ParamsError {
    ParamsError::Invalid {
        name,
        reason: reason.into(),
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be positive, got {value}")))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be non-negative, got {value}")))
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(name, format!("must be in [0, 1], got {value}")))
    }
}
