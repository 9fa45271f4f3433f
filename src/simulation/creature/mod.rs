//! Creature behavior, state, and lifecycle.
//!
//! Creatures have neural network brains, sense the nearest food and neighbour, and
//! turn the brain's outputs into steering, acceleration and reproduction intent.

mod sense;

pub use sense::{Sighting, Surroundings};

use rand::Rng;
use slotmap::new_key_type;
use tracing::warn;

use super::brain::NeuralBrain;
use super::error::{BrainError, CreatureError};
use super::food::FoodId;
use super::locatable::Locatable;
use super::params::Params;
use super::world::{Vector2, World};

new_key_type! {
    /// Stable handle for a creature in the ecosystem arena.
    pub struct CreatureId;
}

/// Length of the sensory input vector.
pub const SENSE_INPUTS: usize = 8;
/// Length of the brain's decision vector.
pub const DECISION_OUTPUTS: usize = 3;
/// Radians per second of full rotation signal.
pub const ROTATION_GAIN: f32 = 3.0;
/// Acceleration per second of full acceleration signal.
pub const ACCEL_GAIN: f32 = 10.0;
/// Velocity multiplier applied every tick.
pub const FRICTION: f32 = 0.98;
/// Speed cap.
pub const MAX_SPEED: f32 = 5.0;
/// Reproduction output above which a creature wants to mate.
pub const REPRODUCTION_INTENT_THRESHOLD: f32 = 0.8;
/// Energy multiplier paid when a creature decides to reproduce.
pub const REPRODUCTION_COST_FACTOR: f32 = 0.6;
/// Extra reach beyond the body radius within which food is eaten.
pub const CONSUMPTION_MARGIN: f32 = 0.5;

/// What a creature appears to be doing, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorState {
    /// Moving without a pressing need.
    #[default]
    Wandering,
    /// Hungry with food in range of its senses.
    Seeking,
    /// Well fed.
    Resting,
    /// Looking for a mate.
    Mating,
}

/// Side effects a step requests from the ecosystem.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Food within reach this tick.
    pub food: Option<FoodId>,
    /// Creature flagged itself as wanting offspring.
    pub wants_to_reproduce: bool,
    /// Creature died during this step.
    pub died: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Motion {
    Integrate,
    Preintegrated,
}

/// A simulated creature with a neural network brain.
#[derive(Debug)]
pub struct Creature {
    /// Arena handle.
    pub id: CreatureId,
    /// Position in the arena.
    pub pos: Vector2,
    /// Velocity in units per second.
    pub vel: Vector2,
    /// Heading in radians.
    pub rot: f32,
    /// Current energy in `[0, max_energy]`.
    pub energy: f32,
    /// Energy cap.
    pub max_energy: f32,
    /// Seconds alive.
    pub age: f32,
    /// Generation this creature was born into (starts at 1).
    pub generation: u32,
    /// `age + energy / 10`, refreshed every step.
    pub fitness: f32,
    /// Offspring produced.
    pub children_count: u32,
    /// Dead creatures are ignored by sensing, physics and breeding.
    pub is_dead: bool,
    /// Seconds since death, drives the fade-out before removal.
    pub fade: f32,
    /// Whether the last step flagged reproduction intent.
    pub wants_to_reproduce: bool,
    /// Display classification of the last step.
    pub behavior: BehaviorState,
    /// RGB color in `[0, 1]`.
    pub color: [f32; 3],
    /// Body radius.
    pub size: f32,
    /// Owned neural network.
    pub brain: NeuralBrain,
}

impl Creature {
    /// Creates a creature at `pos` with the given brain.
    pub fn new(
        id: CreatureId,
        pos: Vector2,
        brain: NeuralBrain,
        generation: u32,
        params: &Params,
    ) -> Self {
        let mut rng = rand::rng();
        let energy = params.initial_energy.min(params.max_energy);
        Self {
            id,
            pos,
            vel: Vector2::ZERO,
            rot: rng.random_range(0.0..std::f32::consts::TAU),
            energy,
            max_energy: params.max_energy,
            age: 0.0,
            generation: generation.max(1),
            fitness: energy / 10.0,
            children_count: 0,
            is_dead: false,
            fade: 0.0,
            wants_to_reproduce: false,
            behavior: BehaviorState::default(),
            color: [
                rng.random_range(0.2..1.0),
                rng.random_range(0.2..1.0),
                rng.random_range(0.2..1.0),
            ],
            size: params.creature_size,
            brain,
        }
    }

    /// Color for a child of `a` and `b`: the parents' average with slight noise.
    pub fn offspring_color(a: &Creature, b: &Creature) -> [f32; 3] {
        let mut rng = rand::rng();
        let mut color = [0.0; 3];
        for (i, c) in color.iter_mut().enumerate() {
            let mixed = (a.color[i] + b.color[i]) / 2.0 + rng.random_range(-0.05..=0.05);
            *c = mixed.clamp(0.0, 1.0);
        }
        color
    }

    /// Energy as a fraction of the cap.
    pub fn energy_ratio(&self) -> f32 {
        if self.max_energy > 0.0 {
            self.energy / self.max_energy
        } else {
            0.0
        }
    }

    /// Unit vector along the heading.
    pub fn heading(&self) -> Vector2 {
        Vector2::from_angle(self.rot)
    }

    /// Whether the creature is alive.
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Adds food energy, capped at `max_energy`. Returns the energy actually gained.
    pub fn eat(&mut self, energy: f32) -> f32 {
        let before = self.energy;
        self.energy = (self.energy + energy).min(self.max_energy);
        self.energy - before
    }

    /// Marks the creature dead. Its brain is released later by [`Creature::dispose`].
    pub fn mark_dead(&mut self) {
        self.is_dead = true;
        self.wants_to_reproduce = false;
        self.vel = Vector2::ZERO;
    }

    /// Releases the brain. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.brain.dispose();
    }

    /// Builds the brain input vector.
    ///
    /// Layout: food dx, food dy, energy ratio, vx, vy, neighbour dx, neighbour dy,
    /// wall distance. Offsets are normalised by the world size, velocity by
    /// [`MAX_SPEED`] and wall distance by half the world size. Missing targets read 0.
    pub fn sense(&self, world: &World, surroundings: &Surroundings) -> [f32; SENSE_INPUTS] {
        let size = world.size();
        let (food_dx, food_dy) = surroundings
            .nearest_food(world, self.pos)
            .map_or((0.0, 0.0), |(_, d)| (d.dx / size, d.dy / size));
        let (peer_dx, peer_dy) = surroundings
            .nearest_creature(world, self.pos, self.id)
            .map_or((0.0, 0.0), |(_, d)| (d.dx / size, d.dy / size));

        [
            food_dx,
            food_dy,
            self.energy_ratio(),
            self.vel.x / MAX_SPEED,
            self.vel.y / MAX_SPEED,
            peer_dx,
            peer_dy,
            world.distance_to_wall(self.pos) / world.half_size(),
        ]
    }

    /// Runs the brain: `[rotation, acceleration, reproduction]`, each in `[0, 1]`.
    pub fn decide(
        &self,
        inputs: &[f32; SENSE_INPUTS],
    ) -> Result<[f32; DECISION_OUTPUTS], CreatureError> {
        let outputs = self.brain.predict(inputs)?;
        let len = outputs.len();
        outputs.try_into().map_err(|_| {
            CreatureError::Brain(BrainError::OutputSize {
                expected: DECISION_OUTPUTS,
                actual: len,
            })
        })
    }

    /// Advances the creature by `delta`, including position integration.
    pub fn step(
        &mut self,
        delta: f32,
        world: &World,
        surroundings: &Surroundings,
        params: &Params,
    ) -> StepOutcome {
        self.run(delta, world, surroundings, params, Motion::Integrate)
    }

    /// Advances the creature by `delta` when its position was already integrated
    /// this tick by [`super::physics::update_positions`].
    pub fn update(
        &mut self,
        delta: f32,
        world: &World,
        surroundings: &Surroundings,
        params: &Params,
    ) -> StepOutcome {
        self.run(delta, world, surroundings, params, Motion::Preintegrated)
    }

    fn run(
        &mut self,
        delta: f32,
        world: &World,
        surroundings: &Surroundings,
        params: &Params,
        motion: Motion,
    ) -> StepOutcome {
        if self.is_dead {
            return StepOutcome::default();
        }

        match self.advance(delta, world, surroundings, params, motion) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(creature = ?self.id, error = %e, "creature update failed, marking dead");
                self.mark_dead();
                StepOutcome {
                    died: true,
                    ..StepOutcome::default()
                }
            }
        }
    }

    fn advance(
        &mut self,
        delta: f32,
        world: &World,
        surroundings: &Surroundings,
        params: &Params,
        motion: Motion,
    ) -> Result<StepOutcome, CreatureError> {
        let mut outcome = StepOutcome::default();
        self.wants_to_reproduce = false;

        self.age += delta;
        self.energy -= delta * params.energy_decay_rate;
        if self.energy <= 0.0 {
            self.energy = 0.0;
            self.mark_dead();
            outcome.died = true;
            return Ok(outcome);
        }
        self.fitness = self.age + self.energy / 10.0;

        let inputs = self.sense(world, surroundings);
        let [rotation_signal, acceleration_signal, reproduction_intent] = self.decide(&inputs)?;

        self.rot = (self.rot + (rotation_signal * 2.0 - 1.0) * delta * ROTATION_GAIN)
            .rem_euclid(std::f32::consts::TAU);
        self.vel += self.heading() * (acceleration_signal * delta * ACCEL_GAIN);
        self.vel *= FRICTION;
        self.vel = self.vel.clamp_length(MAX_SPEED);

        if motion == Motion::Integrate {
            self.pos = world.wrap_position(self.pos + self.vel * delta);
        }
        if !self.pos.is_finite() || !self.vel.is_finite() || !self.rot.is_finite() {
            return Err(CreatureError::NonFiniteState);
        }

        let nearest_food = surroundings.nearest_food(world, self.pos);
        if let Some((food_id, d)) = nearest_food {
            if d.distance < self.size + CONSUMPTION_MARGIN {
                outcome.food = Some(food_id);
            }
        }

        if reproduction_intent > REPRODUCTION_INTENT_THRESHOLD
            && self.energy > params.min_energy_to_reproduce * self.max_energy
        {
            self.energy *= REPRODUCTION_COST_FACTOR;
            self.children_count += 1;
            self.wants_to_reproduce = true;
            outcome.wants_to_reproduce = true;
        }

        self.behavior = self.classify(nearest_food.is_some());
        Ok(outcome)
    }

    fn classify(&self, food_sensed: bool) -> BehaviorState {
        let ratio = self.energy_ratio();
        if self.wants_to_reproduce {
            BehaviorState::Mating
        } else if ratio < 0.3 && food_sensed {
            BehaviorState::Seeking
        } else if ratio > 0.9 {
            BehaviorState::Resting
        } else {
            BehaviorState::Wandering
        }
    }
}

impl Locatable for Creature {
    fn pos(&self) -> Vector2 {
        self.pos
    }

    fn pos_mut(&mut self) -> &mut Vector2 {
        &mut self.pos
    }

    fn radius(&self) -> f32 {
        self.size
    }
}
