//! Main ecosystem simulation.
//!
//! The ecosystem owns every creature and food item and advances them one tick at
//! a time:
//! - creature brain updates against a shared snapshot of the arena
//! - event-driven food consumption and reproduction requests
//! - collisions, food spawning, mating, corpse cleanup
//! - population regulation through generation advances

use rand::Rng;
use slotmap::SlotMap;
use tracing::{debug, info};

use super::creature::{Creature, CreatureId, Surroundings};
use super::error::SimulationError;
use super::event_log::EventLog;
use super::events::{self, EventQueue, SimulationEvent};
use super::evolution::{self, GenerationOutcome};
use super::food::{Food, FoodId};
use super::params::Params;
use super::physics;
use super::world::{Vector2, World};

/// What a single tick changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Creatures born from mating.
    pub births: usize,
    /// Creatures that died.
    pub deaths: usize,
    /// Food items eaten.
    pub foods_eaten: usize,
    /// Food items spawned.
    pub foods_spawned: usize,
    /// Corpses removed after fading.
    pub removed: usize,
    /// Set when the population was regenerated.
    pub generation: Option<GenerationOutcome>,
}

/// Holds the complete simulation state.
#[derive(Debug)]
pub struct Ecosystem {
    /// Toroidal arena geometry.
    pub world: World,
    /// All creatures, alive or fading.
    pub creatures: SlotMap<CreatureId, Creature>,
    /// Unconsumed food items.
    pub foods: SlotMap<FoodId, Food>,
    /// Simulated seconds elapsed.
    pub time: f32,
    /// Current generation, starting at 1.
    pub generation: u32,
    /// Recent notable events.
    pub log: EventLog,
    /// Creatures born from mating since start.
    pub births: u64,
    /// Creatures that died since start.
    pub deaths: u64,
    /// Food items eaten since start.
    pub foods_eaten: u64,
}

impl Ecosystem {
    /// Creates an ecosystem seeded with `initial_creatures` random creatures and
    /// `initial_food` food items.
    pub fn new(params: &Params) -> Result<Self, SimulationError> {
        let mut ecosystem = Self::empty(params)?;
        evolution::seed_population(&mut ecosystem, params, params.initial_creatures)?;
        for _ in 0..params.initial_food.min(params.max_food) {
            ecosystem.spawn_random_food(params.food_energy);
        }

        info!(
            creatures = ecosystem.creatures.len(),
            foods = ecosystem.foods.len(),
            world_size = params.world_size,
            "ecosystem initialised"
        );
        Ok(ecosystem)
    }

    /// Validates `params` and creates an ecosystem with no creatures or food.
    pub fn empty(params: &Params) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self {
            world: World::new(params.world_size),
            creatures: SlotMap::with_capacity_and_key(params.initial_creatures),
            foods: SlotMap::with_capacity_and_key(params.max_food),
            time: 0.0,
            generation: 1,
            log: EventLog::default(),
            births: 0,
            deaths: 0,
            foods_eaten: 0,
        })
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, params: &Params, dt: f32) -> TickReport {
        self.time += dt;
        let mut report = TickReport::default();

        physics::update_positions(self.creatures.values_mut(), dt, &self.world);

        // every creature senses the same snapshot
        let surroundings = Surroundings::capture(self.foods.values(), self.creatures.values());
        let mut queue = EventQueue::new();
        for (id, creature) in self.creatures.iter_mut() {
            let outcome = creature.update(dt, &self.world, &surroundings, params);
            if outcome.died {
                queue.push(SimulationEvent::CreatureDied { creature_id: id });
            }
            if let Some(food_id) = outcome.food {
                queue.push(SimulationEvent::FoodConsumed {
                    creature_id: id,
                    food_id,
                });
            }
            if outcome.wants_to_reproduce {
                queue.push(SimulationEvent::ReproductionRequested { creature_id: id });
            }
        }
        let applied = events::apply_events(self, queue);
        report.deaths = applied.deaths;

        physics::check_creature_collisions(self.creatures.values_mut(), &self.world);
        let eaten = physics::check_food_collisions(
            self.creatures.values_mut(),
            self.foods.values_mut(),
            &self.world,
        );
        report.foods_eaten = applied.foods_eaten + eaten.len();
        self.foods.retain(|_, food| !food.is_consumed());

        report.foods_spawned = self.spawn_food(params, dt);
        report.births =
            evolution::reproduce(self, params, dt, &applied.reproduction_requests).len();
        report.removed = self.sweep_dead(params, dt);

        if (self.live_count() as f32) < params.population_floor() {
            report.generation = Some(evolution::advance_generation(self, params));
        }

        self.births += report.births as u64;
        self.deaths += report.deaths as u64;
        self.foods_eaten += report.foods_eaten as u64;
        report
    }

    /// Spawns at most one food item, with probability `food_spawn_rate * dt`,
    /// while below `max_food`. Returns the number spawned.
    pub fn spawn_food(&mut self, params: &Params, dt: f32) -> usize {
        let mut rng = rand::rng();
        if self.food_count() < params.max_food
            && rng.random::<f32>() < params.food_spawn_rate * dt
        {
            self.spawn_random_food(params.food_energy);
            1
        } else {
            0
        }
    }

    fn spawn_random_food(&mut self, energy: f32) -> FoodId {
        let world = self.world;
        self.foods.insert_with_key(|id| Food::new_random(id, &world, energy))
    }

    /// Places a food item at `pos`, wrapped into the arena.
    pub fn spawn_food_at(&mut self, pos: Vector2, energy: f32) -> FoodId {
        let pos = self.world.wrap_position(pos);
        self.foods.insert_with_key(|id| Food::new(id, pos, energy))
    }

    /// Places a creature with a fresh random brain at `pos`, wrapped into the arena.
    pub fn spawn_creature_at(
        &mut self,
        pos: Vector2,
        params: &Params,
    ) -> Result<CreatureId, SimulationError> {
        let brain = evolution::fresh_brain(params)?;
        let pos = self.world.wrap_position(pos);
        let generation = self.generation;
        Ok(self
            .creatures
            .insert_with_key(|id| Creature::new(id, pos, brain, generation, params)))
    }

    /// Ages corpses and removes those that have faded out, disposing their brains.
    fn sweep_dead(&mut self, params: &Params, dt: f32) -> usize {
        let mut removed = 0;
        self.creatures.retain(|_, creature| {
            if !creature.is_dead {
                return true;
            }
            creature.fade += dt;
            if creature.fade < params.corpse_fade_time {
                return true;
            }
            creature.dispose();
            removed += 1;
            false
        });
        if removed > 0 {
            debug!(removed, "corpses removed");
        }
        removed
    }

    /// Living creatures.
    pub fn live_creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values().filter(|c| !c.is_dead)
    }

    /// Number of living creatures.
    pub fn live_count(&self) -> usize {
        self.live_creatures().count()
    }

    /// Number of unconsumed food items.
    pub fn food_count(&self) -> usize {
        self.foods.values().filter(|f| !f.is_consumed()).count()
    }

    /// Highest fitness among living creatures, 0 when none are alive.
    pub fn best_fitness(&self) -> f32 {
        self.live_creatures()
            .map(|c| c.fitness)
            .max_by(f32::total_cmp)
            .unwrap_or(0.0)
    }

    /// Nearest living creature to `point` within `radius`, wrap-aware.
    pub fn creature_near(&self, point: Vector2, radius: f32) -> Option<CreatureId> {
        self.live_creatures()
            .map(|c| (c.id, self.world.shortest_delta(point, c.pos).distance))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Disposes every brain and clears the arenas.
    pub fn dispose_all(&mut self) {
        for creature in self.creatures.values_mut() {
            creature.dispose();
        }
        self.creatures.clear();
        self.foods.clear();
    }
}
