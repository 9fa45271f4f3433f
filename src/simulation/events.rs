//! Event system for deferred simulation state updates.
//!
//! Creatures update against a shared snapshot and report their side effects as
//! events; the ecosystem applies the queue afterwards in arrival order.

use tracing::debug;

use super::creature::CreatureId;
use super::ecosystem::Ecosystem;
use super::event_log::EventKind;
use super::food::FoodId;

/// Events that modify simulation state.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A creature reached a food item.
    FoodConsumed {
        /// Creature that reached the food.
        creature_id: CreatureId,
        /// Food that was reached.
        food_id: FoodId,
    },
    /// A creature flagged that it wants offspring.
    ReproductionRequested {
        /// Creature that wants to mate.
        creature_id: CreatureId,
    },
    /// A creature died during its step.
    CreatureDied {
        /// Creature that died.
        creature_id: CreatureId,
    },
}

/// Queue for collecting simulation events during the creature pass.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

/// What applying a queue changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedEvents {
    /// Food items eaten.
    pub foods_eaten: usize,
    /// Creatures that died.
    pub deaths: usize,
    /// Creatures that asked to reproduce, in request order.
    pub reproduction_requests: Vec<CreatureId>,
}

/// Applies all queued events to the ecosystem state.
///
/// Food claims are first come first served: a food item already eaten earlier in
/// the queue is skipped.
pub fn apply_events(state: &mut Ecosystem, mut queue: EventQueue) -> AppliedEvents {
    let mut applied = AppliedEvents::default();

    for event in queue.drain() {
        match event {
            SimulationEvent::FoodConsumed {
                creature_id,
                food_id,
            } => {
                let Some(creature) = state.creatures.get_mut(creature_id) else {
                    continue;
                };
                if creature.is_dead {
                    continue;
                }
                let Some(energy) = state.foods.get_mut(food_id).and_then(|f| f.consume()) else {
                    continue;
                };
                creature.eat(energy);
                applied.foods_eaten += 1;
            }
            SimulationEvent::ReproductionRequested { creature_id } => {
                applied.reproduction_requests.push(creature_id);
            }
            SimulationEvent::CreatureDied { creature_id } => {
                applied.deaths += 1;
                if let Some(creature) = state.creatures.get(creature_id) {
                    debug!(creature = ?creature_id, age = creature.age, "creature died");
                    state.log.record(
                        state.time,
                        EventKind::Death,
                        format!(
                            "creature died at age {:.1} (gen {})",
                            creature.age, creature.generation
                        ),
                    );
                }
            }
        }
    }

    applied
}
