//! Snapshot of the arena that creatures sense against during a tick.
//!
//! The snapshot only holds unconsumed food and living creatures, so a consumed
//! food item or a corpse can never be reported as "nearest".

use super::super::food::{Food, FoodId};
use super::super::world::{ShortestDelta, Vector2, World};
use super::{Creature, CreatureId};

/// Position of an entity at the moment the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting<K> {
    /// Arena handle of the entity.
    pub id: K,
    /// Position when captured.
    pub pos: Vector2,
}

/// Read-only view of food and neighbours shared by every creature in a tick.
#[derive(Debug, Clone, Default)]
pub struct Surroundings {
    foods: Vec<Sighting<FoodId>>,
    creatures: Vec<Sighting<CreatureId>>,
}

impl Surroundings {
    /// Captures the live subset of `foods` and `creatures`.
    pub fn capture<'a, 'b>(
        foods: impl IntoIterator<Item = &'a Food>,
        creatures: impl IntoIterator<Item = &'b Creature>,
    ) -> Self {
        Self {
            foods: foods
                .into_iter()
                .filter(|f| !f.is_consumed())
                .map(|f| Sighting { id: f.id, pos: f.pos })
                .collect(),
            creatures: creatures
                .into_iter()
                .filter(|c| !c.is_dead)
                .map(|c| Sighting { id: c.id, pos: c.pos })
                .collect(),
        }
    }

    /// Food visible in this snapshot.
    pub fn foods(&self) -> &[Sighting<FoodId>] {
        &self.foods
    }

    /// Nearest food to `from`, wrap-aware.
    pub fn nearest_food(&self, world: &World, from: Vector2) -> Option<(FoodId, ShortestDelta)> {
        nearest(&self.foods, world, from, |_| false)
    }

    /// Nearest creature to `from` other than `exclude`, wrap-aware.
    pub fn nearest_creature(
        &self,
        world: &World,
        from: Vector2,
        exclude: CreatureId,
    ) -> Option<(CreatureId, ShortestDelta)> {
        nearest(&self.creatures, world, from, |id| id == exclude)
    }
}

fn nearest<K: Copy>(
    items: &[Sighting<K>],
    world: &World,
    from: Vector2,
    skip: impl Fn(K) -> bool,
) -> Option<(K, ShortestDelta)> {
    items
        .iter()
        .filter(|s| !skip(s.id))
        .map(|s| (s.id, world.shortest_delta(from, s.pos)))
        .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
}
