//! Food items that creatures consume for energy.

use slotmap::new_key_type;

use super::locatable::Locatable;
use super::world::{Vector2, World};

new_key_type! {
    /// Stable handle for a food item in the ecosystem arena.
    pub struct FoodId;
}

/// Collision radius of every food item.
pub const FOOD_RADIUS: f32 = 0.5;

/// A passive energy resource.
///
/// Food is consumed exactly once; after that it is ignored by sensing and
/// collision checks and removed from the arena.
#[derive(Debug, Clone)]
pub struct Food {
    /// Arena handle.
    pub id: FoodId,
    /// Position in the arena.
    pub pos: Vector2,
    /// Energy granted to the creature that eats it.
    pub energy: f32,
    consumed: bool,
}

impl Food {
    /// Creates a live food item.
    pub fn new(id: FoodId, pos: Vector2, energy: f32) -> Self {
        Self {
            id,
            pos,
            energy,
            consumed: false,
        }
    }

    /// Creates a food item at a uniformly random position.
    pub fn new_random(id: FoodId, world: &World, energy: f32) -> Self {
        Self::new(id, world.random_position(), energy)
    }

    /// Whether this food has already been eaten.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Marks the food consumed and returns its energy.
    ///
    /// Returns `None` if it was already consumed.
    pub fn consume(&mut self) -> Option<f32> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        Some(self.energy)
    }
}

impl Locatable for Food {
    fn pos(&self) -> Vector2 {
        self.pos
    }

    fn pos_mut(&mut self) -> &mut Vector2 {
        &mut self.pos
    }

    fn radius(&self) -> f32 {
        FOOD_RADIUS
    }
}
