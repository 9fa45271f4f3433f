//! Trait for round entities that occupy a position in the arena.
//!
//! Collision checks in [`super::physics`] work on anything implementing it,
//! so creatures and food share the same wrap-aware overlap test.

use super::world::Vector2;

/// An entity with a position and a circular footprint.
pub trait Locatable {
    /// Current position.
    fn pos(&self) -> Vector2;

    /// Mutable access to the position.
    fn pos_mut(&mut self) -> &mut Vector2;

    /// Collision radius.
    fn radius(&self) -> f32;
}
