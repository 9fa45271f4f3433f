//! Stateless physics passes over creature and food collections.
//!
//! Every function works on iterators of mutable references so the ecosystem can
//! pass views into its arenas and tests can pass plain vectors.

use rand::Rng;

use super::creature::Creature;
use super::food::{Food, FoodId};
use super::locatable::Locatable;
use super::world::{Vector2, World};

/// Velocity multiplier applied when two creatures bounce.
pub const RESTITUTION: f32 = 0.8;
/// Maximum per-axis velocity jitter added after a bounce.
pub const COLLISION_JITTER: f32 = 0.1;

/// Integrates position from velocity and wraps, for every living creature.
pub fn update_positions<'a>(
    creatures: impl IntoIterator<Item = &'a mut Creature>,
    delta: f32,
    world: &World,
) {
    for creature in creatures.into_iter().filter(|c| !c.is_dead) {
        creature.pos = world.wrap_position(creature.pos + creature.vel * delta);
    }
}

/// Whether two bodies overlap, considering the direct offset and the three
/// wrap-translated ones (x, y and both).
pub fn check_collision<A, B>(a: &A, b: &B, world_size: f32) -> bool
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    let reach = a.radius() + b.radius();
    let d = b.pos() - a.pos();
    let wrapped = Vector2::new(
        d.x - d.x.signum() * world_size,
        d.y - d.y.signum() * world_size,
    );

    [
        d,
        Vector2::new(wrapped.x, d.y),
        Vector2::new(d.x, wrapped.y),
        wrapped,
    ]
    .iter()
    .any(|offset| offset.length() < reach)
}

/// Feeds every living creature the unconsumed food it touches.
///
/// Energy is capped at each creature's maximum and a food item is eaten by at
/// most one creature. Returns the food consumed by this pass.
pub fn check_food_collisions<'a, 'b>(
    creatures: impl IntoIterator<Item = &'a mut Creature>,
    foods: impl IntoIterator<Item = &'b mut Food>,
    world: &World,
) -> Vec<FoodId> {
    let mut foods: Vec<&mut Food> = foods.into_iter().filter(|f| !f.is_consumed()).collect();
    let mut eaten = Vec::new();

    for creature in creatures.into_iter().filter(|c| !c.is_dead) {
        for food in foods.iter_mut() {
            if food.is_consumed() || !check_collision(&*creature, &**food, world.size()) {
                continue;
            }
            if let Some(energy) = food.consume() {
                creature.eat(energy);
                eaten.push(food.id);
            }
        }
    }

    eaten
}

/// Bounces every colliding pair of living creatures.
///
/// The pair swaps velocities scaled by [`RESTITUTION`], then each receives an
/// independent jitter of up to [`COLLISION_JITTER`] per axis so bodies separate.
pub fn check_creature_collisions<'a>(
    creatures: impl IntoIterator<Item = &'a mut Creature>,
    world: &World,
) {
    let mut live: Vec<&mut Creature> = creatures.into_iter().filter(|c| !c.is_dead).collect();
    let mut rng = rand::rng();

    for i in 0..live.len() {
        let (head, tail) = live.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !check_collision(&**a, &**b, world.size()) {
                continue;
            }
            let va = a.vel;
            a.vel = b.vel * RESTITUTION + jitter(&mut rng);
            b.vel = va * RESTITUTION + jitter(&mut rng);
        }
    }
}

fn jitter(rng: &mut impl Rng) -> Vector2 {
    Vector2::new(
        rng.random_range(-COLLISION_JITTER..=COLLISION_JITTER),
        rng.random_range(-COLLISION_JITTER..=COLLISION_JITTER),
    )
}
