#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_arena::simulation::creature::CreatureId;
use evo_arena::simulation::ecosystem::Ecosystem;
use evo_arena::simulation::food::FOOD_RADIUS;
use evo_arena::simulation::locatable::Locatable;
use evo_arena::simulation::params::Params;
use evo_arena::simulation::physics::{
    COLLISION_JITTER, RESTITUTION, check_collision, check_creature_collisions,
    check_food_collisions, update_positions,
};
use evo_arena::simulation::world::Vector2;

fn setup() -> (Ecosystem, Params) {
    let params = Params::default();
    (Ecosystem::empty(&params).unwrap(), params)
}

fn spawn(ecosystem: &mut Ecosystem, params: &Params, x: f32, y: f32) -> CreatureId {
    ecosystem.spawn_creature_at(Vector2::new(x, y), params).unwrap()
}

#[test]
fn test_collision_across_wrap_edge() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 24.9, 0.0);
    let b = spawn(&mut ecosystem, &params, -24.9, 0.0);
    let size = ecosystem.world.size();

    // 0.2 apart across the edge, radii sum to 1.0
    assert!(check_collision(
        &ecosystem.creatures[a],
        &ecosystem.creatures[b],
        size
    ));

    ecosystem.creatures[a].size = 0.09;
    ecosystem.creatures[b].size = 0.09;
    assert!(!check_collision(
        &ecosystem.creatures[a],
        &ecosystem.creatures[b],
        size
    ));
}

#[test]
fn test_collision_across_corner() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 24.8, 24.8);
    let b = spawn(&mut ecosystem, &params, -24.8, -24.8);

    assert!(check_collision(
        &ecosystem.creatures[a],
        &ecosystem.creatures[b],
        ecosystem.world.size()
    ));
}

#[test]
fn test_distant_bodies_do_not_collide() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 0.0, 0.0);
    let food = ecosystem.spawn_food_at(Vector2::new(5.0, 0.0), 10.0);

    assert!(!check_collision(
        &ecosystem.creatures[a],
        &ecosystem.foods[food],
        ecosystem.world.size()
    ));
    assert_eq!(ecosystem.foods[food].radius(), FOOD_RADIUS);
}

#[test]
fn test_pos_mut_moves_entity() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 0.0, 0.0);
    let food = ecosystem.spawn_food_at(Vector2::new(5.0, 0.0), 10.0);

    *ecosystem.foods[food].pos_mut() = Vector2::new(0.5, 0.0);
    assert_eq!(ecosystem.foods[food].pos(), Vector2::new(0.5, 0.0));
    assert!(check_collision(
        &ecosystem.creatures[a],
        &ecosystem.foods[food],
        ecosystem.world.size()
    ));
}

#[test]
fn test_update_positions_wraps_and_skips_dead() {
    let (mut ecosystem, params) = setup();
    let moving = spawn(&mut ecosystem, &params, 24.5, 0.0);
    let corpse = spawn(&mut ecosystem, &params, 0.0, 0.0);
    ecosystem.creatures[moving].vel = Vector2::new(5.0, 0.0);
    ecosystem.creatures[corpse].mark_dead();
    ecosystem.creatures[corpse].vel = Vector2::new(5.0, 0.0);

    let world = ecosystem.world;
    update_positions(ecosystem.creatures.values_mut(), 0.2, &world);

    let pos = ecosystem.creatures[moving].pos;
    assert!((pos.x + 24.5).abs() < 1e-4, "expected wrap to -24.5, got {}", pos.x);
    assert_eq!(ecosystem.creatures[corpse].pos, Vector2::ZERO);
}

#[test]
fn test_food_collisions_cap_energy_and_feed_once() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 0.0, 0.0);
    let b = spawn(&mut ecosystem, &params, 0.2, 0.0);
    ecosystem.creatures[a].energy = 95.0;
    ecosystem.creatures[b].energy = 95.0;
    let food = ecosystem.spawn_food_at(Vector2::new(0.1, 0.0), 10.0);
    let _far = ecosystem.spawn_food_at(Vector2::new(10.0, 10.0), 10.0);

    let world = ecosystem.world;
    let eaten = check_food_collisions(
        ecosystem.creatures.values_mut(),
        ecosystem.foods.values_mut(),
        &world,
    );

    assert_eq!(eaten, vec![food]);
    assert!(ecosystem.foods[food].is_consumed());
    let energies: Vec<f32> = [a, b].iter().map(|id| ecosystem.creatures[*id].energy).collect();
    assert!(energies.contains(&100.0));
    assert!(energies.contains(&95.0));
    for creature in ecosystem.creatures.values() {
        assert!(creature.energy <= creature.max_energy);
    }
}

#[test]
fn test_dead_creatures_do_not_eat() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 0.0, 0.0);
    ecosystem.creatures[a].mark_dead();
    let food = ecosystem.spawn_food_at(Vector2::new(0.1, 0.0), 10.0);

    let world = ecosystem.world;
    let eaten = check_food_collisions(
        ecosystem.creatures.values_mut(),
        ecosystem.foods.values_mut(),
        &world,
    );
    assert!(eaten.is_empty());
    assert!(!ecosystem.foods[food].is_consumed());
}

#[test]
fn test_creature_collision_swaps_velocities() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 0.0, 0.0);
    let b = spawn(&mut ecosystem, &params, 0.5, 0.0);
    ecosystem.creatures[a].vel = Vector2::new(1.0, 0.0);
    ecosystem.creatures[b].vel = Vector2::new(-2.0, 0.0);

    let world = ecosystem.world;
    check_creature_collisions(ecosystem.creatures.values_mut(), &world);

    let va = ecosystem.creatures[a].vel;
    let vb = ecosystem.creatures[b].vel;
    let tolerance = COLLISION_JITTER + 1e-5;
    assert!((va.x - (-2.0 * RESTITUTION)).abs() <= tolerance);
    assert!((vb.x - RESTITUTION).abs() <= tolerance);
    assert!(va.y.abs() <= tolerance);
    assert!(vb.y.abs() <= tolerance);
}

#[test]
fn test_dead_creatures_do_not_bounce() {
    let (mut ecosystem, params) = setup();
    let a = spawn(&mut ecosystem, &params, 0.0, 0.0);
    let b = spawn(&mut ecosystem, &params, 0.5, 0.0);
    ecosystem.creatures[a].vel = Vector2::new(1.0, 0.0);
    ecosystem.creatures[b].mark_dead();

    let world = ecosystem.world;
    check_creature_collisions(ecosystem.creatures.values_mut(), &world);
    assert_eq!(ecosystem.creatures[a].vel, Vector2::new(1.0, 0.0));
}
