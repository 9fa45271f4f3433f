//! Evolution and creature spawning.
//!
//! Handles brain construction with fallback, pairwise mating during a tick, and
//! the generation advance that rebuilds a collapsed population from its fittest
//! survivors.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info, warn};

use super::brain::{BrainConfig, NeuralBrain};
use super::creature::{Creature, CreatureId};
use super::ecosystem::Ecosystem;
use super::error::BrainError;
use super::event_log::EventKind;
use super::params::Params;
use super::world::Vector2;

/// Energy multiplier paid by both parents when mating succeeds.
pub const MATING_ENERGY_FACTOR: f32 = 0.7;
/// Fraction of `max_energy` survivors start a new generation with.
pub const SURVIVOR_ENERGY_FACTOR: f32 = 0.8;
/// Maximum per-axis offset of a newborn from its initiating parent.
pub const BIRTH_JITTER: f32 = 1.0;

/// How a generation advance rebuilt the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Survivors were kept and bred back up to the target size.
    Bred {
        /// Creatures that carried over.
        survivors: usize,
        /// Offspring created from survivor pairs.
        offspring: usize,
    },
    /// Too few survivors; a fresh random population was seeded.
    Reseeded {
        /// Creatures created.
        created: usize,
    },
}

/// Builds a random brain for the configured topology.
///
/// Falls back to the default topology if the configured one cannot be built.
pub fn fresh_brain(params: &Params) -> Result<NeuralBrain, BrainError> {
    NeuralBrain::random(params.brain_config()).or_else(|e| {
        warn!(error = %e, "brain construction failed, using default topology");
        NeuralBrain::random(BrainConfig::default())
    })
}

/// Child brain for two parents: crossover with mutation, or a fresh random brain
/// when crossover fails (for example because a parent's brain was disposed).
pub fn breed(a: &Creature, b: &Creature, params: &Params) -> Option<NeuralBrain> {
    let child = a
        .brain
        .crossover(
            &b.brain,
            params.crossover_rate,
            params.mutation_rate,
            params.mutation_amount,
        )
        .or_else(|e| {
            warn!(error = %e, "crossover failed, substituting a random brain");
            fresh_brain(params)
        });

    match child {
        Ok(brain) => Some(brain),
        Err(e) => {
            warn!(error = %e, "no brain available for offspring");
            None
        }
    }
}

/// Adds `count` random creatures at uniform positions, in the current generation.
pub fn seed_population(
    ecosystem: &mut Ecosystem,
    params: &Params,
    count: usize,
) -> Result<(), BrainError> {
    let generation = ecosystem.generation;
    for _ in 0..count {
        let brain = fresh_brain(params)?;
        let pos = ecosystem.world.random_position();
        ecosystem
            .creatures
            .insert_with_key(|id| Creature::new(id, pos, brain, generation, params));
    }
    Ok(())
}

/// Pairs reproduction candidates with their nearest available mate.
///
/// Candidates are the creatures in `requested` plus live creatures above the
/// energy threshold that pass a `reproduction_chance * delta` roll. Each creature
/// takes part in at most one mating per call, so the mate is the nearest live
/// creature in `reproduction_radius` that has not already mated this call, even
/// when a nearer one has. Newborns never mate. Returns the newborns.
pub fn reproduce(
    ecosystem: &mut Ecosystem,
    params: &Params,
    delta: f32,
    requested: &[CreatureId],
) -> Vec<CreatureId> {
    let mut rng = rand::rng();
    let chance = params.reproduction_chance * delta;

    let mut candidates: Vec<CreatureId> = requested.to_vec();
    candidates.extend(
        ecosystem
            .creatures
            .iter()
            .filter(|(_, c)| !c.is_dead)
            .filter(|(id, c)| {
                !requested.contains(id)
                    && c.energy > params.min_energy_to_reproduce * c.max_energy
                    && rng.random::<f32>() < chance
            })
            .map(|(id, _)| id),
    );

    let mut bred: HashSet<CreatureId> = HashSet::new();
    let mut births = Vec::new();

    for initiator in candidates {
        if bred.contains(&initiator) {
            continue;
        }
        let Some(parent) = ecosystem.creatures.get(initiator).filter(|c| !c.is_dead) else {
            continue;
        };

        let mate_id = ecosystem
            .creatures
            .iter()
            .filter(|(id, c)| *id != initiator && !c.is_dead && !bred.contains(id))
            .map(|(id, c)| (id, ecosystem.world.shortest_delta(parent.pos, c.pos).distance))
            .filter(|(_, d)| *d <= params.reproduction_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);
        let Some(mate_id) = mate_id else {
            continue;
        };
        let mate = &ecosystem.creatures[mate_id];

        let Some(brain) = breed(parent, mate, params) else {
            continue;
        };
        let generation = parent.generation.max(mate.generation) + 1;
        let color = Creature::offspring_color(parent, mate);
        let pos = ecosystem.world.wrap_position(
            parent.pos
                + Vector2::new(
                    rng.random_range(-BIRTH_JITTER..=BIRTH_JITTER),
                    rng.random_range(-BIRTH_JITTER..=BIRTH_JITTER),
                ),
        );

        for id in [initiator, mate_id] {
            if let Some(c) = ecosystem.creatures.get_mut(id) {
                c.energy *= MATING_ENERGY_FACTOR;
                c.children_count += 1;
            }
            bred.insert(id);
        }

        let child = ecosystem.creatures.insert_with_key(|id| {
            let mut c = Creature::new(id, pos, brain, generation, params);
            c.color = color;
            c
        });
        bred.insert(child);
        births.push(child);

        debug!(child = ?child, generation, "creature born");
        ecosystem.log.record(
            ecosystem.time,
            EventKind::Birth,
            format!("creature born (gen {generation})"),
        );
    }

    births
}

/// Replaces the population with the fittest survivors and their offspring.
///
/// Increments the generation counter, keeps the top `survivor_count` living
/// creatures by fitness with reset age, energy and children, and breeds random
/// distinct survivor pairs until `initial_creatures` is reached. With fewer than
/// two survivors a fresh random population is seeded instead. Every removed
/// creature has its brain disposed.
pub fn advance_generation(ecosystem: &mut Ecosystem, params: &Params) -> GenerationOutcome {
    ecosystem.generation += 1;
    let generation = ecosystem.generation;

    let mut ranked: Vec<(CreatureId, f32)> = ecosystem
        .creatures
        .iter()
        .filter(|(_, c)| !c.is_dead)
        .map(|(id, c)| (id, c.fitness))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let survivors: Vec<CreatureId> = ranked
        .into_iter()
        .take(params.survivor_count)
        .map(|(id, _)| id)
        .collect();

    let doomed: Vec<CreatureId> = ecosystem
        .creatures
        .keys()
        .filter(|id| survivors.len() < 2 || !survivors.contains(id))
        .collect();
    for id in doomed {
        if let Some(mut creature) = ecosystem.creatures.remove(id) {
            creature.dispose();
        }
    }

    let outcome = if survivors.len() < 2 {
        let before = ecosystem.creatures.len();
        if let Err(e) = seed_population(ecosystem, params, params.initial_creatures) {
            warn!(error = %e, "failed to seed a fresh population");
        }
        GenerationOutcome::Reseeded {
            created: ecosystem.creatures.len() - before,
        }
    } else {
        for id in &survivors {
            if let Some(c) = ecosystem.creatures.get_mut(*id) {
                c.age = 0.0;
                c.energy = c.max_energy * SURVIVOR_ENERGY_FACTOR;
                c.fitness = c.energy / 10.0;
                c.children_count = 0;
                c.wants_to_reproduce = false;
            }
        }
        GenerationOutcome::Bred {
            survivors: survivors.len(),
            offspring: breed_survivors(ecosystem, params, &survivors, generation),
        }
    };

    info!(generation, ?outcome, "generation advanced");
    ecosystem.log.record(
        ecosystem.time,
        EventKind::Generation,
        format!("generation {generation} started"),
    );
    outcome
}

fn breed_survivors(
    ecosystem: &mut Ecosystem,
    params: &Params,
    survivors: &[CreatureId],
    generation: u32,
) -> usize {
    let mut rng = rand::rng();
    let mut offspring = 0;

    while ecosystem.creatures.len() < params.initial_creatures {
        let i = rng.random_range(0..survivors.len());
        let mut j = rng.random_range(0..survivors.len() - 1);
        if j >= i {
            j += 1;
        }
        let (Some(a), Some(b)) = (
            ecosystem.creatures.get(survivors[i]),
            ecosystem.creatures.get(survivors[j]),
        ) else {
            break;
        };
        let Some(brain) = breed(a, b, params) else {
            break;
        };
        let color = Creature::offspring_color(a, b);
        let pos = ecosystem.world.random_position();
        ecosystem.creatures.insert_with_key(|id| {
            let mut c = Creature::new(id, pos, brain, generation, params);
            c.color = color;
            c
        });
        offspring += 1;
    }

    offspring
}
