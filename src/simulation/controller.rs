//! Frame-driven driver around an [`Ecosystem`].
//!
//! The controller caps the frame delta, handles pausing, keeps the aggregate
//! [`Stats`] current and owns the creature selection shown by the viewer.

use tracing::{debug, info};

use super::creature::{Creature, CreatureId};
use super::ecosystem::{Ecosystem, TickReport};
use super::error::SimulationError;
use super::params::Params;
use super::stats::{FpsEstimator, Stats};
use super::world::Vector2;

/// Observer invoked with the newly selected creature, or `None` when cleared.
pub type SelectionCallback = Box<dyn FnMut(Option<&Creature>)>;

/// Runs the simulation one frame at a time.
pub struct SimulationController {
    params: Params,
    ecosystem: Ecosystem,
    paused: bool,
    selected: Option<CreatureId>,
    on_selection: Option<SelectionCallback>,
    fps: FpsEstimator,
    stats: Stats,
    shut_down: bool,
}

impl SimulationController {
    /// Validates `params` and seeds a new ecosystem.
    pub fn new(params: Params) -> Result<Self, SimulationError> {
        let ecosystem = Ecosystem::new(&params)?;
        Self::with_ecosystem(params, ecosystem)
    }

    /// Drives an existing ecosystem with validated `params`.
    pub fn with_ecosystem(
        params: Params,
        ecosystem: Ecosystem,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        let mut controller = Self {
            params,
            ecosystem,
            paused: false,
            selected: None,
            on_selection: None,
            fps: FpsEstimator::default(),
            stats: Stats::default(),
            shut_down: false,
        };
        controller.refresh_stats();
        Ok(controller)
    }

    /// Advances one frame that took `raw_delta` seconds.
    ///
    /// The simulated step is capped at `max_tick_delta`; invalid deltas step by 0.
    /// While paused nothing moves but the stats are still refreshed.
    pub fn tick(&mut self, raw_delta: f32) -> TickReport {
        self.fps.record(raw_delta);

        let mut report = TickReport::default();
        if !self.paused && !self.shut_down {
            let delta = if raw_delta.is_finite() {
                raw_delta.min(self.params.max_tick_delta).max(0.0)
            } else {
                0.0
            };
            report = self.ecosystem.step(&self.params, delta);
        }

        if let Some(id) = self.selected {
            let alive = self.ecosystem.creatures.get(id).is_some_and(Creature::is_alive);
            if !alive {
                debug!(creature = ?id, "selected creature gone, clearing selection");
                self.selected = None;
                self.notify_selection();
            }
        }

        self.refresh_stats();
        report
    }

    fn refresh_stats(&mut self) {
        self.stats = Stats {
            fps: self.fps.fps(),
            creature_count: self.ecosystem.live_count(),
            food_count: self.ecosystem.food_count(),
            generation: self.ecosystem.generation,
            elapsed_time: self.ecosystem.time,
            births: self.ecosystem.births,
            deaths: self.ecosystem.deaths,
            foods_eaten: self.ecosystem.foods_eaten,
            best_fitness: self.ecosystem.best_fitness(),
        };
    }

    /// Flips the pause flag and returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");
        self.paused
    }

    /// Whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Statistics as of the last tick.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Registers the selection observer, replacing any previous one.
    pub fn set_selected_creature_callback(
        &mut self,
        callback: impl FnMut(Option<&Creature>) + 'static,
    ) {
        self.on_selection = Some(Box::new(callback));
    }

    /// Selects the nearest living creature within `pick_radius` of `point`, or
    /// clears the selection when there is none. Returns the new selection.
    pub fn select_at(&mut self, point: Vector2, pick_radius: f32) -> Option<CreatureId> {
        let picked = self.ecosystem.creature_near(point, pick_radius);
        self.set_selection(picked);
        picked
    }

    /// Selects `id` if it names a living creature. Returns whether it did.
    pub fn select(&mut self, id: CreatureId) -> bool {
        let alive = self.ecosystem.creatures.get(id).is_some_and(Creature::is_alive);
        if alive {
            self.set_selection(Some(id));
        }
        alive
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    /// Currently selected creature id.
    pub fn selected(&self) -> Option<CreatureId> {
        self.selected
    }

    /// Currently selected creature.
    pub fn selected_creature(&self) -> Option<&Creature> {
        self.selected.and_then(|id| self.ecosystem.creatures.get(id))
    }

    fn set_selection(&mut self, selection: Option<CreatureId>) {
        if self.selected != selection {
            self.selected = selection;
            self.notify_selection();
        }
    }

    fn notify_selection(&mut self) {
        let creature = self.selected.and_then(|id| self.ecosystem.creatures.get(id));
        if let Some(callback) = self.on_selection.as_mut() {
            callback(creature);
        }
    }

    /// The simulated ecosystem.
    pub fn ecosystem(&self) -> &Ecosystem {
        &self.ecosystem
    }

    /// Mutable access to the simulated ecosystem.
    pub fn ecosystem_mut(&mut self) -> &mut Ecosystem {
        &mut self.ecosystem
    }

    /// Parameters the simulation runs with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Disposes every brain. Later ticks do nothing. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.ecosystem.dispose_all();
        self.selected = None;
        self.refresh_stats();
        info!("simulation shut down");
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
