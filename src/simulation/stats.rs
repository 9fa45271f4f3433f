use serde::{Deserialize, Serialize};

/// Aggregate statistics reported to the UI after every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Smoothed frames per second.
    pub fps: f32,
    /// Living creatures.
    pub creature_count: usize,
    /// Unconsumed food items.
    pub food_count: usize,
    /// Current generation counter.
    pub generation: u32,
    /// Simulated seconds elapsed.
    pub elapsed_time: f32,
    /// Creatures born from mating since start.
    pub births: u64,
    /// Creatures that died since start.
    pub deaths: u64,
    /// Food items eaten since start.
    pub foods_eaten: u64,
    /// Highest fitness among living creatures.
    pub best_fitness: f32,
}

/// Exponential moving average of the frame rate.
#[derive(Debug, Clone, Copy)]
pub struct FpsEstimator {
    fps: f32,
    smoothing: f32,
}

impl Default for FpsEstimator {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FpsEstimator {
    /// Creates an estimator; `smoothing` is the weight of each new sample.
    pub fn new(smoothing: f32) -> Self {
        Self {
            fps: 0.0,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Records a frame that took `raw_delta` seconds and returns the new estimate.
    pub fn record(&mut self, raw_delta: f32) -> f32 {
        if raw_delta.is_finite() && raw_delta > 0.0 {
            let sample = 1.0 / raw_delta;
            self.fps = if self.fps == 0.0 {
                sample
            } else {
                self.fps + (sample - self.fps) * self.smoothing
            };
        }
        self.fps
    }

    /// Current estimate.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
