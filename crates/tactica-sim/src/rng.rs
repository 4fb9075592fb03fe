//! Random number source consumed by the simulation.
//!
//! The simulation never owns global random state; every stochastic operation
//! borrows a `RandomSource`, so a seeded source replays a turn exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub trait RandomSource {
    /// Uniform integer in `min..=max`. Swapped bounds are accepted.
    fn generate(&mut self, min: i32, max: i32) -> i32;

    /// Uniform real in `min..max`. Swapped bounds are accepted.
    fn generate_f64(&mut self, min: f64, max: f64) -> f64;

    /// Normally distributed sample (Box-Muller transform).
    fn box_muller(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.generate_f64(f64::EPSILON, 1.0);
        let u2 = self.generate_f64(0.0, 1.0);
        let magnitude = (-2.0 * u1.ln()).sqrt();
        mean + std_dev * magnitude * (std::f64::consts::TAU * u2).cos()
    }
}

/// Reproducible source backed by PCG32.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn generate(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    fn generate_f64(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }
}
