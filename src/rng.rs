//! Seedable source of random draws backing every stochastic decision.
//!
//! Sequential runs thread one `RngService` through the whole simulation;
//! the parallel driver derives an independent substream per task from
//! (seed, day, appliance, copy) so tasks stay self-contained.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// splitmix64 increment, used when mixing task coordinates into a seed.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// A seedable stream of uniform, Gaussian, and integer draws.
#[derive(Debug, Clone)]
pub struct RngService {
    rng: ChaCha8Rng,
}

impl RngService {
    /// Creates a deterministic stream from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derives the independent substream for one (day, appliance, copy) task.
    ///
    /// Coordinates are folded into the base seed with a splitmix64 round per
    /// component, so neighbouring tasks land on unrelated streams.
    pub fn substream(seed: u64, day: usize, appliance: usize, copy: usize) -> Self {
        let mut s = seed;
        for part in [day as u64, appliance as u64, copy as u64] {
            s = splitmix(s ^ part.wrapping_mul(GOLDEN_GAMMA));
        }
        Self::from_seed(s)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random()
    }

    /// Uniform draw between two bounds given in either order.
    pub fn uniform_between(&mut self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if lo == hi {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    /// Integer draw in `[lo, hi]`, both ends inclusive.
    pub fn randint(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Gaussian draw via the Box-Muller transform.
    ///
    /// A non-positive standard deviation collapses to the mean; a negative
    /// sigma is treated by magnitude.
    pub fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        let sigma = sigma.abs();
        if sigma == 0.0 || !sigma.is_finite() {
            return mu;
        }
        let u1: f64 = self.rng.random::<f64>().clamp(1e-12, 1.0);
        let u2: f64 = self.rng.random();
        let z0 = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mu + z0 * sigma
    }

    /// Multiplicative jitter factor: uniform in `[1 - var, 1 + var]`, or
    /// exactly 1 when `var` is zero.
    pub fn variation(&mut self, var: f64) -> f64 {
        if var > 0.0 {
            self.uniform_between(1.0 - var, 1.0 + var)
        } else {
            1.0
        }
    }

    /// `norm` scaled by a jitter factor, the common power-jitter form.
    pub fn variation_of(&mut self, var: f64, norm: f64) -> f64 {
        norm * self.variation(var)
    }
}

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
