//! Background hill silhouettes
//!
//! A few sine waves of different wavelengths with random phases, normalized
//! and squashed into a small positive height. Purely visual: nothing in the
//! simulation collides with it.

use std::f32::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Wavelengths used for the default hills
pub const DEFAULT_TERRAIN_SIZES: [f32; 3] = [50.0, 100.0, 200.0];

/// Height multipliers for the back and front hill bands
pub const HILL_BAND_SCALES: [f32; 2] = [500.0, 300.0];

const ALPHA: f32 = 0.5;
const BETA: f32 = 10.0;

/// Multi-octave sine height field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HillNoise {
    sizes: Vec<f32>,
    /// Phase offset per size, in [0, 2π)
    offsets: Vec<f32>,
    /// sqrt(Σ (size/2)²)
    sigma: f32,
}

impl HillNoise {
    /// Draw one phase offset per size from `rng`
    pub fn new(sizes: &[f32], rng: &mut impl Rng) -> Self {
        let pairs: Vec<(f32, f32)> = sizes
            .iter()
            .map(|&size| (size, rng.random_range(0.0..TAU)))
            .collect();
        Self::with_offsets(&pairs)
    }

    /// Reproducible hills for a seed
    pub fn with_seed(sizes: &[f32], seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self::new(sizes, &mut rng)
    }

    /// Different hills every run
    pub fn from_entropy(sizes: &[f32]) -> Self {
        Self::new(sizes, &mut rand::rng())
    }

    /// Explicit `(size, offset)` pairs
    pub fn with_offsets(pairs: &[(f32, f32)]) -> Self {
        let sizes: Vec<f32> = pairs.iter().map(|&(size, _)| size).collect();
        let offsets = pairs.iter().map(|&(_, offset)| offset).collect();
        let sigma = sizes.iter().map(|s| (s / 2.0).powi(2)).sum::<f32>().sqrt();
        Self {
            sizes,
            offsets,
            sigma,
        }
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Height at `x`, roughly in (0, 0.6] for the default sizes
    pub fn evaluate(&self, x: f32) -> f32 {
        let sum: f32 = self
            .sizes
            .iter()
            .zip(&self.offsets)
            .map(|(size, offset)| size * (x / size + offset).sin())
            .sum();
        let n = if self.sigma > 0.0 { sum / self.sigma } else { 0.0 };

        // Half-Gaussian quantile, then a Weibull-style squash
        let sign = if n < 0.0 { -1.0 } else { 1.0 };
        let spread = (1.0 - (-2.0 / PI * n * n).exp()).sqrt();
        let u = 1.0 - (0.5 * sign * spread + 0.5);
        ALPHA * (-u.ln()).powf(1.0 / BETA)
    }

    /// Screen Y of the hill top for world column `x`
    pub fn surface_y(&self, x: f32, height_scale: f32, screen_height: f32) -> f32 {
        screen_height - self.evaluate(3.0 * x) * height_scale
    }

    /// `(x, y)` hill tops for every whole column in `[start_x, end_x)`
    pub fn band(
        &self,
        start_x: f32,
        end_x: f32,
        height_scale: f32,
        screen_height: f32,
    ) -> Vec<(f32, f32)> {
        let mut columns = Vec::new();
        let mut x = start_x;
        while x < end_x {
            columns.push((x, self.surface_y(x, height_scale, screen_height)));
            x += 1.0;
        }
        columns
    }
}

impl Default for HillNoise {
    fn default() -> Self {
        Self::from_entropy(&DEFAULT_TERRAIN_SIZES)
    }
}
