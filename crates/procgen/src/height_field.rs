//! Height profile of the landscape: fractal Perlin noise with power-law shaping.
//!
//! **Seed-based determinism:** the Perlin permutation table is fixed and the world seed
//! only shifts the sample position, so `height(x, seed)` is a pure function of its inputs,
//! independent of chunk load order.

use noise::{NoiseFn, Perlin};

use crate::map::NoiseParameters;

/// Seed for the shared Perlin permutation table. Worlds differ by x shift, not by table.
const PERLIN_SEED: u32 = 0;

/// Row of the 2D Perlin plane the 1D profile is read from. Kept off the integer
/// lattice so samples at whole-number positions are not pinned to zero.
const NOISE_ROW: f64 = 0.5;

/// Amplitude multiplier per octave.
const PERSISTENCE: f64 = 0.5;
/// Frequency multiplier per octave.
const LACUNARITY: f64 = 2.0;

/// Maps a world x-coordinate (plus seed) to a terrain height.
#[derive(Debug, Clone)]
pub struct HeightField {
    params: NoiseParameters,
    perlin: Perlin,
}

impl HeightField {
    pub fn new(params: NoiseParameters) -> Self {
        Self {
            params,
            perlin: Perlin::new(PERLIN_SEED),
        }
    }

    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }

    /// Terrain height at `world_x` for `seed` (screen convention: larger = lower).
    pub fn height(&self, world_x: i32, seed: u64) -> f32 {
        let v = self.fractal_noise(world_x as f64 + seed as f64);
        let magnitude = (v * self.params.multiplier).abs().powf(self.params.exponent);
        // Sign comes from the raw sample, not the shaped magnitude.
        let shaped = if v < 0.0 { -magnitude } else { magnitude };
        (shaped + self.params.offset) as f32
    }

    /// Octave sum normalised by total amplitude, so the result stays in [-1, 1].
    fn fractal_noise(&self, x: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.params.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.params.octaves {
            value += self.perlin.get([x * frequency, NOISE_ROW]) * amplitude;
            max_value += amplitude;

            amplitude *= PERSISTENCE;
            frequency *= LACUNARITY;
        }

        value / max_value
    }
}
