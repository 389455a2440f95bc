//! Coherent 2D noise feeding the sand and water fields.
//!
//! Uses the `noise` crate's Perlin generator, remapped to the [0, 1] range
//! the height fields expect.

use noise::{NoiseFn, Perlin};

/// A pure, deterministic 2D noise function returning values in [0, 1].
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f32, y: f32) -> f32;
}

/// Perlin noise remapped from [-1, 1] to [0, 1].
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(Perlin::DEFAULT_SEED)
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f32, y: f32) -> f32 {
        let value = self.perlin.get([x as f64, y as f64]);
        ((value as f32 + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Clamps a raw sample into [0, 1]; non-finite samples read as the midpoint.
pub fn sanitize_sample(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}
