use bevy::prelude::*;

use crate::features::water::grid::{to_fixed, HeightGrid};
use crate::features::water::noise_source::{sanitize_sample, NoiseSource};

/// Static seabed height at one grid vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SandCell {
    /// Height in roughly [-1, 1].
    pub height: f32,
    /// `height` in fixed point (4096 = 1.0).
    pub fixed_height: i32,
}

/// The seabed. Generated once and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct SandField {
    cells: HeightGrid<SandCell>,
}

impl SandField {
    /// Samples the seabed from `noise` at `((x + offset.x) / scale, (y + offset.y) / scale)`.
    pub fn generate(size: usize, offset: Vec2, scale: f32, noise: &dyn NoiseSource) -> Self {
        let cells = HeightGrid::from_fn(size, |x, y| {
            let sample = noise.sample((x as f32 + offset.x) / scale, (y as f32 + offset.y) / scale);
            let height = sanitize_sample(sample) * 2.0 - 1.0;
            SandCell {
                height,
                fixed_height: to_fixed(height),
            }
        });

        debug!("Generated {size}x{size} sand field");
        Self { cells }
    }

    pub fn size(&self) -> usize {
        self.cells.size()
    }

    pub fn cell(&self, x: usize, y: usize) -> &SandCell {
        self.cells.get(x, y)
    }

    pub fn cells(&self) -> &HeightGrid<SandCell> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::water::grid::FIXED_ONE;
    use crate::features::water::noise_source::PerlinNoise;

    struct Ramp;

    impl NoiseSource for Ramp {
        fn sample(&self, x: f32, _y: f32) -> f32 {
            x / 10.0
        }
    }

    #[test]
    fn test_fixed_height_matches_float_height() {
        let sand = SandField::generate(14, Vec2::new(10.0, 5.0), 4.0, &PerlinNoise::new(1));
        for (_, cell) in sand.cells().iter() {
            assert_eq!(cell.fixed_height, (cell.height * FIXED_ONE as f32) as i32);
            assert!((-1.0..=1.0).contains(&cell.height));
        }
    }

    #[test]
    fn test_offsets_and_remap() {
        // Ramp returns (x + 10) / 4 / 10 at x = 0 -> 0.25 -> remapped to -0.5.
        let sand = SandField::generate(10, Vec2::new(10.0, 5.0), 4.0, &Ramp);
        assert!((sand.cell(0, 3).height + 0.5).abs() < 1e-6);
        assert_eq!(sand.cell(0, 3).fixed_height, -2048);
    }

    #[test]
    fn test_out_of_range_noise_is_clamped() {
        // x = 9 -> (9 + 40) / 4 / 10 = 1.225, clamped to 1.0.
        let sand = SandField::generate(10, Vec2::new(40.0, 0.0), 4.0, &Ramp);
        assert_eq!(sand.cell(9, 0).height, 1.0);
        assert_eq!(sand.cell(9, 0).fixed_height, FIXED_ONE);
    }
}
