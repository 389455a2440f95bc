use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Settings for the floating crate.
///
/// The crate bobs with one sampled cell rather than averaging its footprint.
/// The default anchor sits over the default sample cell, so the two agree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuoyancyConfig {
    /// Water cell whose height drives the crate.
    pub sample_cell: UVec2,
    /// Vertical scale applied to the sampled height.
    pub amplitude: f32,
    /// How far the crate sits below the sampled surface.
    pub draft: f32,
    /// Horizontal (x, z) world position of the crate.
    pub anchor: Vec2,
}

impl Default for BuoyancyConfig {
    fn default() -> Self {
        Self {
            sample_cell: UVec2::new(5, 8),
            amplitude: 6.0,
            draft: 0.2,
            anchor: Vec2::new(10.0, 16.0),
        }
    }
}

impl BuoyancyConfig {
    /// Vertical coordinate of the object for a sampled water height. Unfiltered.
    pub fn float_height(&self, water_height: f32) -> f32 {
        water_height * self.amplitude - self.draft
    }

    /// World position of the object for a sampled water height.
    pub fn float_position(&self, water_height: f32) -> Vec3 {
        Vec3::new(self.anchor.x, self.float_height(water_height), self.anchor.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_height_scenario() {
        let config = BuoyancyConfig::default();
        assert!((config.float_height(0.25) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_float_height_tracks_water_directly() {
        let config = BuoyancyConfig {
            amplitude: 2.0,
            draft: 0.0,
            ..default()
        };
        assert_eq!(config.float_height(0.1), 0.2);
        assert_eq!(config.float_height(0.9), 1.8);
    }

    #[test]
    fn test_float_position_uses_anchor() {
        let config = BuoyancyConfig::default();
        let pos = config.float_position(0.0);
        assert_eq!(pos.x, 10.0);
        assert_eq!(pos.z, 16.0);
        assert!((pos.y + 0.2).abs() < 1e-6);
    }
}
