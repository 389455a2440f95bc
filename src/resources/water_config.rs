//! Tunables for the water scene, optionally persisted as JSON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::features::water::buoyancy::BuoyancyConfig;
use crate::features::water::grid::DEFAULT_GRID_SIZE;
use crate::features::water::shading::ColorStyle;
use crate::features::water::updater::SimulationMode;

/// Default file name for the config.
const CONFIG_FILE_NAME: &str = "water.json";

/// Configuration for the water simulation and its scene.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Vertices per side. Must be even.
    pub grid_size: usize,
    /// Noise-space offset of the seabed.
    pub sand_offset: Vec2,
    /// Divisor applied to cell coordinates when sampling the seabed.
    pub sand_noise_scale: f32,
    /// Divisor applied to cell coordinates when sampling the water.
    pub water_noise_scale: f32,
    /// Noise scroll per frame (or per reference frame when not frame-coupled).
    pub scroll_speed: f32,
    /// Update alternating cells each frame.
    pub staggered_updates: bool,
    /// Advance by a fixed step per frame instead of scaling by frame time.
    pub frame_coupled: bool,
    /// Frame rate the scroll speed is tuned for, used when not frame-coupled.
    pub reference_hz: f32,
    /// Vertical scale of the water mesh.
    pub wave_height: f32,
    /// Vertical scale of the seabed mesh.
    pub sand_height: f32,
    /// World distance between neighbouring vertices.
    pub cell_spacing: f32,
    /// Seed of the Perlin generator.
    pub noise_seed: u32,
    /// Seed for the random water offsets; entropy when unset.
    pub rng_seed: Option<u64>,
    pub initial_mode: SimulationMode,
    pub initial_style: ColorStyle,
    pub buoyancy: BuoyancyConfig,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            sand_offset: Vec2::new(10.0, 5.0),
            sand_noise_scale: 4.0,
            water_noise_scale: 10.0,
            scroll_speed: 0.05,
            staggered_updates: true,
            frame_coupled: true,
            reference_hz: 60.0,
            wave_height: 6.0,
            sand_height: 3.0,
            cell_spacing: 2.0,
            noise_seed: 0,
            rng_seed: None,
            initial_mode: SimulationMode::FullFidelity,
            initial_style: ColorStyle::Clear,
            buoyancy: BuoyancyConfig::default(),
        }
    }
}

impl WaterConfig {
    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 2 || self.grid_size % 2 != 0 {
            return Err(format!("grid_size must be an even number >= 2, got {}", self.grid_size));
        }
        for (name, value) in [
            ("sand_noise_scale", self.sand_noise_scale),
            ("water_noise_scale", self.water_noise_scale),
            ("reference_hz", self.reference_hz),
            ("cell_spacing", self.cell_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed < 0.0 {
            return Err(format!("scroll_speed must be non-negative, got {}", self.scroll_speed));
        }
        let cell = self.buoyancy.sample_cell;
        if cell.x as usize >= self.grid_size || cell.y as usize >= self.grid_size {
            return Err(format!(
                "buoyancy sample cell ({}, {}) is outside the {}x{} grid",
                cell.x, cell.y, self.grid_size, self.grid_size
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse water config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config from the default location, or returns the defaults.
    ///
    /// Location is platform-specific:
    /// - macOS: ~/Library/Application Support/shallows/
    /// - Linux: ~/.config/shallows/
    /// - Windows: %APPDATA%/shallows/
    pub fn load_from_file() -> Self {
        let Some(path) = Self::get_config_path() else {
            warn!("Could not determine config directory, using default water config");
            return Self::default();
        };

        if !path.exists() {
            info!("No water config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!("Loaded water config from {:?}", path);
                    config
                }
                Err(e) => {
                    error!("{}", e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read water config: {}", e);
                Self::default()
            }
        }
    }

    pub fn get_config_dir() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("shallows");
            path
        })
    }

    pub fn get_config_path() -> Option<std::path::PathBuf> {
        Self::get_config_dir().map(|mut path| {
            path.push(CONFIG_FILE_NAME);
            path
        })
    }

    /// Writes the config to the default location, creating the directory if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let Some(path) = Self::get_config_path() else {
            return Err("Could not determine config directory".to_string());
        };

        if let Some(dir) = Self::get_config_dir() {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize water config: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write water config: {}", e))?;
        info!("Saved water config to {:?}", path);
        Ok(())
    }

    /// Centre of the grid in world space, on the x/z plane.
    pub fn world_center(&self) -> f32 {
        self.grid_size as f32 * self.cell_spacing / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(WaterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_odd_grid() {
        let config = WaterConfig {
            grid_size: 11,
            ..default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_sample_outside_grid() {
        let mut config = WaterConfig {
            grid_size: 4,
            ..default()
        };
        config.buoyancy.sample_cell = UVec2::new(5, 8);
        let err = config.validate().unwrap_err();
        assert!(err.contains("outside"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_zero_scale() {
        let config = WaterConfig {
            water_noise_scale: 0.0,
            ..default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{ "grid_size": 10, "initial_mode": "LowCost" }"#;
        let config = WaterConfig::from_json(json).unwrap();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.initial_mode, SimulationMode::LowCost);
        assert_eq!(config.scroll_speed, 0.05);
        assert_eq!(config.buoyancy, BuoyancyConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = WaterConfig {
            grid_size: 10,
            rng_seed: Some(99),
            initial_style: ColorStyle::Opaque,
            ..default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(WaterConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(WaterConfig::from_json("{ not json").is_err());
        assert!(WaterConfig::from_json(r#"{ "grid_size": 3 }"#).is_err());
    }

    #[test]
    fn test_world_center() {
        let config = WaterConfig::default();
        assert_eq!(config.world_center(), 14.0);
    }
}
