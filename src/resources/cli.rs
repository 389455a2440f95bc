use bevy::prelude::*;

use crate::features::water::shading::ColorStyle;
use crate::features::water::updater::SimulationMode;
use crate::resources::WaterConfig;

/// Command-line arguments parsed at startup.
/// Each flag overrides the matching field of the loaded [`WaterConfig`].
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// Start in the interpolated low-cost mode.
    /// Usage: `cargo run -- --fast`
    pub fast: bool,

    /// Start with the opaque palette.
    /// Usage: `cargo run -- --opaque`
    pub opaque: bool,

    /// Override the grid size (must be even).
    /// Usage: `cargo run -- --grid 10`
    pub grid_size: Option<usize>,

    /// Override the Perlin seed.
    /// Usage: `cargo run -- --seed 1234`
    pub noise_seed: Option<u32>,

    /// Persist the effective config to the config directory.
    /// Usage: `cargo run -- --grid 10 --write-config`
    pub write_config: bool,
}

impl CliArgs {
    /// Parse the process arguments.
    pub fn parse() -> Self {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse arguments, excluding the program name.
    /// Supports:
    /// - `--fast`: start in low-cost mode
    /// - `--opaque`: start with the opaque palette
    /// - `--grid <n>`: grid size
    /// - `--seed <n>`: noise seed
    /// - `--write-config`: save the effective config
    pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Self {
        let args: Vec<String> = args.into_iter().collect();
        let mut cli = CliArgs::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--fast" => {
                    cli.fast = true;
                    i += 1;
                }
                "--opaque" => {
                    cli.opaque = true;
                    i += 1;
                }
                "--write-config" => {
                    cli.write_config = true;
                    i += 1;
                }
                "--grid" => {
                    match args.get(i + 1).map(|v| v.parse::<usize>()) {
                        Some(Ok(size)) => {
                            cli.grid_size = Some(size);
                            info!("CLI: Grid size set to {}", size);
                            i += 2;
                        }
                        Some(Err(e)) => {
                            warn!("CLI: Invalid --grid value '{}': {}", args[i + 1], e);
                            i += 2;
                        }
                        None => {
                            warn!("CLI: --grid requires a size argument");
                            i += 1;
                        }
                    }
                }
                "--seed" => {
                    match args.get(i + 1).map(|v| v.parse::<u32>()) {
                        Some(Ok(seed)) => {
                            cli.noise_seed = Some(seed);
                            info!("CLI: Noise seed set to {}", seed);
                            i += 2;
                        }
                        Some(Err(e)) => {
                            warn!("CLI: Invalid --seed value '{}': {}", args[i + 1], e);
                            i += 2;
                        }
                        None => {
                            warn!("CLI: --seed requires a number argument");
                            i += 1;
                        }
                    }
                }
                arg => {
                    if arg.starts_with('-') {
                        warn!("CLI: Unknown argument '{}'", arg);
                    }
                    i += 1;
                }
            }
        }

        cli
    }

    /// Applies the overrides to `config`.
    pub fn apply(&self, config: &mut WaterConfig) {
        if self.fast {
            config.initial_mode = SimulationMode::LowCost;
        }
        if self.opaque {
            config.initial_style = ColorStyle::Opaque;
        }
        if let Some(size) = self.grid_size {
            config.grid_size = size;

            // Keep the buoyancy sample on the resized grid.
            let last = size.saturating_sub(1) as u32;
            let cell = config.buoyancy.sample_cell;
            if cell.x > last || cell.y > last {
                config.buoyancy.sample_cell = cell.min(UVec2::splat(last));
                info!(
                    "CLI: Buoyancy sample cell moved from ({}, {}) to ({}, {})",
                    cell.x, cell.y, config.buoyancy.sample_cell.x, config.buoyancy.sample_cell.y
                );
            }
        }
        if let Some(seed) = self.noise_seed {
            config.noise_seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let cli =
            CliArgs::parse_from(args(&["--fast", "--opaque", "--grid", "10", "--seed", "77"]));
        assert!(cli.fast);
        assert!(cli.opaque);
        assert_eq!(cli.grid_size, Some(10));
        assert_eq!(cli.noise_seed, Some(77));
        assert!(!cli.write_config);
    }

    #[test]
    fn test_bad_values_are_skipped() {
        let cli = CliArgs::parse_from(args(&["--grid", "many", "--unknown", "--seed"]));
        assert_eq!(cli.grid_size, None);
        assert_eq!(cli.noise_seed, None);
    }

    #[test]
    fn test_apply_overrides_config() {
        let cli = CliArgs::parse_from(args(&["--fast", "--grid", "10"]));
        let mut config = WaterConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.initial_mode, SimulationMode::LowCost);
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.initial_style, ColorStyle::Clear);
    }

    #[test]
    fn test_small_grid_pulls_sample_cell_inside() {
        let cli = CliArgs::parse_from(args(&["--grid", "4", "--seed", "3"]));
        let mut config = WaterConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.buoyancy.sample_cell, UVec2::new(3, 3));
        assert_eq!(config.noise_seed, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_large_grid_keeps_sample_cell() {
        let cli = CliArgs::parse_from(args(&["--grid", "20"]));
        let mut config = WaterConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.buoyancy.sample_cell, UVec2::new(5, 8));
    }
}
