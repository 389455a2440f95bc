//! Frame driver for the water surface.
//!
//! [`WaterSimulation`] owns the seabed, the water field and every piece of
//! animation state. A single system advances it once per frame; renderers
//! read it afterwards.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::events::{ToggleWaterModeEvent, ToggleWaterStyleEvent};
use crate::features::water::buoyancy::BuoyancyConfig;
use crate::features::water::grid::from_fixed;
use crate::features::water::noise_source::{NoiseSource, PerlinNoise};
use crate::features::water::sand::SandField;
use crate::features::water::shading::{shade, ColorStyle};
use crate::features::water::surface::{TouchedCells, WaterCell, WaterField};
use crate::features::water::updater::{
    AnimationState, FullFidelityUpdater, HeightFieldUpdater, SimulationMode, UpdateContext,
    UpdatePass,
};
use crate::resources::{CliArgs, WaterConfig};
use crate::systems::{advance_water_simulation, apply_water_toggles};

/// Upper bound (exclusive) of the random full-fidelity noise offsets.
const RANDOM_OFFSET_RANGE: u32 = 10_000;

/// Ordering of the per-frame water work.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WaterSet {
    /// Input and UI that emit toggle events.
    Input,
    /// Applies toggles and advances the simulation.
    Simulate,
    /// Copies the simulation into meshes and transforms.
    Present,
}

/// Loads the config, builds [`WaterSimulation`] and advances it every frame.
///
/// A [`WaterConfig`] already inserted in the app takes precedence over the
/// config file; [`CliArgs`], when present, override either.
#[derive(Default)]
pub struct WaterSimulationPlugin;

impl Plugin for WaterSimulationPlugin {
    fn build(&self, app: &mut App) {
        let cli = app.world().get_resource::<CliArgs>().cloned().unwrap_or_default();
        let mut config = app
            .world()
            .get_resource::<WaterConfig>()
            .cloned()
            .unwrap_or_else(WaterConfig::load_from_file);
        cli.apply(&mut config);

        let (config, simulation) = match WaterSimulation::from_config(&config) {
            Ok(simulation) => (config, simulation),
            Err(e) => {
                error!("Invalid water config: {}; falling back to defaults", e);
                let mut fallback = WaterConfig::default();
                cli.apply(&mut fallback);
                match WaterSimulation::from_config(&fallback) {
                    Ok(simulation) => (fallback, simulation),
                    Err(e) => {
                        error!("Command line overrides rejected: {}", e);
                        (WaterConfig::default(), WaterSimulation::default())
                    }
                }
            }
        };

        if cli.write_config {
            if let Err(e) = config.save_to_file() {
                error!("{}", e);
            }
        }

        app.configure_sets(
            Update,
            (WaterSet::Input, WaterSet::Simulate, WaterSet::Present).chain(),
        )
        .add_event::<ToggleWaterStyleEvent>()
        .add_event::<ToggleWaterModeEvent>()
        .insert_resource(config)
        .insert_resource(simulation)
        .add_systems(
            Update,
            (apply_water_toggles, advance_water_simulation)
                .chain()
                .in_set(WaterSet::Simulate),
        );
    }
}

/// Per-frame stepping parameters copied out of [`WaterConfig`].
#[derive(Clone, Debug)]
struct StepSettings {
    water_noise_scale: f32,
    scroll_speed: f32,
    staggered: bool,
    frame_coupled: bool,
    reference_hz: f32,
}

#[derive(Resource)]
pub struct WaterSimulation {
    sand: SandField,
    water: WaterField,
    animation: AnimationState,
    mode: SimulationMode,
    style: ColorStyle,
    noise: Box<dyn NoiseSource>,
    rng: StdRng,
    settings: StepSettings,
    buoyancy: BuoyancyConfig,
    float_height: f32,
    frame: u64,
    last_touched: usize,
}

impl WaterSimulation {
    /// Builds the simulation with Perlin noise seeded from the config.
    pub fn from_config(config: &WaterConfig) -> Result<Self, String> {
        Self::new(config, Box::new(PerlinNoise::new(config.noise_seed)))
    }

    /// Builds the seabed and seeds every water cell with a full noise pass.
    pub fn new(config: &WaterConfig, noise: Box<dyn NoiseSource>) -> Result<Self, String> {
        config.validate()?;
        Ok(Self::build(config, noise))
    }

    fn build(config: &WaterConfig, noise: Box<dyn NoiseSource>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sand = SandField::generate(
            config.grid_size,
            config.sand_offset,
            config.sand_noise_scale,
            noise.as_ref(),
        );

        let mut simulation = Self {
            sand,
            water: WaterField::new(config.grid_size),
            animation: AnimationState::default(),
            mode: config.initial_mode,
            style: config.initial_style,
            noise,
            rng,
            settings: StepSettings {
                water_noise_scale: config.water_noise_scale,
                scroll_speed: config.scroll_speed,
                staggered: config.staggered_updates,
                frame_coupled: config.frame_coupled,
                reference_hz: config.reference_hz,
            },
            buoyancy: config.buoyancy.clone(),
            float_height: 0.0,
            frame: 0,
            last_touched: 0,
        };

        if simulation.mode == SimulationMode::FullFidelity {
            simulation.randomize_noise_offset();
        }
        simulation.initialize();

        info!(
            "Water simulation ready: {}x{} grid, {} mode, {} style",
            config.grid_size,
            config.grid_size,
            simulation.mode.label(),
            simulation.style.label()
        );
        simulation
    }

    /// Samples noise for every cell at the current offsets, ignoring parity,
    /// then shades the whole grid.
    pub fn initialize(&mut self) {
        let ctx = UpdateContext {
            noise: self.noise.as_ref(),
            noise_scale: self.settings.water_noise_scale,
            staggered: self.settings.staggered,
        };
        let touched = FullFidelityUpdater.update(
            &mut self.water,
            &mut self.animation,
            &ctx,
            UpdatePass::Initialize,
        );
        self.shade_cells(&touched);
        self.update_float();
        self.last_touched = touched.len();
    }

    /// Advances the simulation by one frame and returns how many cells were written.
    ///
    /// `delta_secs` is only used when the config is not frame-coupled.
    pub fn advance(&mut self, delta_secs: f32) -> usize {
        let step = self.scroll_step(delta_secs);
        self.animation.noise_offset += Vec2::splat(step);

        if self.mode == SimulationMode::LowCost {
            self.carry_grid_offset();
        }

        let ctx = UpdateContext {
            noise: self.noise.as_ref(),
            noise_scale: self.settings.water_noise_scale,
            staggered: self.settings.staggered,
        };
        let touched =
            self.mode
                .updater()
                .update(&mut self.water, &mut self.animation, &ctx, UpdatePass::Frame);

        self.shade_cells(&touched);
        self.update_float();

        self.frame += 1;
        self.last_touched = touched.len();
        self.last_touched
    }

    fn scroll_step(&self, delta_secs: f32) -> f32 {
        let step = if self.settings.frame_coupled {
            self.settings.scroll_speed
        } else {
            self.settings.scroll_speed * delta_secs * self.settings.reference_hz
        };
        if step.is_finite() {
            step.max(0.0)
        } else {
            0.0
        }
    }

    /// Moves whole cells of scroll into the grid offset so the interpolation
    /// factor stays in [0, 1).
    fn carry_grid_offset(&mut self) {
        let size = self.water.size() as u64;
        let animation = &mut self.animation;
        let carry = animation.noise_offset.floor().max(Vec2::ZERO);

        let wrap = |offset: u32, cells: f32| ((offset as u64 + cells as u64 % size) % size) as u32;
        animation.grid_offset.x = wrap(animation.grid_offset.x, carry.x);
        animation.grid_offset.y = wrap(animation.grid_offset.y, carry.y);
        animation.noise_offset = (animation.noise_offset - carry).clamp(Vec2::ZERO, Vec2::ONE);
    }

    fn randomize_noise_offset(&mut self) {
        self.animation.noise_offset = Vec2::new(
            self.rng.gen_range(0..RANDOM_OFFSET_RANGE) as f32,
            self.rng.gen_range(0..RANDOM_OFFSET_RANGE) as f32,
        );
    }

    /// Switches the update strategy, resetting the scroll state so the two
    /// offset meanings never mix. The cached samples carry over unchanged.
    pub fn set_mode(&mut self, mode: SimulationMode) {
        if mode == self.mode {
            return;
        }

        self.mode = mode;
        self.animation.grid_offset = UVec2::ZERO;
        match mode {
            SimulationMode::LowCost => {
                self.animation.noise_offset = Vec2::ZERO;
            }
            SimulationMode::FullFidelity => {
                self.randomize_noise_offset();
            }
        }
        info!("Water mode switched to {}", mode.label());
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Changes the palette and reshades every cell.
    pub fn set_style(&mut self, style: ColorStyle) {
        if style == self.style {
            return;
        }

        self.style = style;
        let size = self.water.size();
        let mut all = TouchedCells(Vec::with_capacity(size * size));
        for x in 0..size {
            for y in 0..size {
                all.push(x, y);
            }
        }
        self.shade_cells(&all);
        info!("Water style switched to {}", style.label());
    }

    pub fn toggle_style(&mut self) {
        self.set_style(self.style.toggled());
    }

    /// Water height seen by the shader and buoyancy for the active mode.
    pub fn effective_height(&self, cell: &WaterCell) -> f32 {
        match self.mode {
            SimulationMode::FullFidelity => cell.height,
            SimulationMode::LowCost => from_fixed(cell.render_height),
        }
    }

    fn sand_height(&self, x: usize, y: usize) -> f32 {
        let sand = self.sand.cell(x, y);
        match self.mode {
            SimulationMode::FullFidelity => sand.height,
            SimulationMode::LowCost => from_fixed(sand.fixed_height),
        }
    }

    fn shade_cells(&mut self, touched: &TouchedCells) {
        for (x, y) in touched.iter() {
            let water = self.effective_height(self.water.cell(x, y));
            let sand = self.sand_height(x, y);
            self.water.cell_mut(x, y).color = shade(water, sand, self.style);
        }
    }

    fn update_float(&mut self) {
        let cell = self.buoyancy.sample_cell;
        let sampled = self.effective_height(self.water.cell(cell.x as usize, cell.y as usize));
        self.float_height = self.buoyancy.float_height(sampled);
    }

    pub fn sand(&self) -> &SandField {
        &self.sand
    }

    pub fn water(&self) -> &WaterField {
        &self.water
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn style(&self) -> ColorStyle {
        self.style
    }

    pub fn grid_size(&self) -> usize {
        self.water.size()
    }

    pub fn float_height(&self) -> f32 {
        self.float_height
    }

    pub fn float_position(&self) -> Vec3 {
        self.buoyancy.float_position(self.effective_height(self.sample_cell()))
    }

    fn sample_cell(&self) -> &WaterCell {
        let cell = self.buoyancy.sample_cell;
        self.water.cell(cell.x as usize, cell.y as usize)
    }

    /// Frames advanced since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Cells written by the most recent pass.
    pub fn last_touched(&self) -> usize {
        self.last_touched
    }
}

impl Default for WaterSimulation {
    fn default() -> Self {
        let config = WaterConfig::default();
        Self::build(&config, Box::new(PerlinNoise::new(config.noise_seed)))
    }
}
