//! Height-field update strategies.
//!
//! [`FullFidelityUpdater`] resamples noise for every written cell.
//! [`InterpolatedUpdater`] never touches the noise source: it blends the
//! cached fixed-point samples under a scrolling window, wrapping the grid
//! as if it were a torus. The noise is not periodic over N, so a faint seam
//! shows where the window wraps; that artifact is accepted.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::features::water::grid::{lerp_fixed, to_fixed};
use crate::features::water::noise_source::{sanitize_sample, NoiseSource};
use crate::features::water::surface::{TouchedCells, WaterField};

/// Which update strategy drives the water surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Fresh noise for every written cell.
    #[default]
    FullFidelity,
    /// Interpolation over the cached samples.
    LowCost,
}

impl SimulationMode {
    pub fn toggled(self) -> Self {
        match self {
            SimulationMode::FullFidelity => SimulationMode::LowCost,
            SimulationMode::LowCost => SimulationMode::FullFidelity,
        }
    }

    pub fn updater(self) -> &'static dyn HeightFieldUpdater {
        match self {
            SimulationMode::FullFidelity => &FullFidelityUpdater,
            SimulationMode::LowCost => &InterpolatedUpdater,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimulationMode::FullFidelity => "Full",
            SimulationMode::LowCost => "Fast",
        }
    }
}

/// Whether a pass is the forced seeding pass or a regular frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdatePass {
    /// Writes every cell regardless of parity.
    Initialize,
    /// Regular per-frame pass, staggered when enabled.
    Frame,
}

/// Scroll and stagger state carried from frame to frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    /// Noise window scroll. In low-cost mode this stays in [0, 1) and is the
    /// interpolation factor.
    pub noise_offset: Vec2,
    /// Whole-cell carries of the scroll, kept modulo the grid size.
    pub grid_offset: UVec2,
    /// Flipped once per pass and once per visited cell.
    pub update_parity: bool,
}

/// Inputs shared by every cell of a pass.
pub struct UpdateContext<'a> {
    pub noise: &'a dyn NoiseSource,
    /// Divisor applied to cell coordinates before sampling.
    pub noise_scale: f32,
    /// Only update alternating cells each frame.
    pub staggered: bool,
}

pub trait HeightFieldUpdater: Send + Sync {
    /// Recomputes one cell's heights.
    fn write_cell(
        &self,
        field: &mut WaterField,
        x: usize,
        y: usize,
        animation: &AnimationState,
        ctx: &UpdateContext,
    );

    /// Runs one pass over the grid and returns the cells that were written.
    ///
    /// With staggering, the parity flips once up front and once per cell and a
    /// cell is written only when the flag is set after its flip. N is even, so
    /// the set of written cells alternates from one frame to the next.
    fn update(
        &self,
        field: &mut WaterField,
        animation: &mut AnimationState,
        ctx: &UpdateContext,
        pass: UpdatePass,
    ) -> TouchedCells {
        let size = field.size();
        let mut touched = TouchedCells(Vec::with_capacity(size * size));

        animation.update_parity = !animation.update_parity;
        for x in 0..size {
            for y in 0..size {
                animation.update_parity = !animation.update_parity;
                let due = pass == UpdatePass::Initialize
                    || !ctx.staggered
                    || animation.update_parity;
                if due {
                    self.write_cell(field, x, y, animation, ctx);
                    touched.push(x, y);
                }
            }
        }

        touched
    }
}

pub struct FullFidelityUpdater;

impl HeightFieldUpdater for FullFidelityUpdater {
    fn write_cell(
        &self,
        field: &mut WaterField,
        x: usize,
        y: usize,
        animation: &AnimationState,
        ctx: &UpdateContext,
    ) {
        let nx = (x as f32 + animation.noise_offset.x) / ctx.noise_scale;
        let ny = (y as f32 + animation.noise_offset.y) / ctx.noise_scale;
        let height = sanitize_sample(ctx.noise.sample(nx, ny));

        let cell = field.cell_mut(x, y);
        cell.height = height;
        cell.fixed_height = to_fixed(height);
        cell.render_height = cell.fixed_height;
    }
}

pub struct InterpolatedUpdater;

impl InterpolatedUpdater {
    /// Interpolated elevation for `(x, y)` without writing it.
    pub fn sample(field: &WaterField, x: usize, y: usize, animation: &AnimationState) -> i32 {
        let gx = animation.grid_offset.x as usize;
        let gy = animation.grid_offset.y as usize;

        let horizontal = lerp_fixed(
            field.cached_wrapped(x + gx, y),
            field.cached_wrapped(x + 1 + gx, y),
            animation.noise_offset.x,
        );
        let vertical = lerp_fixed(
            field.cached_wrapped(x, y + gy),
            field.cached_wrapped(x, y + 1 + gy),
            animation.noise_offset.y,
        );

        (horizontal + vertical) / 2
    }
}

impl HeightFieldUpdater for InterpolatedUpdater {
    fn write_cell(
        &self,
        field: &mut WaterField,
        x: usize,
        y: usize,
        animation: &AnimationState,
        _ctx: &UpdateContext,
    ) {
        let h = Self::sample(field, x, y, animation);
        field.cell_mut(x, y).render_height = h;
    }
}
