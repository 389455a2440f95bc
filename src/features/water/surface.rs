use bevy::prelude::*;

use crate::features::water::grid::{from_fixed, HeightGrid};
use crate::features::water::shading::PackedColor;

/// Represents a single vertex of the animated water surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterCell {
    /// Last noise sample written by the full-fidelity path.
    pub height: f32,

    /// `height` in fixed point. Cache read by the interpolated path.
    pub fixed_height: i32,

    /// Fixed-point elevation rendered this frame.
    pub render_height: i32,

    /// Packed 5-bit-per-channel tint.
    pub color: PackedColor,
}

impl WaterCell {
    /// Render height on the float scale.
    pub fn render_height_f32(&self) -> f32 {
        from_fixed(self.render_height)
    }
}

/// The animated water surface.
#[derive(Clone, Debug)]
pub struct WaterField {
    cells: HeightGrid<WaterCell>,
}

impl WaterField {
    pub fn new(size: usize) -> Self {
        Self {
            cells: HeightGrid::new(size),
        }
    }

    pub fn size(&self) -> usize {
        self.cells.size()
    }

    pub fn cell(&self, x: usize, y: usize) -> &WaterCell {
        self.cells.get(x, y)
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut WaterCell {
        self.cells.get_mut(x, y)
    }

    /// Cached fixed-point sample, with toroidal wrap on both axes.
    pub fn cached_wrapped(&self, x: usize, y: usize) -> i32 {
        self.cells.get_wrapped(x, y).fixed_height
    }

    pub fn cells(&self) -> &HeightGrid<WaterCell> {
        &self.cells
    }

    /// Highest and lowest rendered elevation, in fixed point.
    pub fn render_range(&self) -> Option<(i32, i32)> {
        self.cells.iter().map(|(_, c)| c.render_height).fold(None, |acc, h| match acc {
            None => Some((h, h)),
            Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
        })
    }
}

/// Cells written by one update pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchedCells(pub Vec<UVec2>);

impl TouchedCells {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.0.contains(&UVec2::new(x as u32, y as u32))
    }

    pub fn push(&mut self, x: usize, y: usize) {
        self.0.push(UVec2::new(x as u32, y as u32));
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|c| (c.x as usize, c.y as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_flat() {
        let field = WaterField::new(10);
        assert_eq!(field.size(), 10);
        assert_eq!(field.render_range(), Some((0, 0)));
    }

    #[test]
    fn test_cached_wrapped() {
        let mut field = WaterField::new(4);
        field.cell_mut(1, 2).fixed_height = 99;
        assert_eq!(field.cached_wrapped(5, 6), 99);
        assert_eq!(field.cached_wrapped(1, 2), 99);
    }

    #[test]
    fn test_render_height_f32() {
        let cell = WaterCell {
            render_height: 1024,
            ..default()
        };
        assert_eq!(cell.render_height_f32(), 0.25);
    }
}
