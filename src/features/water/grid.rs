//! Square height-field lattice and the fixed-point helpers shared by the
//! sand and water fields.

use bevy::prelude::*;

/// Fixed-point representation of 1.0.
pub const FIXED_ONE: i32 = 4096;

/// Grid size used by default.
pub const DEFAULT_GRID_SIZE: usize = 14;

/// Converts a float height to fixed point, truncating toward zero.
/// Non-finite input maps to 0 so a bad sample cannot poison the cache.
pub fn to_fixed(value: f32) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    (value * FIXED_ONE as f32) as i32
}

/// Converts a fixed-point height back to float.
pub fn from_fixed(value: i32) -> f32 {
    value as f32 / FIXED_ONE as f32
}

/// Linear interpolation between two fixed-point samples.
///
/// `f` is quantized to 1/4096 and clamped to [0, 1]; the blend floors, so
/// the result always lies between `a` and `b` inclusive.
pub fn lerp_fixed(a: i32, b: i32, f: f32) -> i32 {
    let weight = to_fixed(f).clamp(0, FIXED_ONE) as i64;
    let span = b as i64 - a as i64;
    (a as i64 + (span * weight).div_euclid(FIXED_ONE as i64)) as i32
}

/// N×N lattice stored row-major by `x`, matching `cells[x][y]` indexing.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> HeightGrid<T> {
    /// Creates a grid filled with default cells.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }
}

impl<T> HeightGrid<T> {
    /// Builds a grid by evaluating `f` for every `(x, y)`.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for x in 0..size {
            for y in 0..size {
                cells.push(f(x, y));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size, "cell ({x}, {y}) out of grid");
        x * self.size + y
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.cells[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let index = self.index(x, y);
        &mut self.cells[index]
    }

    /// Returns the cell with both coordinates wrapped modulo the grid size.
    pub fn get_wrapped(&self, x: usize, y: usize) -> &T {
        self.get(x % self.size, y % self.size)
    }

    /// Iterates cells with their coordinates in `x`-major order.
    pub fn iter(&self) -> impl Iterator<Item = (UVec2, &T)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (UVec2::new((i / size) as u32, (i % size) as u32), cell))
    }
}
