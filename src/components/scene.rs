use bevy::prelude::*;

/// Marker for the animated water surface mesh.
#[derive(Component)]
pub struct WaterSurface;

/// Marker for the seabed mesh.
#[derive(Component)]
pub struct SandSurface;

/// Marker for the crate that bobs on the water.
#[derive(Component)]
pub struct FloatingCrate;
