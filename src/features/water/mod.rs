pub mod grid;
pub mod noise_source;
pub mod sand;
pub mod surface;
pub mod shading;
pub mod updater;
pub mod buoyancy;
pub mod simulation;
pub mod render;
pub mod debug;
