pub mod camera;
pub mod water;

pub use camera::*;
pub use water::*;
