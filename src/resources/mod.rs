pub mod cli;
pub mod water_config;

pub use cli::*;
pub use water_config::*;
