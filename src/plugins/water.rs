use bevy::prelude::*;
use crate::features::water::simulation::{WaterSet, WaterSimulationPlugin};
use crate::features::water::render::WaterRenderPlugin;
use crate::features::water::debug::WaterDebugPlugin;
use crate::systems::water_input_system;

pub struct WaterPlugin;

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            WaterSimulationPlugin,
            WaterRenderPlugin,
            WaterDebugPlugin,
        ))
        .add_systems(Update, water_input_system.in_set(WaterSet::Input));

        info!("Water systems initialized");
    }
}
