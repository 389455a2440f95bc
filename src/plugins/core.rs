use bevy::prelude::*;
use crate::components::OrbitCamera;
use crate::features::water::simulation::WaterSet;
use crate::plugins::input::get_default_input_map;
use crate::resources::WaterConfig;
use crate::systems::orbit_camera_system;
use leafwing_input_manager::prelude::*;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, orbit_camera_system.in_set(WaterSet::Present));
    }
}

fn spawn_camera(mut commands: Commands, config: Res<WaterConfig>) {
    let orbit = OrbitCamera::around(config.world_center());

    commands.spawn((
        Camera3d::default(),
        orbit.transform(),
        orbit,
        InputManagerBundle::with_map(get_default_input_map()),
    ));
}
