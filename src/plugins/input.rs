use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum WaterAction {
    /// Switch between the clear and opaque palettes.
    ToggleStyle,
    /// Switch between full-fidelity and interpolated water.
    ToggleMode,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<WaterAction>::default());
    }
}

pub fn get_default_input_map() -> InputMap<WaterAction> {
    let mut input_map = InputMap::default();

    input_map.insert(WaterAction::ToggleStyle, KeyCode::KeyA);
    input_map.insert(WaterAction::ToggleMode, KeyCode::KeyB);

    input_map
}

