use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::events::{ToggleWaterModeEvent, ToggleWaterStyleEvent};
use crate::features::water::simulation::WaterSimulation;
use crate::plugins::input::WaterAction;

/// Turns key presses into toggle events.
pub fn water_input_system(
    query: Query<&ActionState<WaterAction>>,
    mut style_events: EventWriter<ToggleWaterStyleEvent>,
    mut mode_events: EventWriter<ToggleWaterModeEvent>,
) {
    for action_state in query.iter() {
        if action_state.just_pressed(&WaterAction::ToggleStyle) {
            style_events.send(ToggleWaterStyleEvent);
        }
        if action_state.just_pressed(&WaterAction::ToggleMode) {
            mode_events.send(ToggleWaterModeEvent);
        }
    }
}

/// Applies pending style and mode toggles before the frame is simulated.
pub fn apply_water_toggles(
    mut simulation: ResMut<WaterSimulation>,
    mut style_events: EventReader<ToggleWaterStyleEvent>,
    mut mode_events: EventReader<ToggleWaterModeEvent>,
) {
    for _event in style_events.read() {
        simulation.toggle_style();
    }
    for _event in mode_events.read() {
        simulation.toggle_mode();
    }
}

/// Advances the water surface by one frame.
pub fn advance_water_simulation(mut simulation: ResMut<WaterSimulation>, time: Res<Time>) {
    simulation.advance(time.delta_secs());
}
