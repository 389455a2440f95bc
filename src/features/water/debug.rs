use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::events::{ToggleWaterModeEvent, ToggleWaterStyleEvent};
use crate::features::water::grid::from_fixed;
use crate::features::water::render::quad_count;
use crate::features::water::simulation::{WaterSet, WaterSimulation};

/// On-screen overlay with performance counters, the current water settings
/// and buttons mirroring the keyboard toggles.
pub struct WaterDebugPlugin;

impl Plugin for WaterDebugPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        }

        app.add_systems(Update, water_debug_panel.in_set(WaterSet::Input));
    }
}

fn water_debug_panel(
    mut contexts: EguiContexts,
    simulation: Res<WaterSimulation>,
    diagnostics: Res<DiagnosticsStore>,
    mut style_events: EventWriter<ToggleWaterStyleEvent>,
    mut mode_events: EventWriter<ToggleWaterModeEvent>,
) {
    egui::Window::new("Water").show(contexts.ctx_mut(), |ui| {
        if let Some(fps) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|diag| diag.smoothed())
        {
            ui.label(format!("FPS: {:.1}", fps));
        }
        ui.label(format!("Quads: {}", quad_count(simulation.grid_size())));
        ui.label(format!(
            "Cells updated: {}/{}",
            simulation.last_touched(),
            simulation.grid_size() * simulation.grid_size()
        ));

        ui.separator();
        let animation = simulation.animation();
        ui.label(format!("Mode: {}", simulation.mode().label()));
        ui.label(format!("Style: {}", simulation.style().label()));
        ui.label(format!(
            "Noise offset: ({:.2}, {:.2})",
            animation.noise_offset.x, animation.noise_offset.y
        ));
        ui.label(format!(
            "Grid offset: ({}, {})",
            animation.grid_offset.x, animation.grid_offset.y
        ));
        if let Some((lowest, highest)) = simulation.water().render_range() {
            ui.label(format!(
                "Surface: {:.2} to {:.2}",
                from_fixed(lowest),
                from_fixed(highest)
            ));
        }
        ui.label(format!("Crate height: {:.2}", simulation.float_height()));

        ui.separator();
        ui.label("A: Change water style");
        ui.label("B: Change water quality");
        ui.horizontal(|ui| {
            if ui.button("Style").clicked() {
                style_events.send(ToggleWaterStyleEvent);
            }
            if ui.button("Quality").clicked() {
                mode_events.send(ToggleWaterModeEvent);
            }
        });
    });
}
