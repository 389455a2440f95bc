use bevy::prelude::*;

/// Request to switch between the clear and opaque water palettes.
#[derive(Event, Debug, Default)]
pub struct ToggleWaterStyleEvent;

/// Request to switch between full-fidelity and interpolated water.
#[derive(Event, Debug, Default)]
pub struct ToggleWaterModeEvent;
