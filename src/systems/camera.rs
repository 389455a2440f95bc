// Camera systems.

use bevy::prelude::*;

use crate::components::OrbitCamera;

/// Moves every orbit camera one step around its target.
pub fn orbit_camera_system(mut query: Query<(&mut OrbitCamera, &mut Transform)>) {
    for (mut orbit, mut transform) in query.iter_mut() {
        orbit.advance();
        *transform = orbit.transform();
    }
}
