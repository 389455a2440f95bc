// Camera-related components.

use bevy::prelude::*;

/// Camera that circles the water grid at a fixed height.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    /// Current angle around the target, in radians.
    pub angle: f32,
    /// Angle added every frame.
    pub speed: f32,
    /// Distance from the target on the x/z plane.
    pub radius: f32,
    /// Eye height above the ground plane.
    pub height: f32,
    /// Point the camera looks at.
    pub target: Vec3,
}

impl OrbitCamera {
    /// Creates an orbit around the centre of a grid spanning `2 * center` world units.
    pub fn around(center: f32) -> Self {
        Self {
            angle: 0.0,
            speed: 0.003,
            radius: center,
            height: 12.0,
            target: Vec3::new(center, 1.0, center),
        }
    }

    /// Eye position for the current angle.
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.target.x - self.angle.sin() * self.radius,
            self.height,
            self.target.z - self.angle.cos() * self.radius,
        )
    }

    /// Advances the orbit by one frame.
    pub fn advance(&mut self) {
        self.angle = (self.angle + self.speed) % std::f32::consts::TAU;
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_at_zero_angle() {
        let orbit = OrbitCamera::around(14.0);
        let eye = orbit.eye();
        assert_eq!(eye, Vec3::new(14.0, 12.0, 0.0));
    }

    #[test]
    fn test_advance_wraps() {
        let mut orbit = OrbitCamera {
            angle: std::f32::consts::TAU - 0.001,
            ..OrbitCamera::around(10.0)
        };
        orbit.advance();
        assert!(orbit.angle < 0.01);
    }

    #[test]
    fn test_eye_keeps_radius() {
        let mut orbit = OrbitCamera::around(10.0);
        for _ in 0..500 {
            orbit.advance();
        }
        let eye = orbit.eye();
        let planar = Vec2::new(eye.x - 10.0, eye.z - 10.0).length();
        assert!((planar - 10.0).abs() < 1e-4);
    }
}
