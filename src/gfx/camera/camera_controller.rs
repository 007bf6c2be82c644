use crate::config::Settings;
use crate::Real;

use super::editor_camera::EditorCamera;

/// Maps secondary-button drags and wheel input onto the editor camera
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Degrees per pixel for orbiting
    pub orbit_speed: Real,
    /// Degrees per pixel for face rotation
    pub face_speed: Real,
    /// Translation per wheel unit
    pub wheel_speed: Real,
}

impl CameraController {
    pub fn new(orbit_speed: Real, face_speed: Real, wheel_speed: Real) -> Self {
        Self {
            orbit_speed,
            face_speed,
            wheel_speed,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.orbit_speed, settings.face_speed, settings.wheel_speed)
    }

    /// Secondary-button drag: orbit, or rotate the face when ctrl is held.
    /// The caller refreshes the view afterwards.
    pub fn process_drag(&self, delta_x: Real, delta_y: Real, ctrl: bool, camera: &mut EditorCamera) {
        if ctrl {
            camera.face_y += delta_x * self.face_speed;
            camera.face_x += delta_y * self.face_speed;
        } else {
            camera.angle_y += delta_x * self.orbit_speed;
            camera.angle_x += delta_y * self.orbit_speed;
        }
    }

    /// Wheel translation: shift moves along y, ctrl along x, otherwise along z
    pub fn process_wheel(&self, delta: Real, shift: bool, ctrl: bool, camera: &mut EditorCamera) {
        let amount = delta.abs() * self.wheel_speed;
        let wheel = if delta > 0.0 { amount } else { -amount };

        if shift {
            camera.pos.y -= wheel;
        } else if ctrl {
            camera.pos.x -= wheel;
        } else {
            camera.pos.z += wheel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> EditorCamera {
        EditorCamera::new(800, 600, &Settings::default())
    }

    #[test]
    fn test_wheel_axis_follows_modifiers() {
        let controller = CameraController::from_settings(&Settings::default());
        let mut cam = camera();
        let start = cam.pos;

        controller.process_wheel(100.0, false, false, &mut cam);
        assert!((cam.pos.z - (start.z + 0.5)).abs() < 1e-12);

        controller.process_wheel(100.0, true, false, &mut cam);
        assert!((cam.pos.y - (start.y - 0.5)).abs() < 1e-12);

        controller.process_wheel(-100.0, false, true, &mut cam);
        assert!((cam.pos.x - (start.x + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_drag_orbits_or_rotates_face() {
        let controller = CameraController::from_settings(&Settings::default());
        let mut cam = camera();
        let (ax, ay) = (cam.angle_x, cam.angle_y);

        controller.process_drag(10.0, 4.0, false, &mut cam);
        assert_eq!(cam.angle_y, ay + 5.0);
        assert_eq!(cam.angle_x, ax + 2.0);

        controller.process_drag(10.0, 0.0, true, &mut cam);
        assert!((cam.face_y - 1.0).abs() < 1e-12);
    }
}
