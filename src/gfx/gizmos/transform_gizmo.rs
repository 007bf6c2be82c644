//! # Transform Gizmo
//!
//! Three axis arms and a centre cube placed at the selection centre. The
//! gizmo scales with the distance to the eye so it keeps roughly the same size
//! on screen.

use cgmath::{InnerSpace, SquareMatrix, Zero};

use crate::gfx::gizmos::traits::Gizmo;
use crate::gfx::math::{rotation_matrix, transform_vector, Axis, Mat4, Vec3};
use crate::gfx::picking::{closer_result, hit_test_obb, HitResult};
use crate::gfx::selection::SelectionAggregate;
use crate::Real;

/// Scale per unit of distance between eye and gizmo
const DISTANCE_SCALE: Real = 0.1;

/// Half size of an arm before scaling
const ARM_HALF_SIZE: [Real; 3] = [0.1, 0.1, 0.2];

/// Offset of an arm's centre along the arm before scaling
const ARM_OFFSET: Real = 0.5;

/// Half size of the centre cube before scaling
const CENTER_HALF_SIZE: Real = 0.1;

/// One pickable box of the gizmo
#[derive(Debug, Clone, PartialEq)]
pub struct GizmoHandle {
    pub axis: Option<Axis>,
    pub center: Vec3,
    pub rotation: Mat4,
    pub half_size: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformGizmo {
    enabled: bool,
    visible: bool,
    pub pos: Vec3,
    pub scale: Real,
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self {
            enabled: true,
            visible: false,
            pos: Vec3::zero(),
            scale: 1.0,
        }
    }

    /// Arm rotation taking +z onto `axis`
    fn arm_rotation(axis: Axis) -> Mat4 {
        match axis {
            Axis::Z => Mat4::identity(),
            Axis::X => rotation_matrix(Vec3::new(0.0, 90.0, 0.0)),
            Axis::Y => rotation_matrix(Vec3::new(-90.0, 0.0, 0.0)),
        }
    }

    /// Handles in picking order: z, x, y arms then the centre
    pub fn handles(&self) -> Vec<GizmoHandle> {
        let s = self.scale;
        let mut handles: Vec<GizmoHandle> = [Axis::Z, Axis::X, Axis::Y]
            .into_iter()
            .map(|axis| {
                let rotation = Self::arm_rotation(axis);
                let offset = transform_vector(&rotation, Vec3::new(0.0, 0.0, ARM_OFFSET * s));
                GizmoHandle {
                    axis: Some(axis),
                    center: self.pos + offset,
                    rotation,
                    half_size: Vec3::from(ARM_HALF_SIZE) * s,
                }
            })
            .collect();

        handles.push(GizmoHandle {
            axis: None,
            center: self.pos,
            rotation: Mat4::identity(),
            half_size: Vec3::new(CENTER_HALF_SIZE, CENTER_HALF_SIZE, CENTER_HALF_SIZE) * s,
        });
        handles
    }
}

impl Gizmo for TransformGizmo {
    fn name(&self) -> &str {
        "Transform Gizmo"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn update(&mut self, selection: &SelectionAggregate, eye: Vec3) {
        self.visible = selection.visible;
        self.pos = selection.pos;
        self.scale = DISTANCE_SCALE * (eye - self.pos).magnitude();
    }

    fn test_click(&self, origin: Vec3, ray: Vec3) -> Option<HitResult> {
        if !self.should_be_visible() {
            return None;
        }
        self.handles().into_iter().fold(None, |closest, handle| {
            let hit = hit_test_obb(origin, ray, handle.center, &handle.rotation, handle.half_size);
            let hit = match handle.axis {
                Some(axis) => hit.map(|h| h.with_axis(axis)),
                None => hit,
            };
            closer_result(closest, hit)
        })
    }

    fn should_be_visible(&self) -> bool {
        self.enabled && self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::gfx::scene::{ItemKind, Scene, SolidMesh};

    fn gizmo_at_origin(eye: Vec3) -> TransformGizmo {
        let mut scene = Scene::new(false);
        let solid = SolidMesh::lumber(0.2, 0.2, 0.2, Vec3::new(-0.1, -0.1, -0.1), &Settings::default());
        let id = scene.add_item("a", ItemKind::Solid(solid));
        let mut selection = SelectionAggregate::new();
        selection.reset(&scene, &[id]);

        let mut gizmo = TransformGizmo::new();
        gizmo.update(&selection, eye);
        gizmo
    }

    #[test]
    fn test_scale_follows_eye_distance() {
        let gizmo = gizmo_at_origin(Vec3::new(0.0, 0.0, -10.0));
        assert!((gizmo.scale - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_arms_point_along_their_axes() {
        let gizmo = gizmo_at_origin(Vec3::new(0.0, 0.0, -10.0));
        let handles = gizmo.handles();
        assert!((handles[0].center - Vec3::new(0.0, 0.0, 0.5)).magnitude() < 1e-12);
        assert!((handles[1].center - Vec3::new(0.5, 0.0, 0.0)).magnitude() < 1e-12);
        assert!((handles[2].center - Vec3::new(0.0, 0.5, 0.0)).magnitude() < 1e-12);
    }

    #[test]
    fn test_arm_hit_is_tagged_with_axis() {
        let gizmo = gizmo_at_origin(Vec3::new(0.0, 0.0, -10.0));
        // from above, down through the x arm only
        let hit = gizmo.test_click(Vec3::new(0.6, 5.0, 0.0), -Vec3::unit_y()).unwrap();
        assert_eq!(hit.target_axis, Some(Axis::X));

        // straight down z: the centre cube is entered before the z arm
        let hit = gizmo.test_click(Vec3::new(0.0, 0.0, -5.0), Vec3::unit_z()).unwrap();
        assert_eq!(hit.target_axis, None);
        assert!((hit.t - 4.9).abs() < 1e-9);
    }

    #[test]
    fn test_hidden_without_selection() {
        let mut gizmo = TransformGizmo::new();
        gizmo.update(&SelectionAggregate::new(), Vec3::new(0.0, 0.0, -10.0));
        assert!(gizmo.test_click(Vec3::new(0.0, 0.0, -5.0), Vec3::unit_z()).is_none());
    }
}
