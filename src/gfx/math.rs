//! # Geometry Primitives
//!
//! Shared vector/matrix helpers. Item rotations are stored as three Euler
//! angles in degrees and always composed as `Rx * Ry * Rz`; positions are
//! applied in front of the rotation (`T * Rx * Ry * Rz`).

use crate::Real;
use cgmath::{Deg, InnerSpace, Matrix, Matrix4, Vector3};

pub type Vec3 = Vector3<Real>;
pub type Mat4 = Matrix4<Real>;

/// One of the three coordinate axes, used by per-axis UI edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::unit_x(),
            Axis::Y => Vec3::unit_y(),
            Axis::Z => Vec3::unit_z(),
        }
    }

    /// Reads this axis' component
    pub fn get(self, v: &Vec3) -> Real {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Mutable access to this axis' component
    pub fn get_mut(self, v: &mut Vec3) -> &mut Real {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
            Axis::Z => &mut v.z,
        }
    }
}

/// Rotation matrix for Euler angles in degrees
pub fn rotation_matrix(angle: Vec3) -> Mat4 {
    Matrix4::from_angle_x(Deg(angle.x))
        * Matrix4::from_angle_y(Deg(angle.y))
        * Matrix4::from_angle_z(Deg(angle.z))
}

/// Local-to-world matrix for an item at `pos` with Euler `angle`
pub fn model_matrix(pos: Vec3, angle: Vec3) -> Mat4 {
    Matrix4::from_translation(pos) * rotation_matrix(angle)
}

/// Inverse of a pure rotation matrix
pub fn inverse_rotation(rotation: &Mat4) -> Mat4 {
    rotation.transpose()
}

/// Transforms a point (w = 1) with perspective divide
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let v = m * p.extend(1.0);
    if v.w != 0.0 && v.w != 1.0 {
        v.truncate() / v.w
    } else {
        v.truncate()
    }
}

/// Transforms a direction (w = 0)
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    (m * v.extend(0.0)).truncate()
}

/// Grows `min`/`max` so they contain `p`
pub fn update_min_max(min: &mut Vec3, max: &mut Vec3, p: Vec3) {
    min.x = min.x.min(p.x);
    min.y = min.y.min(p.y);
    min.z = min.z.min(p.z);
    max.x = max.x.max(p.x);
    max.y = max.y.max(p.y);
    max.z = max.z.max(p.z);
}

/// Component-wise bounds of a point set, `None` when empty
pub fn bounds_of<I>(points: I) -> Option<(Vec3, Vec3)>
where
    I: IntoIterator<Item = Vec3>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let (mut min, mut max) = (first, first);
    for p in iter {
        update_min_max(&mut min, &mut max, p);
    }
    Some((min, max))
}

/// Rounds to whole degrees and clamps to [0, 360]. Values past a bound stick
/// to it instead of wrapping.
pub fn clamp_angle(angle: Real) -> Real {
    angle.round().clamp(0.0, 360.0)
}

/// Angle in degrees whose cosine is `cosine`
pub fn angle_from_cosine(cosine: Real) -> Real {
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Normalizes `v`, or `None` for a zero-length vector
pub fn try_normalize(v: Vec3) -> Option<Vec3> {
    let len2 = v.magnitude2();
    if len2 > Real::EPSILON * Real::EPSILON {
        Some(v / len2.sqrt())
    } else {
        None
    }
}

/// The eight corners of an axis-aligned box
pub fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).magnitude() < 1e-9
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        // Rz applied first to the point, then Ry, then Rx
        let m = rotation_matrix(Vec3::new(0.0, 90.0, 90.0));
        let p = transform_point(&m, Vec3::unit_x());
        // Rz(90): x -> y; Ry(90): y stays y
        assert!(approx(p, Vec3::unit_y()));
    }

    #[test]
    fn test_inverse_rotation_undoes_rotation() {
        let r = rotation_matrix(Vec3::new(30.0, 45.0, 60.0));
        let v = Vec3::new(1.0, 2.0, 3.0);
        let back = transform_vector(&inverse_rotation(&r), transform_vector(&r, v));
        assert!(approx(back, v));
    }

    #[test]
    fn test_clamp_angle_sticks_at_bounds() {
        assert_eq!(clamp_angle(350.0 + 20.0), 360.0);
        assert_eq!(clamp_angle(10.0 - 20.0), 0.0);
        assert_eq!(clamp_angle(44.6), 45.0);
    }

    #[test]
    fn test_bounds_of_points() {
        assert!(bounds_of(Vec::<Vec3>::new()).is_none());
        let (min, max) = bounds_of(vec![
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
        ])
        .unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_axis_component_access() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        *Axis::Y.get_mut(&mut v) += 5.0;
        assert_eq!(Axis::Y.get(&v), 7.0);
        assert_eq!(Axis::Z.unit(), Vec3::unit_z());
    }
}
