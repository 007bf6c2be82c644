//! # Hit Testing
//!
//! Ray-based picking for scene items, vertices and the transform gizmo.
//!
//! ## How it works
//!
//! 1. **Pixel to Ray**: the [`Raytracer`] unprojects a window pixel through the
//!    camera's inverse view-projection and returns a unit direction from the eye
//! 2. **Ray-Volume Intersection**: items are tested with [`hit_test_obb`] (the
//!    ray is moved into the item's rotated frame first), vertices with
//!    [`hit_test_box`]
//! 3. **Selection**: the candidate with the smallest `t` wins, see [`closer_result`]
//!
//! A ray that is parallel to a slab and starts outside of it never hits, and a
//! box entered behind the origin (`t < 0`) is not a hit either.

use crate::gfx::camera::EditorCamera;
use crate::gfx::math::{inverse_rotation, transform_vector, Axis, Mat4, Vec3};
use crate::gfx::scene::ItemId;
use crate::Real;
use cgmath::{InnerSpace, SquareMatrix, Vector4};

/// Slack used when classifying which face of a box was hit
const FACE_EPSILON: Real = 1.0e-6;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: Real) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of half extent `half` around `center`
    pub fn around(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Test ray-AABB intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<HitResult> {
        hit_test_box(ray.origin, ray.direction, self.min, self.max)
    }
}

/// Result of a ray hitting a volume
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// Ray parameter of the entry point
    pub t: Real,
    /// World space entry point
    pub hit: Vec3,
    /// Outward normal of the entered face
    pub normal: Vec3,
    /// Item the volume belongs to, filled in by the caller
    pub item: Option<ItemId>,
    /// Set when the volume is a transform-gizmo arm
    pub target_axis: Option<Axis>,
}

impl HitResult {
    pub fn new(t: Real, hit: Vec3, normal: Vec3) -> Self {
        Self {
            t,
            hit,
            normal,
            item: None,
            target_axis: None,
        }
    }

    pub fn with_item(mut self, item: ItemId) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.target_axis = Some(axis);
        self
    }
}

/// Slab test of `origin + t * ray` against the box `[min, max]`
pub fn hit_test_box(origin: Vec3, ray: Vec3, min: Vec3, max: Vec3) -> Option<HitResult> {
    let mut t_near = Real::NEG_INFINITY;
    let mut t_far = Real::INFINITY;

    for axis in Axis::ALL {
        let o = axis.get(&origin);
        let d = axis.get(&ray);
        let (lo, hi) = (axis.get(&min), axis.get(&max));

        if d == 0.0 {
            // Parallel to this slab: only a ray starting inside it can hit
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    if !(t_near.is_finite() && t_near >= 0.0 && t_near < t_far) {
        return None;
    }

    let hit = origin + ray * t_near;
    let inner_min = min.map(|c| c + FACE_EPSILON);
    let inner_max = max.map(|c| c - FACE_EPSILON);
    let side = |h: Real, lo: Real, hi: Real| -> Real {
        (h > hi) as i8 as Real - (h < lo) as i8 as Real
    };
    let normal = Vec3::new(
        side(hit.x, inner_min.x, inner_max.x),
        side(hit.y, inner_min.y, inner_max.y),
        side(hit.z, inner_min.z, inner_max.z),
    );

    Some(HitResult::new(t_near, hit, normal))
}

/// Hit test against a box of half extent `half_size` centred at `center` and
/// rotated by `rotation` (a pure rotation matrix).
pub fn hit_test_obb(
    origin: Vec3,
    ray: Vec3,
    center: Vec3,
    rotation: &Mat4,
    half_size: Vec3,
) -> Option<HitResult> {
    let to_local = inverse_rotation(rotation);
    let local_origin = transform_vector(&to_local, origin - center);
    let local_ray = transform_vector(&to_local, ray);

    let local = hit_test_box(local_origin, local_ray, -half_size, half_size)?;
    let hit = center + transform_vector(rotation, local.hit);
    let normal = transform_vector(rotation, local.normal);
    Some(HitResult::new(local.t, hit, normal))
}

/// Keeps the strictly closer of two results; on equal `t` the first one wins.
pub fn closer_result(current: Option<HitResult>, candidate: Option<HitResult>) -> Option<HitResult> {
    match (current, candidate) {
        (None, candidate) => candidate,
        (Some(current), Some(candidate)) if candidate.t < current.t => Some(candidate),
        (current, _) => current,
    }
}

/// Builds world rays for window pixels from a camera snapshot
#[derive(Debug, Clone)]
pub struct Raytracer {
    pub eye: Vec3,
    inverse_view_proj: Mat4,
    width: Real,
    height: Real,
}

impl Raytracer {
    pub fn new(camera: &EditorCamera) -> Self {
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        Self {
            eye: camera.eye(),
            inverse_view_proj: view_proj.invert().unwrap_or_else(Mat4::identity),
            width: camera.width.max(1) as Real,
            height: camera.height.max(1) as Real,
        }
    }

    /// Unit direction from the eye through pixel `(x, y)`; `y` grows downwards
    pub fn ray_for_pixel(&self, x: Real, y: Real) -> Vec3 {
        let ndc_x = 2.0 * x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.height;

        let far = self.inverse_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far = if far.w != 0.0 {
            far.truncate() / far.w
        } else {
            far.truncate()
        };
        (far - self.eye).normalize()
    }

    /// Convenience for a full [`Ray`] through a pixel
    pub fn ray(&self, x: Real, y: Real) -> Ray {
        Ray::new(self.eye, self.ray_for_pixel(x, y))
    }

    /// Point on the ray through `(x, y)` where it meets the plane through
    /// `anchor` with normal `normal`. `None` when the ray is parallel.
    pub fn hit_on_plane(&self, x: Real, y: Real, anchor: Vec3, normal: Vec3) -> Option<Vec3> {
        let ray = self.ray_for_pixel(x, y);
        let denominator = ray.dot(normal);
        if denominator == 0.0 {
            return None;
        }
        let t = (anchor - self.eye).dot(normal) / denominator;
        Some(self.eye + ray * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::math::rotation_matrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn approx(a: Vec3, b: Vec3, eps: Real) -> bool {
        (a - b).magnitude() < eps
    }

    #[test]
    fn test_box_hit_from_front() {
        let hit = hit_test_box(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::unit_z(),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        )
        .expect("ray points at the box");
        assert!((hit.t - 4.0).abs() < 1e-12);
        assert!(approx(hit.hit, Vec3::new(0.0, 0.0, -1.0), 1e-12));
        assert_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_box_behind_origin_is_rejected() {
        let hit = hit_test_box(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::unit_z(),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_parallel_ray_outside_slab_is_rejected() {
        // Runs along z at x = 2, never inside the x slab
        let hit = hit_test_box(
            Vec3::new(2.0, 0.0, -5.0),
            Vec3::unit_z(),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_obb_rotated_box_is_hit_on_rotated_face() {
        let rotation = rotation_matrix(Vec3::new(0.0, 45.0, 0.0));
        let hit = hit_test_obb(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::unit_z(),
            Vec3::new(0.0, 0.0, 0.0),
            &rotation,
            Vec3::new(1.0, 1.0, 1.0),
        )
        .expect("ray points at the box centre");
        // Corner of a 45 degree rotated unit cube sits at sqrt(2)
        assert!((hit.t - (5.0 - 2.0_f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_obb_matches_translated_local_test() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits = 0;
        for _ in 0..500 {
            let center = Vec3::new(
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
            );
            let angle = Vec3::new(
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..360.0),
            );
            let half = Vec3::new(
                rng.random_range(0.1..1.0),
                rng.random_range(0.1..1.0),
                rng.random_range(0.1..1.0),
            );
            let origin = Vec3::new(
                rng.random_range(-6.0..6.0),
                rng.random_range(-6.0..6.0),
                -8.0,
            );
            let target = center
                + Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
            let ray = (target - origin).normalize();
            let rotation = rotation_matrix(angle);

            let oriented = hit_test_obb(origin, ray, center, &rotation, half);

            let to_local = inverse_rotation(&rotation);
            let local = hit_test_box(
                transform_vector(&to_local, origin - center),
                transform_vector(&to_local, ray),
                -half,
                half,
            );

            match (oriented, local) {
                (None, None) => {}
                (Some(o), Some(l)) => {
                    hits += 1;
                    assert!((o.t - l.t).abs() < 1e-9);
                    let local_world = center + transform_vector(&rotation, l.hit);
                    assert!(approx(o.hit, local_world, 1e-9));
                    assert!(approx(o.hit, origin + ray * o.t, 1e-9));
                }
                (o, l) => panic!("oriented {:?} and local {:?} disagree", o, l),
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn test_closer_result_prefers_smaller_t() {
        let far = HitResult::new(3.0, Vec3::unit_x(), Vec3::unit_y()).with_item(ItemId(1));
        let near = HitResult::new(1.0, Vec3::unit_x(), Vec3::unit_y()).with_item(ItemId(2));

        let picked = closer_result(Some(far.clone()), Some(near.clone())).unwrap();
        assert_eq!(picked.item, Some(ItemId(2)));
        let picked = closer_result(Some(near.clone()), Some(far.clone())).unwrap();
        assert_eq!(picked.item, Some(ItemId(2)));
        assert_eq!(closer_result(None, Some(far.clone())), Some(far.clone()));
        assert_eq!(closer_result(Some(far.clone()), None), Some(far));
    }

    #[test]
    fn test_closer_result_tie_keeps_first() {
        let a = HitResult::new(2.0, Vec3::unit_x(), Vec3::unit_y()).with_item(ItemId(1));
        let b = HitResult::new(2.0, Vec3::unit_x(), Vec3::unit_y()).with_item(ItemId(2));
        assert_eq!(closer_result(Some(a), Some(b)).unwrap().item, Some(ItemId(1)));
    }

    #[test]
    fn test_ray_through_viewport_centre_looks_forward() {
        let camera = EditorCamera::new(800, 600, &crate::Settings::default());
        let tracer = Raytracer::new(&camera);
        let ray = tracer.ray_for_pixel(400.0, 300.0);
        // The view direction is the camera's -z axis in world space
        let forward = camera.forward();
        assert!(approx(ray, forward, 1e-6));
    }
}
