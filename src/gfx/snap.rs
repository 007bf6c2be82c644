//! # Snap Planes
//!
//! The snap base carries six planes, one per bounding-box face. Other items
//! dragged near those planes are pulled onto them by the selection aggregate.
//! A plane that captured a face flashes briefly; the flash is advanced by the
//! context clock and never influences the snapping math.

use cgmath::InnerSpace;

use crate::gfx::math::{angle_from_cosine, transform_vector, Mat4, Vec3};
use crate::gfx::scene::BoundingBox;
use crate::Real;

/// Edge length of the square drawn for a plane
pub const PLANE_SIZE: Real = 10.0;
pub const DEFAULT_PLANE_COLOR: [Real; 3] = [0.3, 0.8, 0.0];
pub const DEFAULT_PLANE_ALPHA: Real = 0.2;

const FLASH_IN_MS: Real = 150.0;
const FADE_OUT_MS: Real = 1000.0;
const FLASH_COLOR: [Real; 3] = [1.0, 1.0, 1.0];
const FLASH_ALPHA: Real = 0.5;

/// Exponential ease-in on [0, 1]
fn exponential_in(k: Real) -> Real {
    if k == 0.0 {
        0.0
    } else {
        (1024.0 as Real).powf(k - 1.0)
    }
}

fn lerp(a: Real, b: Real, k: Real) -> Real {
    a + (b - a) * k
}

fn lerp_color(a: [Real; 3], b: [Real; 3], k: Real) -> [Real; 3] {
    [lerp(a[0], b[0], k), lerp(a[1], b[1], k), lerp(a[2], b[2], k)]
}

/// A plane given by a unit normal and its distance from the origin
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPlane {
    pub normal: Vec3,
    /// `dot(point_on_plane, normal)`
    pub distance: Real,
    /// Point of the plane closest to the origin
    pub center_point: Vec3,
    /// Rotation (degrees about `rotation_axis`) taking +z onto `normal`
    pub theta: Real,
    pub rotation_axis: Vec3,
    pub color: [Real; 3],
    pub alpha: Real,
    default_color: [Real; 3],
    default_alpha: Real,
    blink_elapsed: Option<Real>,
}

impl SnapPlane {
    pub fn new(point_on_plane: Vec3, normal: Vec3) -> Self {
        let mut plane = Self {
            normal,
            distance: 0.0,
            center_point: Vec3::new(0.0, 0.0, 0.0),
            theta: 0.0,
            rotation_axis: Vec3::unit_z(),
            color: DEFAULT_PLANE_COLOR,
            alpha: DEFAULT_PLANE_ALPHA,
            default_color: DEFAULT_PLANE_COLOR,
            default_alpha: DEFAULT_PLANE_ALPHA,
            blink_elapsed: None,
        };
        plane.update_props(point_on_plane, normal);
        plane
    }

    /// Moves the plane in place
    pub fn update_props(&mut self, point_on_plane: Vec3, normal: Vec3) {
        self.normal = normal;
        self.distance = point_on_plane.dot(normal);
        self.center_point = normal * self.distance;

        let default_face = Vec3::unit_z();
        self.theta = angle_from_cosine(default_face.dot(normal));
        self.rotation_axis = default_face.cross(normal);
    }

    /// Ray parameter where `origin + t * ray` meets the plane, negative when
    /// the plane is behind. `None` when the ray is parallel to the plane.
    pub fn calc_time(&self, origin: Vec3, ray: Vec3) -> Option<Real> {
        let nd = ray.dot(self.normal);
        if nd == 0.0 {
            return None;
        }
        let pn = origin.dot(self.normal);
        Some((self.distance - pn) / nd)
    }

    pub fn is_blinking(&self) -> bool {
        self.blink_elapsed.is_some()
    }

    /// Starts the highlight unless one is already running
    pub fn start_blink(&mut self) {
        if self.is_blinking() {
            return;
        }
        self.blink_elapsed = Some(0.0);
        self.color = self.default_color;
        self.alpha = self.default_alpha;
    }

    /// Advances a running highlight by `dt_ms` milliseconds
    pub fn advance(&mut self, dt_ms: Real) {
        let Some(elapsed) = self.blink_elapsed else {
            return;
        };
        let elapsed = elapsed + dt_ms;

        if elapsed < FLASH_IN_MS {
            let k = exponential_in(elapsed / FLASH_IN_MS);
            self.color = lerp_color(self.default_color, FLASH_COLOR, k);
            self.alpha = lerp(self.default_alpha, FLASH_ALPHA, k);
            self.blink_elapsed = Some(elapsed);
        } else if elapsed < FLASH_IN_MS + FADE_OUT_MS {
            let k = (elapsed - FLASH_IN_MS) / FADE_OUT_MS;
            self.color = lerp_color(FLASH_COLOR, self.default_color, k);
            self.alpha = lerp(FLASH_ALPHA, 0.0, k);
            self.blink_elapsed = Some(elapsed);
        } else {
            self.color = self.default_color;
            self.alpha = 0.0;
            self.blink_elapsed = None;
        }
    }

    /// Quad corners in plane space (z = 0), to be placed with
    /// `center_point` and `theta`/`rotation_axis`
    pub fn quad(&self) -> [Vec3; 4] {
        let h = PLANE_SIZE / 2.0;
        [
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ]
    }
}

/// Face directions of an item in world space, ordered
/// `+x, +y, +z, -x, -y, -z`
pub fn face_axes(rotation: &Mat4) -> [Vec3; 6] {
    let x = transform_vector(rotation, Vec3::unit_x()).normalize();
    let y = transform_vector(rotation, Vec3::unit_y()).normalize();
    let z = transform_vector(rotation, Vec3::unit_z()).normalize();
    [x, y, z, -x, -y, -z]
}

/// Offsets from the item centre to its six face points, in the order of
/// [`face_axes`]. Positive faces sit at `max`, negative faces at `min`.
pub fn face_points(axes: &[Vec3; 6], bounding_box: &BoundingBox) -> [Vec3; 6] {
    let (min, max) = (bounding_box.min, bounding_box.max);
    [
        axes[0] * max.x,
        axes[1] * max.y,
        axes[2] * max.z,
        axes[3] * -min.x,
        axes[4] * -min.y,
        axes[5] * -min.z,
    ]
}

/// Axes and planes of the current snap base
#[derive(Debug, Clone, PartialEq)]
pub struct SnapFrame {
    pub axes: [Vec3; 6],
    pub planes: [SnapPlane; 6],
}

impl SnapFrame {
    pub fn new(rotation: &Mat4, pos: Vec3, bounding_box: &BoundingBox) -> Self {
        let axes = face_axes(rotation);
        let points = face_points(&axes, bounding_box);
        let planes = std::array::from_fn(|i| SnapPlane::new(pos + points[i], axes[i]));
        Self { axes, planes }
    }

    /// After rotating or resizing: recompute axes, then the planes
    pub fn refresh_fully(&mut self, rotation: &Mat4, pos: Vec3, bounding_box: &BoundingBox) {
        self.axes = face_axes(rotation);
        self.refresh_lightly(pos, bounding_box);
    }

    /// After translating: the axes are unchanged, move the planes in place
    pub fn refresh_lightly(&mut self, pos: Vec3, bounding_box: &BoundingBox) {
        let points = face_points(&self.axes, bounding_box);
        for (i, plane) in self.planes.iter_mut().enumerate() {
            plane.update_props(pos + points[i], self.axes[i]);
        }
    }

    pub fn advance(&mut self, dt_ms: Real) {
        for plane in &mut self.planes {
            plane.advance(dt_ms);
        }
    }

    pub fn start_blink(&mut self, index: usize) {
        if let Some(plane) = self.planes.get_mut(index) {
            plane.start_blink();
        }
    }
}
