//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::gfx::math::{transform_point, transform_vector, Mat4, Vec3};
use crate::Real;
use cgmath::InnerSpace;

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(pos: Vec3, normal: Vec3) -> Self {
        Vertex { pos, normal }
    }

    /// Flip vertex normal
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`),
    /// normals included.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        Vertex::new(
            self.pos + (other.pos - self.pos) * t,
            self.normal + (other.normal - self.normal) * t,
        )
    }

    /// Applies a rigid transform; the normal only sees its rotation part
    pub fn transformed(&self, matrix: &Mat4) -> Vertex {
        let normal = transform_vector(matrix, self.normal);
        let normal = if normal.magnitude2() > 0.0 {
            normal.normalize()
        } else {
            normal
        };
        Vertex::new(transform_point(matrix, self.pos), normal)
    }
}
