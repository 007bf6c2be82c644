//! Convex polygons with a shared color tag.

use super::plane::Plane;
use super::vertex::Vertex;
use crate::gfx::math::Mat4;
use crate::Real;
use cgmath::InnerSpace;

/// A convex polygon. All vertices lie on `plane`; `shared` is the color
/// carried into the triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub shared: Option<[Real; 4]>,
    pub plane: Plane,
}

impl Polygon {
    /// Builds a polygon, deriving its plane from the first three vertices.
    /// `None` for fewer than three vertices or a degenerate leading triangle.
    pub fn new(vertices: Vec<Vertex>, shared: Option<[Real; 4]>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos)?;
        Some(Self {
            vertices,
            shared,
            plane,
        })
    }

    /// A piece of this polygon: same plane, same color
    pub fn with_vertices(&self, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            shared: self.shared,
            plane: self.plane.clone(),
        }
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(|v| v.flip());
        self.plane.flip();
    }

    /// Applies a rigid transform to vertices and plane
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let vertices: Vec<Vertex> = self.vertices.iter().map(|v| v.transformed(matrix)).collect();
        let normal = crate::gfx::math::transform_vector(matrix, self.plane.normal).normalize();
        let w = vertices
            .first()
            .map_or(self.plane.w, |v| normal.dot(v.pos));
        Self {
            vertices,
            shared: self.shared,
            plane: Plane::new(normal, w),
        }
    }
}
