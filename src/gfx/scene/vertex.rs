//! # Vertex Data Structures
//!
//! GPU-compatible vertex formats handed to the rendering layer. Geometry is
//! kept in [`Real`](crate::Real) precision inside the kernel and narrowed to
//! `f32` only when these payloads are built.

use crate::gfx::math::Vec3;
use crate::Real;

/// A 3D vertex with position, normal and color data.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout, which is required for GPU buffer operations.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
}

impl Vertex3D {
    pub fn new(position: Vec3, normal: Vec3, color: [Real; 4]) -> Self {
        Self {
            position: to_f32(position),
            normal: to_f32(normal),
            color: color.map(|c| c as f32),
        }
    }
}

/// A shared vertex as drawn in vertex edit mode.
///
/// `selected` is `1.0` for selected points and `0.0` otherwise so the shader
/// can branch on it without an integer attribute.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub selected: f32,
}

impl PointVertex {
    pub fn new(position: Vec3, selected: bool) -> Self {
        Self {
            position: to_f32(position),
            selected: if selected { 1.0 } else { 0.0 },
        }
    }
}

fn to_f32(v: Vec3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}
