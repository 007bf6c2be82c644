use cgmath::{InnerSpace, Zero};

use super::vertex::Vertex3D;
use crate::error::EditorError;
use crate::gfx::math::Vec3;
use crate::Real;

/// Color used when a mesh carries none
pub const DEFAULT_COLOR: [Real; 4] = [1.0, 1.0, 1.0, 1.0];

/// Externally loaded mesh data in flat indexed-triangle form.
///
/// `positions` and `normals` hold three floats per vertex, `indices` three
/// entries per triangle. `normals` may be empty, in which case they are
/// computed. `material_indices` is either empty or holds one entry per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshPayload {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub material_indices: Vec<u32>,
}

/// Indexed triangle mesh in item-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<[Real; 4]>,
    pub triangles: Vec<[u32; 3]>,
    /// Line segments drawn in addition to (or instead of) the triangles
    pub lines: Vec<[u32; 2]>,
    pub material_indices: Vec<u32>,
    dirty: bool,
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

impl TriangleMesh {
    pub fn new(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        colors: Vec<[Real; 4]>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        Self {
            vertices,
            normals,
            colors,
            triangles,
            lines: Vec::new(),
            material_indices: Vec::new(),
            dirty: true,
        }
    }

    pub fn with_lines(mut self, lines: Vec<[u32; 2]>) -> Self {
        self.lines = lines;
        self
    }

    /// Validates and converts a flat payload
    pub fn from_payload(payload: MeshPayload) -> Result<Self, EditorError> {
        let MeshPayload {
            positions,
            normals,
            indices,
            material_indices,
        } = payload;

        if positions.len() % 3 != 0 {
            return Err(EditorError::MalformedMesh(format!(
                "{} position floats is not a multiple of 3",
                positions.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(EditorError::MalformedMesh(format!(
                "{} indices is not a multiple of 3",
                indices.len()
            )));
        }
        let vertex_count = positions.len() / 3;
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(EditorError::MalformedMesh(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }
        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(EditorError::MalformedMesh(format!(
                "{} normal floats for {} position floats",
                normals.len(),
                positions.len()
            )));
        }
        if !material_indices.is_empty() && material_indices.len() != vertex_count {
            return Err(EditorError::MalformedMesh(format!(
                "{} material indices for {} vertices",
                material_indices.len(),
                vertex_count
            )));
        }

        let vertices: Vec<Vec3> = positions
            .chunks(3)
            .map(|p| Vec3::new(p[0] as Real, p[1] as Real, p[2] as Real))
            .collect();
        let triangles: Vec<[u32; 3]> = indices.chunks(3).map(|t| [t[0], t[1], t[2]]).collect();
        let normals = if normals.is_empty() {
            Self::calculate_vertex_normals(&vertices, &triangles)
        } else {
            normals
                .chunks(3)
                .map(|n| Vec3::new(n[0] as Real, n[1] as Real, n[2] as Real))
                .collect()
        };
        let colors = vec![DEFAULT_COLOR; vertices.len()];

        let mut mesh = Self::new(vertices, normals, colors, triangles);
        mesh.material_indices = material_indices;
        Ok(mesh)
    }

    /// Averages the face normals of every triangle touching a vertex
    pub fn calculate_vertex_normals(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
        let mut normals = vec![Vec3::zero(); vertices.len()];
        let mut counts = vec![0u32; vertices.len()];

        for triangle in triangles {
            let [i0, i1, i2] = triangle.map(|i| i as usize);
            let face = (vertices[i1] - vertices[i0]).cross(vertices[i2] - vertices[i0]);
            for i in [i0, i1, i2] {
                normals[i] += face;
                counts[i] += 1;
            }
        }

        for (normal, count) in normals.iter_mut().zip(counts) {
            if count > 0 && normal.magnitude2() > 0.0 {
                *normal = (*normal / count as Real).normalize();
            }
        }
        normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Interleaved vertex data for upload
    pub fn render_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let normal = self.normals.get(i).copied().unwrap_or_else(Vec3::zero);
                let color = self.colors.get(i).copied().unwrap_or(DEFAULT_COLOR);
                Vertex3D::new(p, normal, color)
            })
            .collect()
    }

    /// Flat triangle index list for upload
    pub fn index_data(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Flat line index list for upload
    pub fn line_index_data(&self) -> Vec<u32> {
        self.lines.iter().flatten().copied().collect()
    }

    /// Byte view of a freshly built vertex buffer
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.render_vertices()).to_vec()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether buffers need uploading and clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
