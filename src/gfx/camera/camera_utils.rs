use cgmath::{Matrix4, SquareMatrix};

use crate::Real;

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<Real>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

/// Narrows a column-major matrix to the `f32` layout shaders expect
pub fn convert_matrix4_to_array(matrix4: Matrix4<Real>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for (i, column) in result.iter_mut().enumerate() {
        for (j, value) in column.iter_mut().enumerate() {
            *value = matrix4[i][j] as f32;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_plain_bytes() {
        let uniform = CameraUniform::default();
        let bytes: &[u8] = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 4 * 4 + 16 * 4);
    }

    #[test]
    fn test_convert_keeps_column_major_layout() {
        let m = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        let a = convert_matrix4_to_array(m);
        assert_eq!(a[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
