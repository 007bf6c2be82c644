//! # Primitive Shape Generation
//!
//! Meshes for the non-editable items every scene starts with.

use cgmath::Zero;

use crate::csg::Solid;
use crate::gfx::math::Vec3;
use crate::gfx::scene::TriangleMesh;
use crate::Real;

/// Half the number of grid cells along each side of the floor
pub const FLOOR_HALF_EXTENT: i32 = 5;

pub const FLOOR_COLOR: [Real; 4] = [0.5, 0.5, 0.5, 0.3];

const LIGHT_INNER: (Real, [Real; 4]) = (0.8, [1.0, 1.0, 1.0, 0.9]);
const LIGHT_OUTER: (Real, [Real; 4]) = (1.2, [1.0, 1.0, 1.0, 0.5]);

/// Unit grid on the y = 0 plane spanning `-half..=half` on x and z.
///
/// Lines run along z first (one per x), then along x (one per z). The two
/// triangles cover the whole grid.
pub fn floor_grid(half: i32) -> TriangleMesh {
    let extent = half as Real;
    let mut vertices = Vec::new();
    let mut lines = Vec::new();

    for x in -half..=half {
        let start = vertices.len() as u32;
        vertices.push(Vec3::new(x as Real, 0.0, -extent));
        vertices.push(Vec3::new(x as Real, 0.0, extent));
        lines.push([start, start + 1]);
    }
    // far end of the last x line
    let [last_start, last_end] = lines.last().copied().unwrap_or([0, 1]);

    for z in -half..=half {
        let start = vertices.len() as u32;
        vertices.push(Vec3::new(-extent, 0.0, z as Real));
        vertices.push(Vec3::new(extent, 0.0, z as Real));
        lines.push([start, start + 1]);
    }

    let count = vertices.len();
    TriangleMesh::new(
        vertices,
        vec![Vec3::unit_y(); count],
        vec![FLOOR_COLOR; count],
        vec![[0, last_start, last_end], [0, last_end, 1]],
    )
    .with_lines(lines)
}

/// Light marker: an inner and an outer translucent sphere around the origin
pub fn light_source() -> TriangleMesh {
    let sphere = |(radius, color): (Real, [Real; 4])| {
        let mut solid = Solid::sphere(Vec3::zero(), radius, 16, 8);
        solid.set_color_rgba(color);
        solid.into_polygons()
    };

    let mut polygons = sphere(LIGHT_INNER);
    polygons.extend(sphere(LIGHT_OUTER));
    Solid::from_polygons(polygons).to_mesh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_grid_layout() {
        let floor = floor_grid(FLOOR_HALF_EXTENT);
        // 11 lines per direction, two vertices each
        assert_eq!(floor.lines.len(), 22);
        assert_eq!(floor.vertex_count(), 44);
        assert_eq!(floor.triangles, vec![[0, 20, 21], [0, 21, 1]]);
        assert_eq!(floor.vertices[21], Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_light_source_keeps_sphere_colors_apart() {
        let light = light_source();
        assert!(light.colors.iter().any(|c| c[3] == 0.9));
        assert!(light.colors.iter().any(|c| c[3] == 0.5));
        assert_eq!(light.vertex_count(), light.colors.len());
    }
}
