//! Polygon solids, generators and boolean operations.

use std::collections::HashMap;
use std::f64::consts::PI;

use cgmath::Zero;

use super::bsp::Node;
use super::polygon::Polygon;
use super::vertex::Vertex;
use crate::gfx::math::{Mat4, Vec3};
use crate::gfx::scene::mesh::{TriangleMesh, DEFAULT_COLOR};
use crate::Real;

/// Face corner indices and outward normals of an axis-aligned box. Corner `i`
/// takes `+r` on x when bit 0 is set, on y for bit 1 and on z for bit 2.
const CUBE_FACES: [([usize; 4], [Real; 3]); 6] = [
    ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
    ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
    ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
];

/// An unordered set of convex polygons bounding a volume
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    /// The empty solid
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// One polygon per triangle; each vertex takes the triangle's plane
    /// normal. Degenerate triangles are dropped.
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let polygons = mesh
            .triangles
            .iter()
            .filter_map(|triangle| {
                let corners: Vec<Vertex> = triangle
                    .iter()
                    .map(|&i| Vertex::new(mesh.vertices[i as usize], Vec3::zero()))
                    .collect();
                let shared = mesh.colors.get(triangle[0] as usize).copied();
                let mut polygon = Polygon::new(corners, shared)?;
                let normal = polygon.plane.normal;
                polygon.vertices.iter_mut().for_each(|v| v.normal = normal);
                Some(polygon)
            })
            .collect();
        Self::from_polygons(polygons)
    }

    /// Axis-aligned box around `center` with half extents `radius`
    pub fn cube(center: Vec3, radius: [Real; 3]) -> Self {
        let polygons = CUBE_FACES
            .iter()
            .filter_map(|(corners, normal)| {
                let normal = Vec3::from(*normal);
                let vertices = corners
                    .iter()
                    .map(|&i| {
                        let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
                        let pos = Vec3::new(
                            center.x + radius[0] * sign(1),
                            center.y + radius[1] * sign(2),
                            center.z + radius[2] * sign(4),
                        );
                        Vertex::new(pos, normal)
                    })
                    .collect();
                Polygon::new(vertices, None)
            })
            .collect();
        Self::from_polygons(polygons)
    }

    /// UV sphere with smooth normals
    pub fn sphere(center: Vec3, radius: Real, slices: usize, stacks: usize) -> Self {
        let vertex = |theta: Real, phi: Real| {
            let (theta, phi) = (theta * PI * 2.0, phi * PI);
            let dir = Vec3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            Vertex::new(center + dir * radius, dir)
        };

        let mut polygons = Vec::with_capacity(slices * stacks);
        for i in 0..slices {
            for j in 0..stacks {
                let (i0, i1) = (i as Real / slices as Real, (i + 1) as Real / slices as Real);
                let (j0, j1) = (j as Real / stacks as Real, (j + 1) as Real / stacks as Real);

                let mut vertices = vec![vertex(i0, j0)];
                if j > 0 {
                    vertices.push(vertex(i1, j0));
                }
                if j + 1 < stacks {
                    vertices.push(vertex(i1, j1));
                }
                vertices.push(vertex(i0, j1));

                if let Some(polygon) = Polygon::new(vertices, None) {
                    polygons.push(polygon);
                }
            }
        }
        Self::from_polygons(polygons)
    }

    /// Everything in `self` or `other`
    pub fn union(&self, other: &Solid) -> Solid {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        Solid::from_polygons(a.all_polygons())
    }

    /// Everything in `self` but not in `other`
    pub fn subtract(&self, other: &Solid) -> Solid {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);
        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();
        Solid::from_polygons(a.all_polygons())
    }

    /// Everything in both `self` and `other`
    pub fn intersect(&self, other: &Solid) -> Solid {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);
        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();
        Solid::from_polygons(a.all_polygons())
    }

    /// Solid with inside and outside swapped
    pub fn inverse(&self) -> Solid {
        let mut polygons = self.polygons.clone();
        polygons.iter_mut().for_each(|p| p.flip());
        Solid::from_polygons(polygons)
    }

    /// Copy with every vertex moved by a rigid transform
    pub fn transformed(&self, matrix: &Mat4) -> Solid {
        Solid::from_polygons(self.polygons.iter().map(|p| p.transformed(matrix)).collect())
    }

    /// Tags every polygon with an opaque color
    pub fn set_color(&mut self, r: Real, g: Real, b: Real) {
        self.set_color_rgba([r, g, b, 1.0]);
    }

    pub fn set_color_rgba(&mut self, color: [Real; 4]) {
        self.polygons.iter_mut().for_each(|p| p.shared = Some(color));
    }

    /// Indexed triangle mesh. Vertices are shared only when position, normal
    /// and color all match; polygons are fan-triangulated.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut lookup: HashMap<[u64; 10], u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut colors = Vec::new();
        let mut triangles = Vec::new();

        for polygon in &self.polygons {
            let color = polygon.shared.unwrap_or(DEFAULT_COLOR);
            let indices: Vec<u32> = polygon
                .vertices
                .iter()
                .map(|v| {
                    let key = [
                        v.pos.x.to_bits(),
                        v.pos.y.to_bits(),
                        v.pos.z.to_bits(),
                        v.normal.x.to_bits(),
                        v.normal.y.to_bits(),
                        v.normal.z.to_bits(),
                        color[0].to_bits(),
                        color[1].to_bits(),
                        color[2].to_bits(),
                        color[3].to_bits(),
                    ];
                    *lookup.entry(key).or_insert_with(|| {
                        vertices.push(v.pos);
                        normals.push(v.normal);
                        colors.push(color);
                        (vertices.len() - 1) as u32
                    })
                })
                .collect();

            for i in 2..indices.len() {
                triangles.push([indices[0], indices[i - 1], indices[i]]);
            }
        }

        TriangleMesh::new(vertices, normals, colors, triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::EPSILON;
    use crate::gfx::math::model_matrix;
    use cgmath::{InnerSpace, SquareMatrix};

    fn unit_cube(center: Vec3) -> Solid {
        Solid::cube(center, [0.5, 0.5, 0.5])
    }

    fn has_vertex(mesh: &TriangleMesh, p: Vec3) -> bool {
        mesh.vertices.iter().any(|v| (*v - p).magnitude() < 1e-9)
    }

    fn position_set(mesh: &TriangleMesh) -> Vec<[i64; 3]> {
        let mut set: Vec<[i64; 3]> = mesh
            .vertices
            .iter()
            .map(|v| [(v.x * 1e6).round() as i64, (v.y * 1e6).round() as i64, (v.z * 1e6).round() as i64])
            .collect();
        set.sort();
        set.dedup();
        set
    }

    #[test]
    fn test_cube_to_mesh_splits_corners_by_normal() {
        let mesh = unit_cube(Vec3::zero()).to_mesh();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(position_set(&mesh).len(), 8);
    }

    #[test]
    fn test_subtract_empty_keeps_vertex_set() {
        let a = unit_cube(Vec3::new(0.3, -0.2, 1.0));
        let result = a.subtract(&Solid::new());
        assert_eq!(position_set(&result.to_mesh()), position_set(&a.to_mesh()));
    }

    #[test]
    fn test_subtract_overlapping_cubes_leaves_notch() {
        let a = unit_cube(Vec3::zero());
        let b = unit_cube(Vec3::new(0.75, 0.75, 0.0));
        let mesh = a.subtract(&b).to_mesh();

        for v in &mesh.vertices {
            for c in [v.x, v.y, v.z] {
                assert!(c >= -0.5 - EPSILON && c <= 0.5 + EPSILON);
            }
        }
        assert!(has_vertex(&mesh, Vec3::new(0.25, 0.25, 0.5)));
        assert!(has_vertex(&mesh, Vec3::new(0.25, 0.25, -0.5)));
        assert!(has_vertex(&mesh, Vec3::new(0.25, 0.5, 0.5)));
        assert!(!has_vertex(&mesh, Vec3::new(0.5, 0.5, 0.5)));
        // inputs are untouched
        assert_eq!(a, unit_cube(Vec3::zero()));
    }

    #[test]
    fn test_union_and_intersect_of_overlapping_cubes() {
        let a = unit_cube(Vec3::zero());
        let b = unit_cube(Vec3::new(0.5, 0.0, 0.0));

        let union = a.union(&b).to_mesh();
        assert!(has_vertex(&union, Vec3::new(1.0, 0.5, 0.5)));
        assert!(has_vertex(&union, Vec3::new(-0.5, 0.5, 0.5)));

        let both = a.intersect(&b).to_mesh();
        for v in &both.vertices {
            assert!(v.x >= -EPSILON && v.x <= 0.5 + EPSILON);
        }
        assert!(has_vertex(&both, Vec3::new(0.0, 0.5, 0.5)));
    }

    #[test]
    fn test_disjoint_subtract_returns_first_operand() {
        let a = unit_cube(Vec3::zero());
        let b = unit_cube(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(position_set(&a.subtract(&b).to_mesh()), position_set(&a.to_mesh()));
    }

    #[test]
    fn test_from_mesh_drops_degenerate_triangles_and_uses_flat_normals() {
        let mut mesh = unit_cube(Vec3::zero()).to_mesh();
        let first = mesh.triangles[0];
        mesh.triangles.push([first[0], first[0], first[1]]);
        let solid = Solid::from_mesh(&mesh);
        assert_eq!(solid.polygons().len(), 12);
        for p in solid.polygons() {
            for v in &p.vertices {
                assert_eq!(v.normal, p.plane.normal);
            }
        }
    }

    #[test]
    fn test_transformed_round_trip() {
        let a = unit_cube(Vec3::zero());
        let m = model_matrix(Vec3::new(1.0, 2.0, 3.0), Vec3::new(10.0, 20.0, 30.0));
        let back = a
            .transformed(&m)
            .transformed(&m.invert().unwrap());
        assert_eq!(position_set(&back.to_mesh()), position_set(&a.to_mesh()));
    }

    #[test]
    fn test_set_color_reaches_mesh_colors() {
        let mut a = unit_cube(Vec3::zero());
        a.set_color(1.0, 0.0, 0.0);
        let mesh = a.to_mesh();
        assert!(mesh.colors.iter().all(|c| *c == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_sphere_polygon_count() {
        let sphere = Solid::sphere(Vec3::zero(), 1.0, 16, 8);
        assert_eq!(sphere.polygons().len(), 16 * 8);
        assert!(sphere.inverse().inverse() == sphere);
    }
}
