//! Splitting planes and polygon classification.

use cgmath::InnerSpace;

use super::polygon::Polygon;
use super::EPSILON;
use crate::gfx::math::{try_normalize, Vec3};
use crate::Real;

pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// Polygons produced by [`Plane::split_polygon`]:
/// `(coplanar_front, coplanar_back, front, back)`
pub type SplitResult = (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>);

/// A plane `dot(normal, p) == w` with a unit normal
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub w: Real,
}

impl Plane {
    pub fn new(normal: Vec3, w: Real) -> Self {
        Self { normal, w }
    }

    /// Plane through three points in counter-clockwise order, `None` when
    /// they are collinear
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = try_normalize((b - a).cross(c - a))?;
        Some(Self::new(normal, normal.dot(a)))
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Classifies a point as [`FRONT`], [`BACK`] or [`COPLANAR`]
    pub fn orient_point(&self, point: &Vec3) -> i8 {
        let t = self.normal.dot(*point) - self.w;
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Splits `polygon` by this plane. Coplanar polygons go to the front or
    /// back coplanar list depending on their own facing. Pieces of a spanning
    /// polygon keep its plane and color.
    pub fn split_polygon(&self, polygon: &Polygon) -> SplitResult {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut f = Vec::with_capacity(count + 1);
                let mut b = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if ti != BACK {
                        f.push(vi.clone());
                    }
                    if ti != FRONT {
                        b.push(vi.clone());
                    }
                    if (ti | tj) == SPANNING {
                        let denom = self.normal.dot(vj.pos - vi.pos);
                        if denom != 0.0 {
                            let t = (self.w - self.normal.dot(vi.pos)) / denom;
                            let v = vi.interpolate(vj, t);
                            f.push(v.clone());
                            b.push(v);
                        }
                    }
                }

                if f.len() >= 3 {
                    front.push(polygon.with_vertices(f));
                }
                if b.len() >= 3 {
                    back.push(polygon.with_vertices(b));
                }
            }
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::Vertex;

    fn square_at_x(x: Real) -> Polygon {
        let n = Vec3::unit_x();
        Polygon::new(
            vec![
                Vertex::new(Vec3::new(x, -1.0, -1.0), n),
                Vertex::new(Vec3::new(x, 1.0, -1.0), n),
                Vertex::new(Vec3::new(x, 1.0, 1.0), n),
                Vertex::new(Vec3::new(x, -1.0, 1.0), n),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_from_points_rejects_collinear() {
        let p = Plane::from_points(Vec3::unit_x(), Vec3::unit_x() * 2.0, Vec3::unit_x() * 3.0);
        assert!(p.is_none());
    }

    #[test]
    fn test_split_spanning_polygon_in_two() {
        // Plane y = 0 cuts the square at x = 0 in half
        let plane = Plane::new(Vec3::unit_y(), 0.0);
        let (cf, cb, front, back) = plane.split_polygon(&square_at_x(0.0));
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!(front[0].vertices.iter().all(|v| v.pos.y >= -EPSILON));
        assert!(back[0].vertices.iter().all(|v| v.pos.y <= EPSILON));
        // pieces keep the parent plane
        assert_eq!(front[0].plane, square_at_x(0.0).plane);
    }

    #[test]
    fn test_coplanar_polygon_sorted_by_facing() {
        let plane = Plane::new(Vec3::unit_x(), 0.0);
        let (cf, cb, _, _) = plane.split_polygon(&square_at_x(0.0));
        assert_eq!((cf.len(), cb.len()), (1, 0));

        let mut flipped = plane.clone();
        flipped.flip();
        let (cf, cb, _, _) = flipped.split_polygon(&square_at_x(0.0));
        assert_eq!((cf.len(), cb.len()), (0, 1));
    }

    #[test]
    fn test_one_sided_polygons() {
        let plane = Plane::new(Vec3::unit_x(), 0.0);
        let (_, _, front, back) = plane.split_polygon(&square_at_x(2.0));
        assert_eq!((front.len(), back.len()), (1, 0));
        let (_, _, front, back) = plane.split_polygon(&square_at_x(-2.0));
        assert_eq!((front.len(), back.len()), (0, 1));
    }
}
