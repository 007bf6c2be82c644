use cgmath::Zero;

use crate::gfx::math::{bounds_of, box_corners, Vec3};
use crate::Real;

/// Local axis-aligned bounds of an item's vertices.
///
/// `pos` is the world position shown in the UI: the position of the local min
/// corner when the item is unrotated. The owning item's centre is always
/// `pos + vector_to_center`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
    pub size: Vec3,
    pub pos: Vec3,
    pub vector_to_center: Vec3,
}

impl BoundingBox {
    /// Empty box anchored at `anchor`
    pub fn new(anchor: Vec3) -> Self {
        Self {
            min: Vec3::zero(),
            max: Vec3::zero(),
            size: Vec3::zero(),
            pos: anchor,
            vector_to_center: Vec3::zero(),
        }
    }

    /// Refits min/max/size to `vertices`; the anchor is left alone
    pub fn fit(&mut self, vertices: &[Vec3]) {
        let (min, max) = bounds_of(vertices.iter().copied()).unwrap_or((Vec3::zero(), Vec3::zero()));
        self.min = min;
        self.max = max;
        self.size = max - min;
        self.vector_to_center = -min;
    }

    /// Centre implied by the current anchor
    pub fn parent_position(&self) -> Vec3 {
        self.pos + self.vector_to_center
    }

    /// Moves the anchor so that the owner's centre lands on `center`
    pub fn update_from_parent_position(&mut self, center: Vec3) {
        self.pos = center - self.vector_to_center;
    }

    pub fn corners(&self) -> [Vec3; 8] {
        box_corners(self.min, self.max)
    }
}

/// Box used for ray tests in place of the full geometry, in item-local space
#[derive(Debug, Clone, PartialEq)]
pub struct HitArea {
    /// Local centre of the box
    pub center: Vec3,
    /// Half extent along each local axis
    pub half_size: Vec3,
}

/// Edge list shared by every hit-area wireframe, indexing [`HitArea::corners`]
pub const HIT_AREA_LINES: [[u32; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
];

impl HitArea {
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_size: (max - min) * 0.5,
        }
    }

    /// Cube of half size `radius` around the origin
    pub fn from_radius(radius: Real) -> Self {
        Self {
            center: Vec3::zero(),
            half_size: Vec3::new(radius, radius, radius),
        }
    }

    pub fn update_size(&mut self, min: Vec3, max: Vec3) {
        *self = Self::from_bounds(min, max);
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_size
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_size
    }

    /// Wireframe corners for the debug visualizer
    pub fn corners(&self) -> [Vec3; 8] {
        box_corners(self.min(), self.max())
    }
}

impl Default for HitArea {
    fn default() -> Self {
        Self::from_radius(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_is_min_corner_for_centred_geometry() {
        let vertices = vec![Vec3::new(-0.5, -1.0, -0.25), Vec3::new(0.5, 1.0, 0.25)];
        let mut bb = BoundingBox::new(Vec3::new(2.0, 0.0, 0.0));
        bb.fit(&vertices);
        assert_eq!(bb.size, Vec3::new(1.0, 2.0, 0.5));
        // centre = anchor + (max - min) / 2 when the geometry is centred
        assert_eq!(bb.parent_position(), Vec3::new(2.5, 1.0, 0.25));
        assert_eq!(bb.parent_position(), bb.pos + bb.size * 0.5);
    }

    #[test]
    fn test_update_from_parent_position_round_trips() {
        let mut bb = BoundingBox::new(Vec3::zero());
        bb.fit(&[Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)]);
        bb.update_from_parent_position(Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(bb.pos, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(bb.parent_position(), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_hit_area_tracks_off_centre_bounds() {
        let area = HitArea::from_bounds(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(area.center, Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(area.half_size, Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(area.corners()[6], Vec3::new(2.0, 1.0, 4.0));
    }
}
