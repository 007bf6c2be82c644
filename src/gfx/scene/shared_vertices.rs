//! # Shared Vertices
//!
//! A solid mesh stores one vertex per (position, normal, color) combination,
//! so a cube corner appears three times. Editing works on [`SharedVertex`]
//! values instead: one per exact position, each remembering every raw slot
//! of the mesh that sits at that position. Dragging only moves the shared
//! vertex; [`SharedVertices::apply_to`] writes the positions back into the
//! raw slots and keeps the mesh watertight.

use std::collections::HashMap;

use crate::gfx::math::{transform_point, transform_vector, Axis, Mat4, Vec3};
use crate::gfx::picking::{hit_test_box, HitResult};
use crate::gfx::scene::vertex::PointVertex;
use crate::Real;

/// Exact position key. `-0.0` and `0.0` collapse to one key.
fn position_key(p: Vec3) -> [u64; 3] {
    let bits = |c: Real| if c == 0.0 { 0.0_f64.to_bits() } else { c.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharedVertex {
    pub position: Vec3,
    /// Slots of the owning mesh's vertex array at this position
    pub references: Vec<usize>,
    pub selected: bool,
    last_pos: Vec3,
}

impl SharedVertex {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            references: Vec::new(),
            selected: false,
            last_pos: position,
        }
    }

    /// Tests a world-aligned cube of half size `radius` around this vertex
    /// after the owner's `model` transform, and records the drag start.
    pub fn test_click(&mut self, origin: Vec3, ray: Vec3, model: &Mat4, radius: Real) -> Option<HitResult> {
        let center = transform_point(model, self.position);
        let half = Vec3::new(radius, radius, radius);
        self.last_pos = self.position;
        hit_test_box(origin, ray, center - half, center + half)
    }

    /// Moves the vertex by a world movement relative to the drag start.
    /// `to_local` is the inverse of the owner's rotation.
    pub fn drag(&mut self, movement: Vec3, to_local: &Mat4) {
        self.position = self.last_pos + transform_vector(to_local, movement);
    }

    pub fn prepare_dragging(&mut self) {
        self.last_pos = self.position;
    }
}

/// Deduplicated editable vertices of one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct SharedVertices {
    vertices: Vec<SharedVertex>,
    pub hit_radius: Real,
    pub selected_hit_radius: Real,
    points_dirty: bool,
}

impl SharedVertices {
    /// Groups `mesh_vertices` by exact position, in first-seen order
    pub fn new(mesh_vertices: &[Vec3], hit_radius: Real, selected_hit_radius: Real) -> Self {
        let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();
        let mut vertices: Vec<SharedVertex> = Vec::new();

        for (slot, &p) in mesh_vertices.iter().enumerate() {
            let index = *lookup.entry(position_key(p)).or_insert_with(|| {
                vertices.push(SharedVertex::new(p));
                vertices.len() - 1
            });
            vertices[index].references.push(slot);
        }

        Self {
            vertices,
            hit_radius,
            selected_hit_radius,
            points_dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedVertex> {
        self.vertices.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SharedVertex> {
        self.vertices.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SharedVertex> {
        self.vertices.get_mut(index)
    }

    /// Hit test for one vertex; selected vertices use the larger cube
    pub fn test_click(&mut self, index: usize, origin: Vec3, ray: Vec3, model: &Mat4) -> Option<HitResult> {
        let (radius, selected_radius) = (self.hit_radius, self.selected_hit_radius);
        let vertex = self.vertices.get_mut(index)?;
        let r = if vertex.selected { selected_radius } else { radius };
        vertex.test_click(origin, ray, model, r)
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(v) = self.vertices.get_mut(index) {
            if v.selected != selected {
                v.selected = selected;
                self.points_dirty = true;
            }
        }
    }

    pub fn clear_selection(&mut self) {
        for index in 0..self.vertices.len() {
            self.set_selected(index, false);
        }
    }

    pub fn drag(&mut self, index: usize, movement: Vec3, to_local: &Mat4) {
        if let Some(v) = self.vertices.get_mut(index) {
            v.drag(movement, to_local);
        }
    }

    /// Pushes every coordinate on `axis` away from the local origin by
    /// `value` (negative values pull inwards)
    pub fn update_size(&mut self, value: Real, axis: Axis) {
        for v in &mut self.vertices {
            let c = axis.get_mut(&mut v.position);
            if *c < 0.0 {
                *c -= value;
            } else {
                *c += value;
            }
            v.last_pos = v.position;
        }
    }

    /// Writes every shared position into all of its reference slots
    pub fn apply_to(&mut self, mesh_vertices: &mut [Vec3]) {
        for v in &self.vertices {
            for &slot in &v.references {
                if let Some(target) = mesh_vertices.get_mut(slot) {
                    *target = v.position;
                }
            }
        }
        self.points_dirty = true;
    }

    /// Point buffer for vertex edit mode
    pub fn point_vertices(&self) -> Vec<PointVertex> {
        self.vertices
            .iter()
            .map(|v| PointVertex::new(v.position, v.selected))
            .collect()
    }

    pub fn take_points_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.points_dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::math::{inverse_rotation, rotation_matrix};
    use cgmath::{InnerSpace, SquareMatrix};

    fn corner_slots() -> Vec<Vec3> {
        vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_exact_positions_collapse_in_first_seen_order() {
        let shared = SharedVertices::new(&corner_slots(), 0.008, 0.012);
        assert_eq!(shared.len(), 3);
        assert_eq!(shared.get(0).unwrap().references, vec![0, 2, 5]);
        assert_eq!(shared.get(1).unwrap().references, vec![1]);
        // signed zero shares a key
        assert_eq!(shared.get(2).unwrap().references, vec![3, 4]);
    }

    #[test]
    fn test_drag_then_apply_moves_every_reference() {
        let mut slots = corner_slots();
        let mut shared = SharedVertices::new(&slots, 0.008, 0.012);
        let identity = Mat4::identity();

        shared.get_mut(0).unwrap().prepare_dragging();
        shared.drag(0, Vec3::new(1.0, 0.0, 0.0), &identity);
        shared.apply_to(&mut slots);

        for slot in [0, 2, 5] {
            assert_eq!(slots[slot], Vec3::new(2.0, 1.0, 1.0));
        }
        assert_eq!(slots[1], Vec3::new(-1.0, 1.0, 1.0));
        assert_eq!(slots[4], Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_drag_is_relative_to_drag_start() {
        let slots = corner_slots();
        let mut shared = SharedVertices::new(&slots, 0.008, 0.012);
        let identity = Mat4::identity();
        shared.get_mut(1).unwrap().prepare_dragging();
        shared.drag(1, Vec3::new(0.5, 0.0, 0.0), &identity);
        shared.drag(1, Vec3::new(0.75, 0.0, 0.0), &identity);
        assert_eq!(shared.get(1).unwrap().position, Vec3::new(-0.25, 1.0, 1.0));
    }

    #[test]
    fn test_drag_moves_in_local_frame_of_rotated_owner() {
        let slots = vec![Vec3::new(1.0, 0.0, 0.0)];
        let mut shared = SharedVertices::new(&slots, 0.008, 0.012);
        let rotation = rotation_matrix(Vec3::new(0.0, 0.0, 90.0));
        shared.get_mut(0).unwrap().prepare_dragging();
        // World +y is local +x for an item rotated 90 degrees about z
        shared.drag(0, Vec3::new(0.0, 1.0, 0.0), &inverse_rotation(&rotation));
        let p = shared.get(0).unwrap().position;
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).magnitude() < 1e-12);
    }

    #[test]
    fn test_selected_vertex_gets_larger_hit_cube() {
        let slots = vec![Vec3::new(0.0, 0.0, 0.0)];
        let mut shared = SharedVertices::new(&slots, 0.008, 0.012);
        let identity = Mat4::identity();
        let origin = Vec3::new(0.010, 0.0, -5.0);
        let ray = Vec3::unit_z();

        assert!(shared.test_click(0, origin, ray, &identity).is_none());
        shared.set_selected(0, true);
        assert!(shared.test_click(0, origin, ray, &identity).is_some());
    }

    #[test]
    fn test_update_size_pushes_outwards_by_sign() {
        let slots = vec![Vec3::new(-0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0)];
        let mut shared = SharedVertices::new(&slots, 0.008, 0.012);
        shared.update_size(0.25, Axis::X);
        assert_eq!(shared.get(0).unwrap().position.x, -0.75);
        assert_eq!(shared.get(1).unwrap().position.x, 0.75);
    }
}
