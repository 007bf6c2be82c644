//! # Selection Aggregate
//!
//! The current selection presented as one pseudo-object with a position,
//! angle, size and name. Edits made through the aggregate are forwarded to
//! every member item.
//!
//! A single member is mirrored directly. Several members get a synthesized
//! centre (midpoint of their positions), an extent (spread of their
//! positions), a zero angle and a hit area covering all of their rotated
//! bounding boxes. Rotating a multi-selection applies the same delta to every
//! member about its own centre.

use cgmath::{InnerSpace, Zero};
use log::debug;

use crate::config::Settings;
use crate::gfx::math::{bounds_of, clamp_angle, Axis, Vec3};
use crate::gfx::scene::{HitArea, Item, ItemId, Scene, Transformable};
use crate::gfx::snap::SnapPlane;
use crate::Real;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionAggregate {
    members: Vec<ItemId>,
    /// False while nothing is selected
    pub visible: bool,
    /// Centre of the selection
    pub pos: Vec3,
    /// Position shown in the UI: the bounding-box anchor of a single member
    pub visual_pos: Vec3,
    pub angle: Vec3,
    pub size: Vec3,
    pub name: String,
    pub hit_area: HitArea,
    last_pos: Vec3,
}

impl Default for SelectionAggregate {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            visible: false,
            pos: Vec3::zero(),
            visual_pos: Vec3::zero(),
            angle: Vec3::zero(),
            size: Vec3::zero(),
            name: String::new(),
            hit_area: HitArea::default(),
            last_pos: Vec3::zero(),
        }
    }
}

impl SelectionAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[ItemId] {
        &self.members
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    /// Rebuilds the aggregate from `members`; ids without geometry are ignored
    pub fn reset(&mut self, scene: &Scene, members: &[ItemId]) {
        self.members = members
            .iter()
            .copied()
            .filter(|id| scene.get(*id).is_some_and(Item::is_mesh))
            .collect();
        self.visible = !self.members.is_empty();

        match self.members.as_slice() {
            [] => {
                self.pos = Vec3::zero();
                self.visual_pos = Vec3::zero();
                self.angle = Vec3::zero();
                self.size = Vec3::zero();
                self.name.clear();
                self.hit_area = HitArea::default();
            }
            [single] => {
                if let Some(item) = scene.get(*single) {
                    self.mirror(item);
                }
            }
            members => {
                let items: Vec<&Item> = members.iter().filter_map(|id| scene.get(*id)).collect();
                let (min, max) =
                    bounds_of(items.iter().map(|item| item.pos())).unwrap_or((Vec3::zero(), Vec3::zero()));
                self.pos = min + (max - min) * 0.5;
                self.visual_pos = self.pos;
                self.angle = Vec3::zero();
                self.size = max - min;
                self.name = items.first().map(|item| item.name.clone()).unwrap_or_default();

                let corners = items
                    .iter()
                    .filter_map(|item| item.body())
                    .flat_map(|body| body.rotated_corners());
                let (lo, hi) = bounds_of(corners).unwrap_or((self.pos, self.pos));
                self.hit_area = HitArea::from_bounds(lo - self.pos, hi - self.pos);
            }
        }
        self.last_pos = self.pos;
    }

    fn mirror(&mut self, item: &Item) {
        if let Some(body) = item.body() {
            self.pos = body.pos;
            self.visual_pos = body.bounding_box.pos;
            self.angle = body.angle;
            self.size = body.bounding_box.size;
            self.hit_area = body.hit_area.clone();
        }
        self.name = item.name.clone();
    }

    fn refresh_single(&mut self, scene: &Scene) {
        if let [single] = self.members.as_slice() {
            if let Some(item) = scene.get(*single) {
                self.mirror(item);
            }
        }
    }

    pub fn prepare_dragging(&mut self, scene: &mut Scene) {
        self.last_pos = self.pos;
        for id in &self.members {
            if let Some(member) = scene.get_mut(*id).and_then(Item::as_transformable_mut) {
                member.prepare_dragging();
            }
        }
    }

    /// Moves every member to its drag start + `movement`
    pub fn drag(&mut self, scene: &mut Scene, movement: Vec3) {
        for id in &self.members {
            if let Some(member) = scene.get_mut(*id).and_then(Item::as_transformable_mut) {
                member.drag(movement);
            }
        }
        self.follow_members(scene, movement);
    }

    fn follow_members(&mut self, scene: &Scene, movement: Vec3) {
        if self.is_single() {
            self.refresh_single(scene);
        } else {
            self.pos = self.last_pos + movement;
            self.visual_pos = self.pos;
        }
    }

    /// Drags like [`Self::drag`], then pulls each member face that ends up
    /// within `settings.snap_threshold` of one of `base`'s planes onto that
    /// plane. Corrections from several faces accumulate. A multi-selection is
    /// rebuilt from its members afterwards.
    pub fn snap(&mut self, scene: &mut Scene, base: ItemId, movement: Vec3, settings: &Settings) {
        let Some(planes) = scene
            .get(base)
            .and_then(Item::as_solid)
            .and_then(|solid| solid.snap_frame())
            .map(|frame| frame.planes.clone())
        else {
            self.drag(scene, movement);
            return;
        };

        let mut blinks = Vec::new();
        for id in &self.members {
            let Some(member) = scene.get_mut(*id).and_then(Item::as_transformable_mut) else {
                continue;
            };
            member.drag(movement);
            let mut member_movement = movement;

            for face in 0..6 {
                let (axes, points) = member.body().face_offsets();
                let (axis, point) = (axes[face], member.pos() + points[face]);
                if let Some((plane, to_plane)) = closest_plane(&planes, point, axis, settings.snap_search_distance) {
                    if to_plane.magnitude() < settings.snap_threshold {
                        blinks.push(plane);
                        member_movement += to_plane;
                        member.drag(member_movement);
                    }
                }
            }
        }

        if !blinks.is_empty() {
            debug!("{} faces snapped against {}", blinks.len(), base);
        }
        if let Some(frame) = scene.solid_mut(base).and_then(|solid| solid.snap_frame_mut()) {
            for plane in blinks {
                frame.start_blink(plane);
            }
        }
        if self.is_single() {
            self.refresh_single(scene);
        } else {
            // snapped members no longer share one movement
            let (members, drag_start) = (self.members.clone(), self.last_pos);
            self.reset(scene, &members);
            self.last_pos = drag_start;
        }
    }

    /// Rotates every member by the same per-axis delta
    pub fn add_angles(&mut self, scene: &mut Scene, delta: Vec3) {
        for id in &self.members {
            if let Some(member) = scene.get_mut(*id).and_then(Item::as_transformable_mut) {
                member.add_angles(delta);
            }
        }
        self.angle = (self.angle + delta).map(clamp_angle);
        self.refresh_single(scene);
    }

    /// Sets the UI position along one axis; every member moves by the same
    /// amount
    pub fn change_pos(&mut self, scene: &mut Scene, axis: Axis, value: Real) {
        let delta = value - axis.get(&self.visual_pos);
        for id in &self.members {
            if let Some(member) = scene.get_mut(*id).and_then(Item::as_transformable_mut) {
                member.update_pos(delta, axis);
            }
        }
        let members = self.members.clone();
        self.reset(scene, &members);
    }

    pub fn change_angle(&mut self, scene: &mut Scene, axis: Axis, value: Real) {
        let delta = clamp_angle(value) - axis.get(&self.angle);
        self.add_angles(scene, axis.unit() * delta);
    }

    /// Resizes every solid member along one axis by the difference to the
    /// current size
    pub fn change_size(&mut self, scene: &mut Scene, axis: Axis, value: Real) {
        let delta = value - axis.get(&self.size);
        for id in &self.members {
            if let Some(member) = scene.solid_mut(*id) {
                member.update_size(delta, axis);
            }
        }
        let members = self.members.clone();
        self.reset(scene, &members);
    }

    /// Renames a single selected item
    pub fn change_name(&mut self, scene: &mut Scene, name: &str) {
        if let [single] = self.members.as_slice() {
            if let Some(item) = scene.get_mut(*single) {
                item.name = name.to_string();
                self.name = item.name.clone();
            }
        }
    }
}

/// Plane index and the vector from `point` to the closest plane along `axis`
fn closest_plane(planes: &[SnapPlane], point: Vec3, axis: Vec3, search_distance: Real) -> Option<(usize, Vec3)> {
    let mut closest = search_distance;
    let mut found = None;
    for (index, plane) in planes.iter().enumerate() {
        let Some(t) = plane.calc_time(point, axis) else {
            continue;
        };
        if t.abs() < closest {
            closest = t.abs();
            found = Some((index, axis * t));
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::Solid;
    use crate::gfx::scene::{ItemKind, SolidMesh, StaticMesh};

    fn add_cube(scene: &mut Scene, center: Vec3) -> ItemId {
        let anchor = center - Vec3::new(0.5, 0.5, 0.5);
        let solid = SolidMesh::lumber(1.0, 1.0, 1.0, anchor, &Settings::default());
        scene.add_item("cube", ItemKind::Solid(solid))
    }

    fn pos_of(scene: &Scene, id: ItemId) -> Vec3 {
        scene.get(id).unwrap().pos()
    }

    #[test]
    fn test_single_selection_mirrors_item() {
        let mut scene = Scene::new(false);
        let a = add_cube(&mut scene, Vec3::new(1.0, 2.0, 3.0));
        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[a]);

        assert!(aggregate.visible);
        assert_eq!(aggregate.pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aggregate.visual_pos, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(aggregate.size, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(aggregate.name, "cube");

        aggregate.reset(&scene, &[]);
        assert!(!aggregate.visible);
    }

    #[test]
    fn test_multi_selection_synthesizes_centre_and_hit_area() {
        let mut scene = Scene::new(false);
        let a = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let b = add_cube(&mut scene, Vec3::new(4.0, 2.0, 0.0));
        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[a, b]);

        assert_eq!(aggregate.pos, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(aggregate.angle, Vec3::zero());
        assert_eq!(aggregate.size, Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(aggregate.hit_area.min(), Vec3::new(-2.5, -1.5, -0.5));
        assert_eq!(aggregate.hit_area.max(), Vec3::new(2.5, 1.5, 0.5));
    }

    #[test]
    fn test_drag_moves_every_member_by_same_movement() {
        let mut scene = Scene::new(false);
        let a = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let b = add_cube(&mut scene, Vec3::new(3.0, 0.0, 0.0));
        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[a, b]);

        aggregate.prepare_dragging(&mut scene);
        aggregate.drag(&mut scene, Vec3::new(0.0, 1.0, 0.0));
        aggregate.drag(&mut scene, Vec3::new(0.0, 2.0, 0.0));

        assert_eq!(pos_of(&scene, a), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(pos_of(&scene, b), Vec3::new(3.0, 2.0, 0.0));
        assert_eq!(aggregate.pos, Vec3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_multi_rotation_applies_same_delta_to_each_member() {
        let mut scene = Scene::new(false);
        let a = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let b = add_cube(&mut scene, Vec3::new(3.0, 0.0, 0.0));
        scene.get_mut(b).and_then(Item::as_transformable_mut).unwrap().add_angles(Vec3::new(0.0, 30.0, 0.0));

        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[a, b]);
        aggregate.add_angles(&mut scene, Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(scene.get(a).unwrap().body().unwrap().angle.y, 10.0);
        assert_eq!(scene.get(b).unwrap().body().unwrap().angle.y, 40.0);
        assert_eq!(pos_of(&scene, b), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(aggregate.angle.y, 10.0);
    }

    fn snap_after(movement: Real) -> Real {
        let settings = Settings::default();
        let mut scene = Scene::new(false);
        let base = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let moved = add_cube(&mut scene, Vec3::new(1.0, 0.0, 0.0));
        scene.get_mut(base).unwrap().set_snap_base(true);

        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[moved]);
        aggregate.prepare_dragging(&mut scene);
        aggregate.snap(&mut scene, base, Vec3::new(movement, 0.0, 0.0), &settings);
        pos_of(&scene, moved).x
    }

    #[test]
    fn test_face_within_threshold_snaps_onto_plane() {
        assert!((snap_after(0.099) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_face_outside_threshold_is_left_alone() {
        assert!((snap_after(0.101) - 1.101).abs() < 1e-9);
    }

    #[test]
    fn test_snap_blinks_the_capturing_plane() {
        let settings = Settings::default();
        let mut scene = Scene::new(false);
        let base = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let moved = add_cube(&mut scene, Vec3::new(3.0, 3.0, 1.05));
        scene.get_mut(base).unwrap().set_snap_base(true);

        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[moved]);
        aggregate.prepare_dragging(&mut scene);
        aggregate.snap(&mut scene, base, Vec3::new(0.0, 0.0, 0.0), &settings);

        assert!((pos_of(&scene, moved) - Vec3::new(3.0, 3.0, 1.0)).magnitude() < 1e-9);
        let frame = scene.get(base).and_then(Item::as_solid).and_then(|s| s.snap_frame()).unwrap();
        // the +z plane of the base
        assert!(frame.planes[2].is_blinking());
        assert!(!frame.planes[0].is_blinking());
    }

    #[test]
    fn test_change_size_and_pos_go_through_the_members() {
        let mut scene = Scene::new(false);
        let a = add_cube(&mut scene, Vec3::new(0.5, 0.5, 0.5));
        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[a]);

        aggregate.change_size(&mut scene, Axis::X, 3.0);
        assert_eq!(aggregate.size.x, 3.0);
        assert_eq!(aggregate.visual_pos, Vec3::new(0.0, 0.0, 0.0));

        aggregate.change_pos(&mut scene, Axis::Y, 2.0);
        assert_eq!(aggregate.visual_pos, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(pos_of(&scene, a), Vec3::new(1.5, 2.5, 0.5));

        aggregate.change_name(&mut scene, "board");
        assert_eq!(scene.get(a).unwrap().name, "board");
    }

    #[test]
    fn test_snap_moves_and_snaps_static_members_too() {
        let settings = Settings::default();
        let mut scene = Scene::new(false);
        let base = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let board = add_cube(&mut scene, Vec3::new(-3.0, 0.0, -1.0));
        let mesh = Solid::cube(Vec3::zero(), [0.5, 0.5, 0.5]).to_mesh();
        let imported = scene.add_item(
            "imported",
            ItemKind::Static(StaticMesh::new(mesh, Vec3::new(2.5, 2.5, -1.45))),
        );
        scene.get_mut(base).unwrap().set_snap_base(true);

        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[board, imported]);
        aggregate.prepare_dragging(&mut scene);
        aggregate.snap(&mut scene, base, Vec3::new(0.0, 0.0, 1.0), &settings);

        assert!((pos_of(&scene, board) - Vec3::new(-3.0, 0.0, 0.0)).magnitude() < 1e-9);
        // raised to z = 0.05, then pulled onto the base's +z plane
        assert!((pos_of(&scene, imported) - Vec3::new(3.0, 3.0, 0.0)).magnitude() < 1e-9);
    }

    #[test]
    fn test_multi_snap_recentres_on_snapped_members() {
        let settings = Settings::default();
        let mut scene = Scene::new(false);
        let base = add_cube(&mut scene, Vec3::new(0.0, 0.0, 0.0));
        let a = add_cube(&mut scene, Vec3::new(1.05, 0.0, 0.0));
        let b = add_cube(&mut scene, Vec3::new(1.0, 4.0, 0.0));
        scene.get_mut(base).unwrap().set_snap_base(true);

        let mut aggregate = SelectionAggregate::new();
        aggregate.reset(&scene, &[a, b]);
        aggregate.prepare_dragging(&mut scene);
        aggregate.snap(&mut scene, base, Vec3::zero(), &settings);

        assert!((pos_of(&scene, a) - Vec3::new(1.0, 0.0, 0.0)).magnitude() < 1e-9);
        assert!((aggregate.pos - Vec3::new(1.0, 2.0, 0.0)).magnitude() < 1e-9);
        assert!((aggregate.hit_area.max() - Vec3::new(0.5, 2.5, 0.5)).magnitude() < 1e-9);

        // the drag start survives the rebuild
        aggregate.drag(&mut scene, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(pos_of(&scene, a), Vec3::new(1.05, 0.0, 3.0));
        assert!((aggregate.pos - Vec3::new(1.025, 2.0, 3.0)).magnitude() < 1e-9);
    }
}
