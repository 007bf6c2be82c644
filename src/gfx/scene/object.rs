use std::fmt;

use cgmath::Zero;

use super::bounding_box::{BoundingBox, HitArea};
use super::mesh::TriangleMesh;
use super::shared_vertices::SharedVertices;
use crate::config::Settings;
use crate::csg::Solid;
use crate::gfx::math::{
    box_corners, clamp_angle, inverse_rotation, model_matrix, rotation_matrix, transform_point,
    transform_vector, Axis, Mat4, Vec3,
};
use crate::gfx::picking::{hit_test_obb, HitResult};
use crate::gfx::snap::{face_axes, face_points, SnapFrame};
use crate::Real;

/// Stable handle of a scene item. Ids are never reused within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFlags {
    pub selectable: bool,
    pub selected: bool,
    pub pre_selected: bool,
    pub snap_base: bool,
    pub undrawable: bool,
    /// Exists only in the scene tree (groups); such items have no geometry
    pub ui_item: bool,
}

/// Geometry and placement shared by every drawable item.
///
/// The mesh is stored in item-local coordinates. `pos` is the world position
/// of the local origin, which is also the rotation centre.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBody {
    pub mesh: TriangleMesh,
    pub pos: Vec3,
    /// Euler angles in degrees, each in [0, 360]
    pub angle: Vec3,
    pub bounding_box: BoundingBox,
    pub hit_area: HitArea,
    last_pos: Vec3,
}

impl MeshBody {
    /// Places the mesh so that its local min corner lands on `anchor`
    pub fn new(mesh: TriangleMesh, anchor: Vec3) -> Self {
        let mut bounding_box = BoundingBox::new(anchor);
        bounding_box.fit(&mesh.vertices);
        let pos = bounding_box.parent_position();
        let hit_area = HitArea::from_bounds(bounding_box.min, bounding_box.max);
        Self {
            mesh,
            pos,
            angle: Vec3::zero(),
            bounding_box,
            hit_area,
            last_pos: pos,
        }
    }

    /// Places the mesh with its local origin at `pos`
    pub fn at_position(mesh: TriangleMesh, pos: Vec3, angle: Vec3) -> Self {
        let mut body = Self::new(mesh, Vec3::zero());
        body.angle = angle.map(clamp_angle);
        body.pos = pos;
        body.last_pos = pos;
        body.bounding_box.update_from_parent_position(pos);
        body
    }

    pub fn rotation(&self) -> Mat4 {
        rotation_matrix(self.angle)
    }

    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.pos, self.angle)
    }

    /// Ray test against the hit area as an oriented box. Also records the
    /// drag start position.
    pub fn test_click(&mut self, origin: Vec3, ray: Vec3) -> Option<HitResult> {
        self.last_pos = self.pos;
        let rotation = self.rotation();
        let center = self.pos + transform_vector(&rotation, self.hit_area.center);
        hit_test_obb(origin, ray, center, &rotation, self.hit_area.half_size)
    }

    pub fn prepare_dragging(&mut self) {
        self.last_pos = self.pos;
    }

    /// Moves to drag start + `movement`
    pub fn drag(&mut self, movement: Vec3) {
        self.pos = self.last_pos + movement;
        self.bounding_box.update_from_parent_position(self.pos);
    }

    pub fn add_angles(&mut self, delta: Vec3) {
        self.angle = (self.angle + delta).map(clamp_angle);
    }

    pub fn set_angle(&mut self, axis: Axis, value: Real) {
        *axis.get_mut(&mut self.angle) = clamp_angle(value);
    }

    /// Moves the bounding-box anchor along one axis
    pub fn update_pos(&mut self, delta: Real, axis: Axis) {
        *axis.get_mut(&mut self.bounding_box.pos) += delta;
        self.pos = self.bounding_box.parent_position();
        self.last_pos = self.pos;
    }

    /// Refits bounds after a vertex edit; the world position stays put
    pub fn refit_keep_position(&mut self) {
        self.bounding_box.fit(&self.mesh.vertices);
        self.hit_area.update_size(self.bounding_box.min, self.bounding_box.max);
        self.bounding_box.update_from_parent_position(self.pos);
    }

    /// Refits bounds after a resize; the min corner anchor stays put
    pub fn refit_anchored(&mut self) {
        self.bounding_box.fit(&self.mesh.vertices);
        self.hit_area.update_size(self.bounding_box.min, self.bounding_box.max);
        self.pos = self.bounding_box.parent_position();
        self.last_pos = self.pos;
    }

    /// World face directions and the offsets from `pos` to the centre of
    /// each bounding-box face, in [`face_axes`] order
    pub fn face_offsets(&self) -> ([Vec3; 6], [Vec3; 6]) {
        let axes = face_axes(&self.rotation());
        let points = face_points(&axes, &self.bounding_box);
        (axes, points)
    }

    /// World positions of the bounding-box corners
    pub fn rotated_corners(&self) -> [Vec3; 8] {
        let model = self.model_matrix();
        box_corners(self.bounding_box.min, self.bounding_box.max).map(|c| transform_point(&model, c))
    }
}

/// Items that can be picked and moved
pub trait Transformable {
    fn body(&self) -> &MeshBody;
    fn body_mut(&mut self) -> &mut MeshBody;

    /// Called after a translation
    fn on_moved(&mut self) {}

    /// Called after a rotation or a change of shape
    fn on_reshaped(&mut self) {}

    fn pos(&self) -> Vec3 {
        self.body().pos
    }

    fn test_click(&mut self, origin: Vec3, ray: Vec3) -> Option<HitResult> {
        self.body_mut().test_click(origin, ray)
    }

    fn prepare_dragging(&mut self) {
        self.body_mut().prepare_dragging();
    }

    fn drag(&mut self, movement: Vec3) {
        self.body_mut().drag(movement);
        self.on_moved();
    }

    fn add_angles(&mut self, delta: Vec3) {
        self.body_mut().add_angles(delta);
        self.on_reshaped();
    }

    fn set_angle(&mut self, axis: Axis, value: Real) {
        self.body_mut().set_angle(axis, value);
        self.on_reshaped();
    }

    fn update_pos(&mut self, delta: Real, axis: Axis) {
        self.body_mut().update_pos(delta, axis);
        self.on_moved();
    }
}

/// What the rendering layer needs to draw an item
pub trait Drawable {
    fn model_matrix(&self) -> Mat4;
    fn render_mesh(&self) -> &TriangleMesh;

    /// Translucent items are drawn after opaque ones
    fn is_blending(&self) -> bool {
        false
    }
}

/// A CSG-capable mesh: editable per vertex, usable as a boolean operand and
/// as a snap base.
#[derive(Debug, Clone)]
pub struct SolidMesh {
    pub body: MeshBody,
    pub shared_vertices: SharedVertices,
    csg: Solid,
    csg_invalidated: bool,
    snap: Option<SnapFrame>,
}

impl SolidMesh {
    /// Builds the item from a solid given in local coordinates, anchored by
    /// its min corner
    pub fn from_solid(solid: Solid, anchor: Vec3, settings: &Settings) -> Self {
        let body = MeshBody::new(solid.to_mesh(), anchor);
        Self::with_body(body, solid, settings)
    }

    /// Builds the item from a local solid whose origin sits at world `pos`
    pub fn from_solid_at(solid: Solid, pos: Vec3, angle: Vec3, settings: &Settings) -> Self {
        let body = MeshBody::at_position(solid.to_mesh(), pos, angle);
        Self::with_body(body, solid, settings)
    }

    fn with_body(body: MeshBody, csg: Solid, settings: &Settings) -> Self {
        let shared_vertices = SharedVertices::new(
            &body.mesh.vertices,
            settings.vertex_hit_radius,
            settings.selected_vertex_hit_radius,
        );
        Self {
            body,
            shared_vertices,
            csg,
            csg_invalidated: false,
            snap: None,
        }
    }

    /// Box of `width` x `length` x `height` whose min corner sits at `anchor`
    pub fn lumber(width: Real, length: Real, height: Real, anchor: Vec3, settings: &Settings) -> Self {
        let solid = Solid::cube(Vec3::zero(), [width / 2.0, length / 2.0, height / 2.0]);
        Self::from_solid(solid, anchor, settings)
    }

    pub fn sphere(radius: Real, anchor: Vec3, settings: &Settings) -> Self {
        Self::from_solid(Solid::sphere(Vec3::zero(), radius, 16, 8), anchor, settings)
    }

    /// Writes shared vertex positions back into the mesh and refreshes every
    /// derived structure
    pub fn recompile(&mut self) {
        self.shared_vertices.apply_to(&mut self.body.mesh.vertices);
        self.body.mesh.mark_dirty();
        self.csg_invalidated = true;
        self.body.refit_keep_position();
        self.on_reshaped();
    }

    /// Grows or shrinks the mesh along `axis` by `delta`, keeping its min corner
    pub fn update_size(&mut self, delta: Real, axis: Axis) {
        self.shared_vertices.update_size(delta * 0.5, axis);
        self.shared_vertices.apply_to(&mut self.body.mesh.vertices);
        self.body.mesh.mark_dirty();
        self.csg_invalidated = true;
        self.body.refit_anchored();
        self.on_reshaped();
    }

    pub fn is_csg_invalidated(&self) -> bool {
        self.csg_invalidated
    }

    /// Local boundary representation, rebuilt from the mesh when stale
    pub fn update_csg(&mut self) -> &Solid {
        if self.csg_invalidated {
            self.csg = Solid::from_mesh(&self.body.mesh);
            self.csg_invalidated = false;
        }
        &self.csg
    }

    /// Boundary representation with position and rotation baked in
    pub fn world_solid(&mut self) -> Solid {
        let model = self.body.model_matrix();
        self.update_csg().transformed(&model)
    }

    /// Moves a world-space solid into this item's local frame
    pub fn to_local(&self, solid: &Solid) -> Solid {
        let to_local = inverse_rotation(&self.body.rotation()) * Mat4::from_translation(-self.body.pos);
        solid.transformed(&to_local)
    }

    pub fn set_snap_base(&mut self, base: bool) {
        self.snap = if base {
            Some(SnapFrame::new(&self.body.rotation(), self.body.pos, &self.body.bounding_box))
        } else {
            None
        };
    }

    pub fn snap_frame(&self) -> Option<&SnapFrame> {
        self.snap.as_ref()
    }

    pub fn snap_frame_mut(&mut self) -> Option<&mut SnapFrame> {
        self.snap.as_mut()
    }

    /// Hit test for a shared vertex in world space
    pub fn test_vertex(&mut self, index: usize, origin: Vec3, ray: Vec3) -> Option<HitResult> {
        let model = self.body.model_matrix();
        self.shared_vertices.test_click(index, origin, ray, &model)
    }

    /// Drags a shared vertex by a world movement; call [`Self::recompile`]
    /// afterwards to commit
    pub fn drag_vertex(&mut self, index: usize, movement: Vec3) {
        let to_local = inverse_rotation(&self.body.rotation());
        self.shared_vertices.drag(index, movement, &to_local);
    }
}

impl Transformable for SolidMesh {
    fn body(&self) -> &MeshBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut MeshBody {
        &mut self.body
    }

    fn on_moved(&mut self) {
        if let Some(snap) = self.snap.as_mut() {
            snap.refresh_lightly(self.body.pos, &self.body.bounding_box);
        }
    }

    fn on_reshaped(&mut self) {
        let rotation = self.body.rotation();
        if let Some(snap) = self.snap.as_mut() {
            snap.refresh_fully(&rotation, self.body.pos, &self.body.bounding_box);
        }
    }
}

impl Drawable for SolidMesh {
    fn model_matrix(&self) -> Mat4 {
        self.body.model_matrix()
    }

    fn render_mesh(&self) -> &TriangleMesh {
        &self.body.mesh
    }
}

/// A mesh that is drawn but never edited: floor grid, light marker, imports
#[derive(Debug, Clone)]
pub struct StaticMesh {
    pub body: MeshBody,
    pub visible: bool,
    pub blending: bool,
}

impl StaticMesh {
    pub fn new(mesh: TriangleMesh, anchor: Vec3) -> Self {
        Self {
            body: MeshBody::new(mesh, anchor),
            visible: true,
            blending: false,
        }
    }

    pub fn at_position(mesh: TriangleMesh, pos: Vec3) -> Self {
        Self {
            body: MeshBody::at_position(mesh, pos, Vec3::zero()),
            visible: true,
            blending: false,
        }
    }

    pub fn with_blending(mut self, blending: bool) -> Self {
        self.blending = blending;
        self
    }
}

impl Transformable for StaticMesh {
    fn body(&self) -> &MeshBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut MeshBody {
        &mut self.body
    }
}

impl Drawable for StaticMesh {
    fn model_matrix(&self) -> Mat4 {
        self.body.model_matrix()
    }

    fn render_mesh(&self) -> &TriangleMesh {
        &self.body.mesh
    }

    fn is_blending(&self) -> bool {
        self.blending
    }
}

/// Container of other items. Children are held by id; each child points back
/// through [`Item::parent_group`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub children: Vec<ItemId>,
}

#[derive(Debug, Clone)]
pub enum ItemKind {
    Solid(SolidMesh),
    Static(StaticMesh),
    Group(Group),
}

impl ItemKind {
    /// Flags a freshly added item of this kind starts with
    pub fn default_flags(&self) -> ItemFlags {
        match self {
            ItemKind::Solid(_) => ItemFlags {
                selectable: true,
                ..Default::default()
            },
            ItemKind::Static(_) => ItemFlags::default(),
            ItemKind::Group(_) => ItemFlags {
                undrawable: true,
                ui_item: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub flags: ItemFlags,
    pub parent_group: Option<ItemId>,
    pub kind: ItemKind,
}

impl Item {
    pub fn as_solid(&self) -> Option<&SolidMesh> {
        match &self.kind {
            ItemKind::Solid(solid) => Some(solid),
            _ => None,
        }
    }

    pub fn as_solid_mut(&mut self) -> Option<&mut SolidMesh> {
        match &mut self.kind {
            ItemKind::Solid(solid) => Some(solid),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ItemKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            ItemKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_transformable(&self) -> Option<&dyn Transformable> {
        match &self.kind {
            ItemKind::Solid(solid) => Some(solid),
            ItemKind::Static(mesh) => Some(mesh),
            ItemKind::Group(_) => None,
        }
    }

    pub fn as_transformable_mut(&mut self) -> Option<&mut dyn Transformable> {
        match &mut self.kind {
            ItemKind::Solid(solid) => Some(solid),
            ItemKind::Static(mesh) => Some(mesh),
            ItemKind::Group(_) => None,
        }
    }

    pub fn as_drawable(&self) -> Option<&dyn Drawable> {
        if self.flags.undrawable {
            return None;
        }
        match &self.kind {
            ItemKind::Solid(solid) => Some(solid),
            ItemKind::Static(mesh) if mesh.visible => Some(mesh),
            _ => None,
        }
    }

    pub fn is_csg_capable(&self) -> bool {
        matches!(self.kind, ItemKind::Solid(_))
    }

    /// Shown in the scene tree
    pub fn is_listed(&self) -> bool {
        self.flags.selectable || self.flags.ui_item
    }

    pub fn is_mesh(&self) -> bool {
        self.as_transformable().is_some()
    }

    pub fn body(&self) -> Option<&MeshBody> {
        self.as_transformable().map(|t| t.body())
    }

    /// World centre; groups report the origin
    pub fn pos(&self) -> Vec3 {
        self.body().map_or_else(Vec3::zero, |b| b.pos)
    }

    /// Ray test tagged with this item's id
    pub fn test_click(&mut self, origin: Vec3, ray: Vec3) -> Option<HitResult> {
        let id = self.id;
        self.as_transformable_mut()?
            .test_click(origin, ray)
            .map(|hit| hit.with_item(id))
    }

    pub fn set_snap_base(&mut self, base: bool) {
        self.flags.snap_base = base;
        if let Some(solid) = self.as_solid_mut() {
            solid.set_snap_base(base);
        }
    }
}
