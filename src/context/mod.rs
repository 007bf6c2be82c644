//! # Scene Context
//!
//! Owns the scene, camera, selection and gizmo, and turns pointer and wheel
//! events into edits. Everything runs synchronously inside the event call;
//! when a handler returns, the scene is in a consistent post-edit state.
//!
//! ## Edit modes
//!
//! - **Mesh**: a primary press picks whole items (the transform gizmo is
//!   tested first), ctrl toggles instead of replacing the selection, and a
//!   press that hits nothing starts the rubber band.
//! - **Vertex**: a primary press picks shared vertices of the selected solids.
//!   Entering this mode needs at least one selected item and every selected
//!   item must be a solid.

pub mod edit_mode;
pub mod input;
pub mod rubber_band;

pub use edit_mode::EditMode;
pub use input::{Buttons, Modifiers, PointerEvent, WheelEvent};
pub use rubber_band::{BandRect, RubberBand};

use cgmath::{InnerSpace, Zero};
use log::{debug, info, warn};

use crate::config::Settings;
use crate::error::EditorError;
use crate::gfx::camera::{CameraController, CameraPreset, EditorCamera};
use crate::gfx::geometry::{floor_grid, light_source, FLOOR_HALF_EXTENT};
use crate::gfx::gizmos::{Gizmo, TransformGizmo};
use crate::gfx::math::{try_normalize, Vec3};
use crate::gfx::picking::{closer_result, HitResult, Raytracer};
use crate::gfx::scene::{Item, ItemFlags, ItemId, ItemKind, MeshPayload, Scene, SolidMesh, StaticMesh, TriangleMesh};
use crate::gfx::selection::SelectionAggregate;
use crate::Real;

/// Where the light marker sits
pub const LIGHT_POSITION: [Real; 3] = [1.0, 5.0, 1.0];

/// Dimensions of a lumber piece to add
#[derive(Debug, Clone, PartialEq)]
pub struct LumberSize {
    pub width: Real,
    pub length: Real,
    pub height: Real,
    pub label: String,
}

impl LumberSize {
    pub fn new(width: Real, length: Real, height: Real, label: impl Into<String>) -> Self {
        Self {
            width,
            length,
            height,
            label: label.into(),
        }
    }
}

/// A shared vertex picked in Vertex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    pub item: ItemId,
    pub index: usize,
}

pub struct Context {
    width: u32,
    height: u32,
    pub settings: Settings,
    pub scene: Scene,
    pub camera: EditorCamera,
    camera_controller: CameraController,
    pub selection: SelectionAggregate,
    pub gizmo: TransformGizmo,
    pub rubber_band: RubberBand,
    edit_mode: EditMode,
    obj_hit_result: Option<HitResult>,
    axis_hit_result: Option<HitResult>,
    /// Selected meshes in the order they were picked; boolean operands come
    /// from here
    selected_item_queue: Vec<ItemId>,
    /// Grabbed vertices, grouped by owning item
    selected_vertex_queue: Vec<VertexRef>,
    snap_base: Option<ItemId>,
    /// Look at the selection centre instead of the free view
    pub focus_mode: bool,
    time: Real,
    floor: ItemId,
    light: ItemId,
}

impl Context {
    /// Creates a context with the floor grid and the (hidden) light marker
    pub fn new(width: u32, height: u32, settings: Settings) -> Self {
        let mut scene = Scene::new(settings.debug_mode);

        let floor = StaticMesh::at_position(floor_grid(FLOOR_HALF_EXTENT), Vec3::zero()).with_blending(true);
        let floor = scene.add_item("Floor", ItemKind::Static(floor));

        let mut light = StaticMesh::at_position(light_source(), Vec3::from(LIGHT_POSITION)).with_blending(true);
        light.visible = false;
        let light = scene.add_item("Light Source", ItemKind::Static(light));
        scene.visualizer.deregister(light);

        Self {
            width,
            height,
            camera: EditorCamera::new(width, height, &settings),
            camera_controller: CameraController::from_settings(&settings),
            settings,
            scene,
            selection: SelectionAggregate::new(),
            gizmo: TransformGizmo::new(),
            rubber_band: RubberBand::new(width, height),
            edit_mode: EditMode::Mesh,
            obj_hit_result: None,
            axis_hit_result: None,
            selected_item_queue: Vec::new(),
            selected_vertex_queue: Vec::new(),
            snap_base: None,
            focus_mode: false,
            time: 0.0,
            floor,
            light,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn selected_item_queue(&self) -> &[ItemId] {
        &self.selected_item_queue
    }

    pub fn selected_vertex_queue(&self) -> &[VertexRef] {
        &self.selected_vertex_queue
    }

    /// The active hit, for gizmo highlighting
    pub fn hit_result(&self) -> Option<&HitResult> {
        self.obj_hit_result.as_ref()
    }

    pub fn snap_base(&self) -> Option<ItemId> {
        self.snap_base
    }

    pub fn time(&self) -> Real {
        self.time
    }

    pub fn floor(&self) -> ItemId {
        self.floor
    }

    pub fn light(&self) -> ItemId {
        self.light
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.resize(width, height);
        self.rubber_band.update_canvas_size(width, height);
    }

    // ---- items ----

    /// Adds lumber pieces side by side along x, starting at the origin
    pub fn add_lumbers(&mut self, lumbers: &[LumberSize]) -> Vec<ItemId> {
        let mut last_x = 0.0;
        lumbers
            .iter()
            .map(|size| {
                let anchor = Vec3::new(last_x, 0.0, 0.0);
                last_x += size.width;
                let solid = SolidMesh::lumber(size.width, size.length, size.height, anchor, &self.settings);
                self.scene.add_item(size.label.clone(), ItemKind::Solid(solid))
            })
            .collect()
    }

    pub fn add_sphere(&mut self, radius: Real, anchor: Vec3) -> ItemId {
        let solid = SolidMesh::sphere(radius, anchor, &self.settings);
        self.scene.add_item("Sphere", ItemKind::Solid(solid))
    }

    /// Adds an externally loaded mesh. It can be selected and moved but not
    /// edited per vertex or used in boolean operations.
    pub fn import_mesh(&mut self, name: &str, payload: MeshPayload, anchor: Vec3) -> Result<ItemId, EditorError> {
        let mesh = TriangleMesh::from_payload(payload)?;
        let flags = ItemFlags {
            selectable: true,
            ..Default::default()
        };
        Ok(self
            .scene
            .add_item_with_flags(name, ItemKind::Static(StaticMesh::new(mesh, anchor)), flags))
    }

    pub fn set_light_visible(&mut self, visible: bool) {
        let light = self.light;
        if let Some(ItemKind::Static(mesh)) = self.scene.get_mut(light).map(|item| &mut item.kind) {
            mesh.visible = visible;
        }
        if visible {
            self.scene.visualizer.register(light);
        } else {
            self.scene.visualizer.deregister(light);
        }
    }

    /// Removes items and forgets them in every queue
    pub fn remove_items(&mut self, ids: &[ItemId]) {
        let removed = self.scene.remove_items(ids);
        for item in &removed {
            self.selected_item_queue.retain(|id| *id != item.id);
            self.selected_vertex_queue.retain(|v| v.item != item.id);
            if self.snap_base == Some(item.id) {
                self.snap_base = None;
            }
        }
        self.update_selected_items(true);
    }

    /// Subtracts the second queued mesh from the first. The operands are
    /// replaced by the result, which keeps the first operand's position and
    /// rotation.
    pub fn subtract_selected(&mut self) -> Result<ItemId, EditorError> {
        let [a, b] = match self.selected_item_queue.as_slice() {
            [a, b] => [*a, *b],
            queue => {
                warn!("Subtraction rejected: {} operands queued", queue.len());
                return Err(EditorError::OperandCount(queue.len()));
            }
        };
        for id in [a, b] {
            if !self.scene.get(id).is_some_and(Item::is_csg_capable) {
                warn!("Subtraction rejected: {} is not CSG-capable", id);
                return Err(EditorError::NotCsgCapable(id));
            }
        }

        let b_world = self.scene.solid_mut(b).ok_or(EditorError::NotCsgCapable(b))?.world_solid();
        let operand = self.scene.solid_mut(a).ok_or(EditorError::NotCsgCapable(a))?;
        let result = operand.world_solid().subtract(&b_world);
        let local = operand.to_local(&result);
        let (pos, angle) = (operand.body.pos, operand.body.angle);

        let name = self
            .scene
            .get(a)
            .map(|item| format!("{} - CSG", item.name))
            .unwrap_or_default();
        let solid = SolidMesh::from_solid_at(local, pos, angle, &self.settings);
        let polygons = result.polygons().len();
        let id = self.scene.add_item(name, ItemKind::Solid(solid));
        info!("Subtracted {} from {} into {} ({} polygons)", b, a, id, polygons);

        self.remove_items(&[a, b]);
        Ok(id)
    }

    /// Rebuilds the selection aggregate from the selected flags; with
    /// `queue_too` the pick queue is replaced by the selected meshes in
    /// registry order
    pub fn update_selected_items(&mut self, queue_too: bool) {
        self.scene.propagate_group_selection();
        if queue_too {
            self.selected_item_queue = self.scene.selected_mesh_ids();
        }
        self.selection.reset(&self.scene, &self.selected_item_queue);
        self.refresh_gizmo();
    }

    fn refresh_gizmo(&mut self) {
        self.gizmo.update(&self.selection, self.camera.eye());
    }

    // ---- modes ----

    /// Flips between Mesh and Vertex mode. Entering Vertex mode without a
    /// valid selection leaves the context in Mesh mode.
    pub fn toggle_edit_mode(&mut self) -> Result<EditMode, EditorError> {
        let next = self.edit_mode.toggled();
        if next == EditMode::Vertex {
            if let Err(e) = self.check_vertex_editable() {
                warn!("Vertex editing rejected: {}", e);
                self.edit_mode = EditMode::Mesh;
                return Err(e);
            }
        }
        self.edit_mode = next;
        info!("Edit mode: {}", next);
        Ok(next)
    }

    fn check_vertex_editable(&self) -> Result<(), EditorError> {
        if !self.selection.visible {
            return Err(EditorError::NothingSelected);
        }
        let selected = self
            .scene
            .items()
            .iter()
            .filter(|item| item.is_mesh() && item.flags.selected);
        for item in selected {
            if !item.is_csg_capable() {
                return Err(EditorError::VertexEditUnsupported(item.id));
            }
        }
        Ok(())
    }

    /// Makes the first selected mesh the snap base, or clears the snap base
    /// when nothing is selected
    pub fn snap_mode(&mut self) {
        self.snap_base = None;
        let ids: Vec<ItemId> = self.scene.items().iter().map(|item| item.id).collect();
        for id in ids {
            if let Some(item) = self.scene.get_mut(id) {
                if item.flags.snap_base {
                    item.set_snap_base(false);
                }
            }
        }

        let first = self
            .scene
            .items()
            .iter()
            .find(|item| item.is_mesh() && item.flags.selected)
            .map(|item| item.id);
        if let Some(id) = first {
            if let Some(item) = self.scene.get_mut(id) {
                item.set_snap_base(true);
            }
            self.snap_base = Some(id);
        }
        info!("Snap base: {:?}", self.snap_base);
    }

    pub fn toggle_focus_mode(&mut self) {
        self.focus_mode = !self.focus_mode;
        self.update_camera();
    }

    /// Shows or hides hit areas and guide lines
    pub fn toggle_debug_view(&mut self) {
        let enabled = !self.scene.visualizer.is_enabled();
        self.settings.debug_mode = enabled;
        self.scene.visualizer.set_enabled(enabled);
        if enabled {
            let visible: Vec<ItemId> = self
                .scene
                .mesh_items()
                .filter(|item| item.as_drawable().is_some())
                .map(|item| item.id)
                .collect();
            for id in visible {
                self.scene.visualizer.register(id);
            }
        }
    }

    /// Advances the clock by `dt` seconds and the snap-plane flashes with it
    pub fn increase_time(&mut self, dt: Real) {
        self.time += dt;
        if let Some(frame) = self
            .snap_base
            .and_then(|id| self.scene.solid_mut(id))
            .and_then(|solid| solid.snap_frame_mut())
        {
            frame.advance(dt * 1000.0);
        }
    }

    pub fn draw_line(&mut self, name: &str, start: Vec3, end: Vec3, color: [Real; 4]) {
        self.scene.visualizer.draw_line(name, start, end, color);
    }

    // ---- camera ----

    pub fn move_camera_to(&mut self, preset: CameraPreset) {
        self.camera.move_to_preset(preset);
        self.update_camera();
    }

    pub fn reset_camera(&mut self) {
        self.move_camera_to(CameraPreset::Default);
    }

    pub fn update_camera(&mut self) {
        let focus = (self.focus_mode && self.selection.visible).then_some(self.selection.pos);
        self.camera.refresh(focus);
        self.refresh_gizmo();
    }

    // ---- input ----

    pub fn mouse_down(&mut self, event: &PointerEvent) {
        if event.buttons.is_secondary_only() {
            return;
        }
        let tracer = Raytracer::new(&self.camera);
        let ray = tracer.ray_for_pixel(event.x, event.y);
        match self.edit_mode {
            EditMode::Mesh => self.select_items(&tracer, ray, event),
            EditMode::Vertex => self.select_vertices(&tracer, ray, event.modifiers.ctrl),
        }
    }

    fn select_items(&mut self, tracer: &Raytracer, ray: Vec3, event: &PointerEvent) {
        let ctrl = event.modifiers.ctrl;

        self.axis_hit_result = self.gizmo.test_click(tracer.eye, ray);
        if self.axis_hit_result.is_some() {
            self.obj_hit_result = self.axis_hit_result.clone();
            self.selection.prepare_dragging(&mut self.scene);
            return;
        }

        let mut queue = if ctrl {
            self.selected_item_queue.clone()
        } else {
            self.scene.clear_selection();
            Vec::new()
        };

        let mut closest: Option<HitResult> = None;
        for id in self.scene.selectable_ids() {
            let hit = self.scene.get_mut(id).and_then(|item| item.test_click(tracer.eye, ray));
            closest = closer_result(closest, hit);
        }
        let picked = closest.as_ref().and_then(|hit| hit.item);

        for id in self.scene.selectable_ids() {
            let Some(item) = self.scene.get_mut(id) else {
                continue;
            };
            if Some(id) == picked {
                item.flags.selected = if ctrl { !item.flags.selected } else { true };
                if !item.flags.selected {
                    queue.retain(|q| *q != id);
                }
            } else if !ctrl {
                item.flags.selected = false;
                queue.retain(|q| *q != id);
            }
        }

        match picked {
            Some(id) => {
                if self.scene.get(id).is_some_and(|item| item.flags.selected) && !queue.contains(&id) {
                    queue.push(id);
                }
            }
            None => {
                queue.clear();
                self.scene.clear_selection();
                self.rubber_band.start(event.x, event.y);
            }
        }

        self.obj_hit_result = closest;
        self.selected_item_queue = queue;
        self.update_selected_items(false);
    }

    fn select_vertices(&mut self, tracer: &Raytracer, ray: Vec3, ctrl: bool) {
        if !ctrl {
            self.selected_vertex_queue.clear();
        }

        // every vertex is tested so each one records its drag start
        let mut closest: Option<(HitResult, VertexRef)> = None;
        for item in self.scene.selected_mesh_ids() {
            let Some(solid) = self.scene.solid_mut(item) else {
                continue;
            };
            for index in 0..solid.shared_vertices.len() {
                let Some(hit) = solid.test_vertex(index, tracer.eye, ray) else {
                    continue;
                };
                let closer = match &closest {
                    Some((best, _)) => hit.t < best.t,
                    None => true,
                };
                if closer {
                    closest = Some((hit.with_item(item), VertexRef { item, index }));
                }
            }
        }
        let picked = closest.as_ref().map(|(_, v)| *v);

        for item in self.scene.selected_mesh_ids() {
            let Some(solid) = self.scene.solid_mut(item) else {
                continue;
            };
            for index in 0..solid.shared_vertices.len() {
                let this = VertexRef { item, index };
                if Some(this) == picked {
                    let selected = solid.shared_vertices.get(index).is_some_and(|v| v.selected);
                    solid.shared_vertices.set_selected(index, if ctrl { !selected } else { true });
                } else if !ctrl {
                    solid.shared_vertices.set_selected(index, false);
                }
            }
        }

        match closest {
            Some((mut hit, vertex)) => {
                let selected = self
                    .scene
                    .get(vertex.item)
                    .and_then(Item::as_solid)
                    .and_then(|solid| solid.shared_vertices.get(vertex.index))
                    .is_some_and(|v| v.selected);
                self.selected_vertex_queue.retain(|v| *v != vertex);
                if selected {
                    self.selected_vertex_queue.push(vertex);
                    self.selected_vertex_queue.sort_by_key(|v| v.item.0);
                }
                hit.normal = try_normalize(tracer.eye - hit.hit).unwrap_or(hit.normal);
                debug!("Picked vertex {} of {}", vertex.index, vertex.item);
                self.obj_hit_result = Some(hit);
            }
            None => {
                // a miss deselects every vertex, ctrl or not
                for item in self.scene.selected_mesh_ids() {
                    if let Some(solid) = self.scene.solid_mut(item) {
                        solid.shared_vertices.clear_selection();
                    }
                }
                self.selected_vertex_queue.clear();
                self.obj_hit_result = None;
            }
        }
    }

    pub fn mouse_move(&mut self, event: &PointerEvent) {
        if !event.dragging {
            return;
        }

        if event.buttons.is_primary_only() {
            if self.rubber_band.is_enabled() {
                self.rubber_band.drag(event.x, event.y);
                self.select_items_via_rubber_band();
            } else if self.selection.visible && event.modifiers.shift {
                self.rotate_items(event);
            } else if self.selection.visible && self.edit_mode == EditMode::Vertex {
                self.drag_vertices(event);
            } else if self.selection.visible && self.edit_mode == EditMode::Mesh {
                self.drag_items(event);
            }
        } else if event.buttons.is_secondary_only() {
            self.camera_controller
                .process_drag(event.delta_x, event.delta_y, event.modifiers.ctrl, &mut self.camera);
            self.update_camera();
        }
    }

    fn select_items_via_rubber_band(&mut self) {
        for id in self.scene.selectable_ids() {
            let Some(pos) = self.scene.get(id).filter(|item| item.is_mesh()).map(Item::pos) else {
                continue;
            };
            let point = self.camera.project(pos);
            let inside = self.rubber_band.contains_point(point.x, point.y);
            if let Some(item) = self.scene.get_mut(id) {
                item.flags.pre_selected = inside;
            }
        }
    }

    fn target_axis(&self) -> Option<Vec3> {
        self.axis_hit_result
            .as_ref()
            .and_then(|hit| hit.target_axis)
            .map(|axis| axis.unit())
    }

    fn rotate_items(&mut self, event: &PointerEvent) {
        let deltas = match self.target_axis() {
            Some(axis) => {
                let guide = Vec3::new(1.0, 1.0, 1.0).normalize();
                axis * guide.dot(Vec3::new(event.delta_x, event.delta_y, 0.0))
            }
            None => Vec3::new(event.delta_y, event.delta_x, 0.0),
        };
        self.selection.add_angles(&mut self.scene, deltas.map(Real::ceil));
        self.refresh_gizmo();
    }

    /// Movement on the drag plane through the grabbed point, facing the hit
    /// normal. `None` when the ray runs parallel to that plane.
    fn drag_movement(&self, event: &PointerEvent) -> Option<Vec3> {
        let grabbed = self.obj_hit_result.as_ref()?;
        let tracer = Raytracer::new(&self.camera);
        let hit = tracer.hit_on_plane(event.x, event.y, grabbed.hit, grabbed.normal)?;
        Some(hit - grabbed.hit)
    }

    fn drag_items(&mut self, event: &PointerEvent) {
        let Some(mut movement) = self.drag_movement(event) else {
            return;
        };
        if let Some(axis) = self.target_axis() {
            movement = axis * movement.dot(axis);
        }

        let base = self
            .snap_base
            .filter(|id| self.scene.get(*id).is_some_and(|item| !item.flags.selected));
        match base {
            Some(base) => self.selection.snap(&mut self.scene, base, movement, &self.settings),
            None => self.selection.drag(&mut self.scene, movement),
        }
        self.refresh_gizmo();
    }

    fn drag_vertices(&mut self, event: &PointerEvent) {
        let Some(movement) = self.drag_movement(event) else {
            return;
        };
        for vertex in &self.selected_vertex_queue {
            if let Some(solid) = self.scene.solid_mut(vertex.item) {
                solid.drag_vertex(vertex.index, movement);
            }
        }

        // the queue is grouped by item, so each mesh recompiles once
        let mut owners: Vec<ItemId> = self.selected_vertex_queue.iter().map(|v| v.item).collect();
        owners.dedup();
        for id in owners {
            if let Some(solid) = self.scene.solid_mut(id) {
                solid.recompile();
            }
        }
        let members = self.selected_item_queue.clone();
        self.selection.reset(&self.scene, &members);
        self.refresh_gizmo();
    }

    /// Ends a rubber-band selection; without one this does nothing
    pub fn mouse_up(&mut self, event: &PointerEvent) {
        if event.buttons.is_secondary_only() || !self.rubber_band.is_enabled() {
            return;
        }
        self.rubber_band.end();
        let ids: Vec<ItemId> = self.scene.items().iter().map(|item| item.id).collect();
        for id in ids {
            if let Some(item) = self.scene.get_mut(id) {
                item.flags.selected = item.flags.pre_selected;
                item.flags.pre_selected = false;
            }
        }
        self.update_selected_items(true);
    }

    pub fn wheel(&mut self, event: &WheelEvent) {
        self.camera_controller
            .process_wheel(event.delta, event.modifiers.shift, event.modifiers.ctrl, &mut self.camera);
        self.update_camera();
    }
}
