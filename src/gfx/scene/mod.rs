//! # Scene Management Module
//!
//! The item registry and everything an item is made of.
//!
//! ## Key Components
//!
//! - [`Scene`] - registry of items, groups and the hit-area visualizer
//! - [`Item`] - one entry: id, name, flags, parent group and an [`ItemKind`]
//! - [`SolidMesh`] - CSG-capable mesh with shared vertices and snap planes
//! - [`StaticMesh`] - drawn but never edited (floor, light source, imports)
//! - [`TriangleMesh`] - indexed triangles in item-local coordinates
//! - [`SharedVertices`] - position-deduplicated vertices used for editing
//! - [`BoundingBox`] / [`HitArea`] - local bounds and the picking volume
//!
//! ## Keeping items consistent
//!
//! Every edit of a [`SolidMesh`] goes through one of three paths, each of
//! which leaves mesh, bounding box, hit area, CSG solid and snap planes in
//! agreement:
//!
//! - translation ([`Transformable::drag`], [`Transformable::update_pos`])
//! - rotation ([`Transformable::add_angles`])
//! - reshaping ([`SolidMesh::recompile`], [`SolidMesh::update_size`])

pub mod bounding_box;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod shared_vertices;
pub mod vertex;

// Re-export main types
pub use bounding_box::{BoundingBox, HitArea, HIT_AREA_LINES};
pub use mesh::{MeshPayload, TriangleMesh};
pub use object::{
    Drawable, Group, Item, ItemFlags, ItemId, ItemKind, MeshBody, SolidMesh, StaticMesh, Transformable,
};
pub use scene::Scene;
pub use shared_vertices::{SharedVertex, SharedVertices};
pub use vertex::{PointVertex, Vertex3D};
