//! # Graphics Module
//!
//! Everything the editor knows about space: math, the camera, picking, the
//! item registry, snapping and the selection.
//!
//! ## Architecture Overview
//!
//! - **Math** ([`math`]) - `cgmath` aliases, Euler rotations, bounds helpers
//! - **Camera System** ([`camera`]) - editor camera with orbit, face rotation and presets
//! - **Picking** ([`picking`]) - pixel rays and ray/box intersection
//! - **Scene Management** ([`scene`]) - items, meshes, shared vertices, groups
//! - **Snapping** ([`snap`]) - the six face planes of the snap base
//! - **Selection** ([`selection`]) - the selection as one editable pseudo-object
//! - **Gizmos** ([`gizmos`]) - axis handles at the selection centre
//! - **Geometry** ([`geometry`]) - floor grid and light source meshes
//! - **Visualizer** ([`visualizer`]) - debug wireframes and guide lines
//!
//! Rendering itself happens outside the crate: drawable items expose their
//! model matrix, a mesh with a dirty flag and `bytemuck` vertex data.

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod math;
pub mod picking;
pub mod scene;
pub mod selection;
pub mod snap;
pub mod visualizer;

// Re-export commonly used types
pub use camera::EditorCamera;
pub use picking::{HitResult, Raytracer};
pub use selection::SelectionAggregate;
