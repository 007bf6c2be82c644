//! # Constructive Solid Geometry
//!
//! Boundary-representation solids (sets of convex polygons) and the boolean
//! operations between them, built on a BSP tree per operand.
//!
//! Solids are values: every operation returns a new [`Solid`] and leaves its
//! inputs untouched. Converting to and from the editor's [`TriangleMesh`]
//! happens in [`Solid::from_mesh`] and [`Solid::to_mesh`].
//!
//! [`TriangleMesh`]: crate::gfx::scene::TriangleMesh

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod solid;
pub mod vertex;

use crate::Real;

/// Tolerance used when classifying points against planes
pub const EPSILON: Real = 1e-5;

pub use bsp::Node;
pub use plane::Plane;
pub use polygon::Polygon;
pub use solid::Solid;
pub use vertex::Vertex;
