//! # Procedural Geometry Generation
//!
//! Fixed scene furniture generated in code rather than loaded from files.
//!
//! ## Supported Primitives
//!
//! - **Floor**: line grid on the y = 0 plane with a translucent quad under it
//! - **Light source**: two nested translucent spheres marking the light
//!
//! ## Usage
//!
//! ```rust
//! use lumberyard::gfx::geometry::{floor_grid, light_source, FLOOR_HALF_EXTENT};
//!
//! let floor = floor_grid(FLOOR_HALF_EXTENT);
//! assert_eq!(floor.triangle_count(), 2);
//!
//! let light = light_source();
//! assert!(light.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;
