//! # Gizmo System
//!
//! Gizmos are interactive handles drawn on top of the scene. The
//! [`TransformGizmo`] shows one arm per world axis at the selection centre;
//! grabbing an arm constrains dragging and rotation to that axis.
//!
//! ## Key Components
//!
//! - [`Gizmo`] - Base trait for all gizmo implementations
//! - [`TransformGizmo`] - Axis arms and centre handle of the selection

pub mod traits;
pub mod transform_gizmo;

// Re-export main types
pub use traits::Gizmo;
pub use transform_gizmo::{GizmoHandle, TransformGizmo};
