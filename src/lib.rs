// src/lib.rs
//! Lumberyard Editing Kernel
//!
//! The geometry and selection core of an interactive scene editor for rigid
//! mesh pieces ("lumber"). Rendering, windowing and UI widgets live outside this
//! crate; they feed pointer/wheel/resize events into a [`Context`] and read back
//! the item list, the active hit result and the selection aggregate.
//!
//! ## Layout
//!
//! - [`csg`] - boundary-representation solids and boolean operations
//! - [`gfx`] - math, camera, hit testing, scene items, snapping, selection
//! - [`context`] - the scene context: event dispatch and edit-mode state machine
//! - [`config`] - editor settings
//! - [`error`] - precondition failures surfaced to callers

pub mod config;
pub mod context;
pub mod csg;
pub mod error;
pub mod gfx;

// Re-export main types for convenience
pub use config::Settings;
pub use context::{Context, EditMode};
pub use error::EditorError;

/// Scalar type used by every geometric quantity in the crate.
pub type Real = f64;

/// Creates a context with default settings for a viewport of the given size
pub fn default(width: u32, height: u32) -> Context {
    Context::new(width, height, Settings::default())
}
