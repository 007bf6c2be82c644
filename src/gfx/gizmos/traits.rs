//! # Gizmo Traits
//!
//! Interface shared by interactive overlays that sit on top of the selection
//! and take part in picking.

use crate::gfx::math::Vec3;
use crate::gfx::picking::HitResult;
use crate::gfx::selection::SelectionAggregate;

/// Core trait for gizmo components.
///
/// ## Lifecycle
///
/// 1. **Update** - called whenever the selection or the camera changed, so
///    the gizmo can follow the selection and keep a constant on-screen size
/// 2. **Picking** - [`Gizmo::test_click`] runs before any item is tested; a
///    hit takes priority over the scene
pub trait Gizmo {
    /// Get the name of the gizmo.
    fn name(&self) -> &str;

    /// Check if the gizmo is currently enabled.
    fn is_enabled(&self) -> bool;

    /// Set the enabled state of the gizmo.
    ///
    /// A disabled gizmo is never hit.
    fn set_enabled(&mut self, enabled: bool);

    /// Re-places the gizmo for the current selection seen from `eye`.
    fn update(&mut self, selection: &SelectionAggregate, eye: Vec3);

    /// Ray test against the gizmo's handles.
    ///
    /// # Returns
    ///
    /// The closest handle hit, tagged with its axis when the handle has one
    fn test_click(&self, origin: Vec3, ray: Vec3) -> Option<HitResult>;

    /// Check if this gizmo should be drawn right now.
    fn should_be_visible(&self) -> bool {
        self.is_enabled()
    }
}
