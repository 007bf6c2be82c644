//! # Editor Settings
//!
//! A single settings value owned by the [`Context`](crate::Context). Nothing in
//! the crate reads settings from a global; components receive the values they
//! need when they are constructed or called.

use crate::Real;

/// World units are meters; lengths are shown in millimeters or inches.
pub const MILLIMETERS_PER_METER: Real = 1000.0;
/// Millimeter to inch factor.
pub const INCHES_PER_MILLIMETER: Real = 0.0393701;

/// How lengths are presented to the user. Sizes are always stored in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthDisplayMode {
    #[default]
    Millimeter,
    Inch,
}

impl LengthDisplayMode {
    /// Unit label for UI display
    pub fn unit(self) -> &'static str {
        match self {
            LengthDisplayMode::Millimeter => "mm",
            LengthDisplayMode::Inch => "inch",
        }
    }

    /// Converts a world length into the display unit
    pub fn to_display(self, world: Real) -> Real {
        let millimeters = world * MILLIMETERS_PER_METER;
        match self {
            LengthDisplayMode::Millimeter => millimeters,
            LengthDisplayMode::Inch => millimeters * INCHES_PER_MILLIMETER,
        }
    }

    /// Converts a length typed in the display unit back into world units
    pub fn from_display(self, shown: Real) -> Real {
        let millimeters = match self {
            LengthDisplayMode::Millimeter => shown,
            LengthDisplayMode::Inch => shown / INCHES_PER_MILLIMETER,
        };
        millimeters / MILLIMETERS_PER_METER
    }
}

/// Tunables for hit testing, snapping and camera control
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub length_display_mode: LengthDisplayMode,
    /// Registers hit areas and guide lines with the visualizer
    pub debug_mode: bool,
    /// A face closer than this to a snap plane is pulled onto it
    pub snap_threshold: Real,
    /// Initial "closest" distance when searching snap planes
    pub snap_search_distance: Real,
    /// Half size of the hit cube around an unselected vertex
    pub vertex_hit_radius: Real,
    /// Half size of the hit cube around a selected vertex
    pub selected_vertex_hit_radius: Real,
    /// Camera translation per wheel unit
    pub wheel_speed: Real,
    /// Orbit degrees per dragged pixel
    pub orbit_speed: Real,
    /// Face rotation degrees per dragged pixel (ctrl + secondary drag)
    pub face_speed: Real,
    /// Vertical field of view in degrees
    pub fovy: Real,
    pub znear: Real,
    pub zfar: Real,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            length_display_mode: LengthDisplayMode::Millimeter,
            debug_mode: true,
            snap_threshold: 0.1,
            snap_search_distance: 10.0,
            vertex_hit_radius: 0.008,
            selected_vertex_hit_radius: 0.012,
            wheel_speed: 0.005,
            orbit_speed: 0.5,
            face_speed: 0.1,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Settings {
    /// Switches the display unit
    pub fn set_length_display_mode(&mut self, mode: LengthDisplayMode) {
        self.length_display_mode = mode;
    }

    /// Unit label for the current display mode
    pub fn unit(&self) -> &'static str {
        self.length_display_mode.unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_labels_follow_mode() {
        let mut settings = Settings::default();
        assert_eq!(settings.unit(), "mm");
        settings.set_length_display_mode(LengthDisplayMode::Inch);
        assert_eq!(settings.unit(), "inch");
    }

    #[test]
    fn test_display_conversion_inverts() {
        let world = 0.254;
        let shown = LengthDisplayMode::Inch.to_display(world);
        assert!((shown - 10.0).abs() < 1e-3);
        let back = LengthDisplayMode::Inch.from_display(shown);
        assert!((back - world).abs() < 1e-9);
        assert_eq!(LengthDisplayMode::Millimeter.to_display(0.5), 500.0);
    }
}
