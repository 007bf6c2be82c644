//! # Rubber Band
//!
//! Rectangle dragged out with the primary button in Mesh mode. The corners
//! are kept in window pixels with `y` downwards; containment is tested in the
//! flipped (`y` upwards) frame that [`EditorCamera::project`] returns.
//!
//! [`EditorCamera::project`]: crate::gfx::camera::EditorCamera::project

use crate::Real;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RubberBand {
    enabled: bool,
    start: [Real; 2],
    current: [Real; 2],
    canvas_width: Real,
    canvas_height: Real,
}

/// Screen rectangle of the band, `y` upwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRect {
    pub min_x: Real,
    pub min_y: Real,
    pub max_x: Real,
    pub max_y: Real,
}

impl BandRect {
    pub fn contains(&self, x: Real, y: Real) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }
}

impl RubberBand {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas_width: width as Real,
            canvas_height: height as Real,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn update_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_width = width as Real;
        self.canvas_height = height as Real;
    }

    pub fn start(&mut self, x: Real, y: Real) {
        self.enabled = true;
        self.start = [x, y];
        self.current = [x, y];
    }

    pub fn drag(&mut self, x: Real, y: Real) {
        self.current = [x, y];
    }

    pub fn end(&mut self) {
        self.enabled = false;
    }

    /// Rectangle in window pixels, `y` downwards, for drawing
    pub fn screen_rect(&self) -> BandRect {
        BandRect {
            min_x: self.start[0].min(self.current[0]),
            min_y: self.start[1].min(self.current[1]),
            max_x: self.start[0].max(self.current[0]),
            max_y: self.start[1].max(self.current[1]),
        }
    }

    /// Rectangle with `y` flipped to grow upwards from the bottom edge
    pub fn gl_rect(&self) -> BandRect {
        let screen = self.screen_rect();
        BandRect {
            min_y: self.canvas_height - screen.max_y,
            max_y: self.canvas_height - screen.min_y,
            ..screen
        }
    }

    /// Whether a projected point (`y` upwards) lies inside the band
    pub fn contains_point(&self, x: Real, y: Real) -> bool {
        self.gl_rect().contains(x, y)
    }

    pub fn canvas_width(&self) -> Real {
        self.canvas_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_normalised_for_any_drag_direction() {
        let mut band = RubberBand::new(800, 600);
        band.start(300.0, 400.0);
        band.drag(100.0, 200.0);
        let rect = band.screen_rect();
        assert_eq!((rect.min_x, rect.min_y, rect.max_x, rect.max_y), (100.0, 200.0, 300.0, 400.0));
    }

    #[test]
    fn test_containment_uses_flipped_y() {
        let mut band = RubberBand::new(800, 600);
        band.start(100.0, 100.0);
        band.drag(200.0, 150.0);
        // screen rows 100..150 are gl rows 450..500
        assert!(band.contains_point(150.0, 475.0));
        assert!(!band.contains_point(150.0, 125.0));
        assert!(band.contains_point(100.0, 450.0));

        band.update_canvas_size(800, 300);
        assert!(band.contains_point(150.0, 175.0));
    }

    #[test]
    fn test_end_disables() {
        let mut band = RubberBand::new(10, 10);
        assert!(!band.is_enabled());
        band.start(1.0, 1.0);
        assert!(band.is_enabled());
        band.end();
        assert!(!band.is_enabled());
    }
}
