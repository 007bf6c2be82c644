//! Debug overlay for hit areas and guide lines.
//!
//! One instance is owned by each [`Scene`](crate::gfx::scene::Scene). When
//! disabled it accepts no registrations and draws nothing.

use std::collections::BTreeMap;

use crate::gfx::math::{transform_point, Vec3};
use crate::gfx::scene::{HitArea, ItemId, MeshBody, HIT_AREA_LINES};
use crate::Real;

/// A named line segment in world space
#[derive(Debug, Clone, PartialEq)]
pub struct GuideLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [Real; 4],
}

#[derive(Debug, Clone, Default)]
pub struct HitAreaVisualizer {
    enabled: bool,
    registered: Vec<ItemId>,
    lines: BTreeMap<String, GuideLine>,
}

impl HitAreaVisualizer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops every registration and line
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.registered.clear();
            self.lines.clear();
        }
    }

    pub fn register(&mut self, id: ItemId) {
        if self.enabled && !self.registered.contains(&id) {
            self.registered.push(id);
        }
    }

    pub fn deregister(&mut self, id: ItemId) {
        self.registered.retain(|r| *r != id);
    }

    pub fn is_registered(&self, id: ItemId) -> bool {
        self.registered.contains(&id)
    }

    pub fn registered(&self) -> &[ItemId] {
        &self.registered
    }

    /// Adds a guide line, or moves the existing one with the same name
    pub fn draw_line(&mut self, name: &str, start: Vec3, end: Vec3, color: [Real; 4]) {
        if !self.enabled {
            return;
        }
        match self.lines.get_mut(name) {
            Some(line) => {
                line.start = start;
                line.end = end;
                line.color = color;
            }
            None => {
                self.lines.insert(name.to_string(), GuideLine { start, end, color });
            }
        }
    }

    pub fn line(&self, name: &str) -> Option<&GuideLine> {
        self.lines.get(name)
    }

    pub fn lines(&self) -> impl Iterator<Item = (&str, &GuideLine)> {
        self.lines.iter().map(|(name, line)| (name.as_str(), line))
    }

    /// World-space wireframe segments of a hit area placed by `body`
    pub fn wireframe(body: &MeshBody, hit_area: &HitArea) -> Vec<(Vec3, Vec3)> {
        let model = body.model_matrix();
        let corners = hit_area.corners().map(|c| transform_point(&model, c));
        HIT_AREA_LINES
            .iter()
            .map(|[a, b]| (corners[*a as usize], corners[*b as usize]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_visualizer_ignores_registrations() {
        let mut visualizer = HitAreaVisualizer::new(false);
        visualizer.register(ItemId(1));
        visualizer.draw_line("x", Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), [1.0; 4]);
        assert!(visualizer.registered().is_empty());
        assert!(visualizer.line("x").is_none());
    }

    #[test]
    fn test_draw_line_updates_in_place() {
        let mut visualizer = HitAreaVisualizer::new(true);
        let origin = Vec3::new(0.0, 0.0, 0.0);
        visualizer.draw_line("axis", origin, Vec3::new(1.0, 0.0, 0.0), [1.0, 0.0, 0.0, 1.0]);
        visualizer.draw_line("axis", origin, Vec3::new(0.0, 2.0, 0.0), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(visualizer.lines().count(), 1);
        assert_eq!(visualizer.line("axis").unwrap().end, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_register_is_idempotent_and_deregister_removes() {
        let mut visualizer = HitAreaVisualizer::new(true);
        visualizer.register(ItemId(1));
        visualizer.register(ItemId(1));
        visualizer.register(ItemId(2));
        assert_eq!(visualizer.registered(), &[ItemId(1), ItemId(2)]);
        visualizer.deregister(ItemId(1));
        assert!(!visualizer.is_registered(ItemId(1)));
        visualizer.set_enabled(false);
        assert!(visualizer.registered().is_empty());
    }
}
