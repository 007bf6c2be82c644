//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree node structure and operations

use super::plane::Plane;
use super::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Splitting plane for this node *or* **None** for a leaf that
    /// only stores polygons.
    pub plane: Option<Plane>,

    /// Polygons in *front* half‑spaces.
    pub front: Option<Box<Node>>,

    /// Polygons in *back* half‑spaces.
    pub back: Option<Box<Node>>,

    /// Polygons that lie on `plane`.
    pub polygons: Vec<Polygon>,
}

impl Node {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Convert solid space to empty space and empty space to solid space
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Remove all polygons in `polygons` that are inside this BSP tree.
    /// A node without a plane keeps everything it is given.
    pub fn clip_polygons(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                front_polys.extend(coplanar_front);
                front_polys.extend(front_parts);
                back_polys.extend(coplanar_back);
                back_polys.extend(back_parts);
            }

            match node.front.as_deref() {
                Some(front) if !front_polys.is_empty() => stack.push((front, front_polys)),
                Some(_) => {}
                None => result.extend(front_polys),
            }

            // Back polygons without a back subtree are inside: dropped
            if let Some(back) = node.back.as_deref() {
                if !back_polys.is_empty() {
                    stack.push((back, back_polys));
                }
            }
        }
        result
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = bsp.clip_polygons(&node.polygons);
            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(
                [&node.front, &node.back]
                    .iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    /// Build a BSP tree from the given polygons. A node without a plane takes
    /// the plane of the first polygon it receives.
    pub fn build(&mut self, polygons: &[Polygon]) {
        if polygons.is_empty() {
            return;
        }

        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let plane = node
                .plane
                .get_or_insert_with(|| polys[0].plane.clone())
                .clone();

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            let Node {
                front: front_child,
                back: back_child,
                ..
            } = node;

            if !front.is_empty() {
                let front_node = front_child.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node.as_mut(), front));
            }

            if !back.is_empty() {
                let back_node = back_child.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node.as_mut(), back));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::Solid;
    use crate::gfx::math::Vec3;

    #[test]
    fn test_build_keeps_every_polygon_of_a_convex_solid() {
        let cube = Solid::cube(Vec3::new(0.0, 0.0, 0.0), [1.0, 1.0, 1.0]);
        let node = Node::from_polygons(cube.polygons());
        assert_eq!(node.all_polygons().len(), 6);
    }

    #[test]
    fn test_empty_tree_clips_nothing() {
        let cube = Solid::cube(Vec3::new(0.0, 0.0, 0.0), [1.0, 1.0, 1.0]);
        let empty = Node::new();
        assert_eq!(empty.clip_polygons(cube.polygons()).len(), 6);
    }

    #[test]
    fn test_polygons_inside_a_solid_are_clipped() {
        let outer = Solid::cube(Vec3::new(0.0, 0.0, 0.0), [2.0, 2.0, 2.0]);
        let inner = Solid::cube(Vec3::new(0.0, 0.0, 0.0), [0.5, 0.5, 0.5]);
        let tree = Node::from_polygons(outer.polygons());
        assert!(tree.clip_polygons(inner.polygons()).is_empty());
    }

    #[test]
    fn test_invert_twice_restores_polygons() {
        let cube = Solid::cube(Vec3::new(0.0, 0.0, 0.0), [1.0, 1.0, 1.0]);
        let mut node = Node::from_polygons(cube.polygons());
        let before = node.all_polygons();
        node.invert();
        node.invert();
        assert_eq!(node.all_polygons(), before);
    }
}
