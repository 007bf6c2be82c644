use log::{debug, info};

use super::object::{Drawable, Item, ItemFlags, ItemId, ItemKind, SolidMesh};
use crate::error::EditorError;
use crate::gfx::visualizer::HitAreaVisualizer;

/// Registry of every item in the editor, in insertion order
#[derive(Debug, Clone)]
pub struct Scene {
    items: Vec<Item>,
    next_id: u64,
    pub visualizer: HitAreaVisualizer,
}

impl Scene {
    /// Creates an empty scene; `debug` enables the hit-area visualizer
    pub fn new(debug: bool) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            visualizer: HitAreaVisualizer::new(debug),
        }
    }

    /// Adds an item with the default flags of its kind
    pub fn add_item(&mut self, name: impl Into<String>, kind: ItemKind) -> ItemId {
        let flags = kind.default_flags();
        self.add_item_with_flags(name, kind, flags)
    }

    pub fn add_item_with_flags(&mut self, name: impl Into<String>, kind: ItemKind, flags: ItemFlags) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;

        let item = Item {
            id,
            name: name.into(),
            flags,
            parent_group: None,
            kind,
        };
        info!("Added item {} '{}'", id, item.name);
        if item.is_mesh() {
            self.visualizer.register(id);
        }
        self.items.push(item);
        id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn solid_mut(&mut self, id: ItemId) -> Option<&mut SolidMesh> {
        self.get_mut(id)?.as_solid_mut()
    }

    /// Items with geometry, drawn or not
    pub fn mesh_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_mesh())
    }

    pub fn selectable_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.flags.selectable)
            .map(|item| item.id)
            .collect()
    }

    /// Selectable meshes that are currently selected, in registry order
    pub fn selected_mesh_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.is_mesh() && item.flags.selectable && item.flags.selected)
            .map(|item| item.id)
            .collect()
    }

    pub fn drawable_items(&self) -> Vec<&dyn Drawable> {
        self.items.iter().filter_map(|item| item.as_drawable()).collect()
    }

    /// Items shown in the scene tree, depth first from the roots
    pub fn ui_items_in_order(&self) -> Vec<ItemId> {
        let mut ordered = Vec::new();
        let mut stack: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.is_listed() && item.parent_group.is_none())
            .map(|item| item.id)
            .rev()
            .collect();

        while let Some(id) = stack.pop() {
            let Some(item) = self.get(id) else {
                continue;
            };
            ordered.push(id);
            if let Some(group) = item.as_group() {
                stack.extend(group.children.iter().rev().copied());
            }
        }
        ordered
    }

    /// Every item nested below `id`
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(group) = self.get(current).and_then(Item::as_group) {
                for &child in &group.children {
                    found.push(child);
                    stack.push(child);
                }
            }
        }
        found
    }

    /// Selects the contents of every selected group
    pub fn propagate_group_selection(&mut self) {
        let groups: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.is_listed() && item.flags.selected && item.as_group().is_some())
            .map(|item| item.id)
            .collect();
        for group in groups {
            for child in self.descendants(group) {
                if let Some(item) = self.get_mut(child) {
                    item.flags.selected = true;
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        for item in &mut self.items {
            item.flags.selected = false;
        }
    }

    /// Removes items, detaching them from their groups and orphaning their
    /// children. Unknown ids are skipped.
    pub fn remove_items(&mut self, ids: &[ItemId]) -> Vec<Item> {
        let mut removed = Vec::new();
        for &id in ids {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let item = self.items.remove(index);

            if let Some(parent) = item.parent_group {
                if let Some(group) = self.get_mut(parent).and_then(Item::as_group_mut) {
                    group.children.retain(|c| *c != id);
                }
            }
            if let Some(group) = item.as_group() {
                for &child in &group.children {
                    if let Some(child) = self.get_mut(child) {
                        child.parent_group = None;
                    }
                }
            }
            self.visualizer.deregister(id);
            info!("Removed item {} '{}'", id, item.name);
            removed.push(item);
        }
        removed
    }

    fn check_group_child(&self, group: ItemId, child: ItemId) -> Result<(), EditorError> {
        let target = self.get(group).ok_or(EditorError::UnknownItem(group))?;
        if target.as_group().is_none() {
            return Err(EditorError::NotAGroup(group));
        }
        if !self.contains(child) {
            return Err(EditorError::UnknownItem(child));
        }

        // `child` must not be `group` or one of its ancestors
        let mut cursor = Some(group);
        while let Some(current) = cursor {
            if current == child {
                return Err(EditorError::GroupCycle { group, child });
            }
            cursor = self.get(current).and_then(|item| item.parent_group);
        }
        Ok(())
    }

    fn detach(&mut self, child: ItemId) {
        let parent = self.get(child).and_then(|item| item.parent_group);
        if let Some(parent) = parent {
            if let Some(group) = self.get_mut(parent).and_then(Item::as_group_mut) {
                group.children.retain(|c| *c != child);
            }
        }
        if let Some(item) = self.get_mut(child) {
            item.parent_group = None;
        }
    }

    /// Appends `child` to `group`, moving it out of any previous group
    pub fn add_child(&mut self, group: ItemId, child: ItemId) -> Result<(), EditorError> {
        self.insert_child(group, child, None)
    }

    /// Places `child` right after `sibling` inside `group`, or at the end when
    /// `sibling` is not a member
    pub fn insert_item_after(&mut self, group: ItemId, sibling: ItemId, child: ItemId) -> Result<(), EditorError> {
        self.insert_child(group, child, Some(sibling))
    }

    fn insert_child(&mut self, group: ItemId, child: ItemId, after: Option<ItemId>) -> Result<(), EditorError> {
        self.check_group_child(group, child)?;
        self.detach(child);

        if let Some(children) = self.get_mut(group).and_then(Item::as_group_mut).map(|g| &mut g.children) {
            let position = after
                .and_then(|sibling| children.iter().position(|c| *c == sibling))
                .map_or(children.len(), |i| i + 1);
            children.insert(position, child);
        }
        if let Some(item) = self.get_mut(child) {
            item.parent_group = Some(group);
        }
        debug!("Item {} placed in group {}", child, group);
        Ok(())
    }

    pub fn remove_child(&mut self, group: ItemId, child: ItemId) -> Result<(), EditorError> {
        let target = self.get(group).ok_or(EditorError::UnknownItem(group))?;
        let is_member = target
            .as_group()
            .ok_or(EditorError::NotAGroup(group))?
            .children
            .contains(&child);
        if is_member {
            self.detach(child);
        }
        Ok(())
    }
}
