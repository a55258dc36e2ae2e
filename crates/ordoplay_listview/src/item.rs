// SPDX-License-Identifier: MIT OR Apache-2.0
//! List items and the container holding them.
//!
//! The list view never owns item data. It addresses items by position in an
//! [`ItemContainer`], which also carries the per-item visibility, height,
//! highlight flag and indent. [`ItemTree`] is the in-memory container.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default item height in pixels
pub const DEFAULT_ITEM_HEIGHT: i32 = 16;

/// Unique identifier for list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Create a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Item data stored in the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    /// Item name
    pub name: String,
    /// Height in pixels
    pub height: i32,
    /// Whether the item is shown
    pub visible: bool,
    /// Whether the item currently shows its selected state
    pub highlighted: bool,
    /// Hierarchy depth
    pub indent: i32,
}

impl Default for ItemData {
    fn default() -> Self {
        Self {
            name: "Item".to_string(),
            height: DEFAULT_ITEM_HEIGHT,
            visible: true,
            highlighted: false,
            indent: 0,
        }
    }
}

impl ItemData {
    /// Create a new item with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style indent
    pub fn with_indent(mut self, indent: i32) -> Self {
        self.indent = indent;
        self
    }

    /// Builder-style height
    pub fn with_height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }
}

/// Ordered sequence of items shown by a list view.
///
/// Index-based accessors address the listed items. Out-of-range indices read as
/// hidden, zero-sized, unindented items and writes to them are ignored.
pub trait ItemContainer {
    /// Number of listed items
    fn len(&self) -> usize;

    /// Whether nothing is listed
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at a list position
    fn item_at(&self, index: usize) -> Option<ItemId>;

    /// List position of an item
    fn position(&self, id: ItemId) -> Option<usize>;

    /// Whether the item exists in the container, listed or not
    fn is_registered(&self, id: ItemId) -> bool;

    /// List an item at `index` (clamped to the item count).
    /// Returns false for unknown or already listed items.
    fn insert(&mut self, index: usize, id: ItemId) -> bool;

    /// Unlist the item at `index`
    fn remove_at(&mut self, index: usize) -> Option<ItemId>;

    /// Unlist every item
    fn clear(&mut self);

    /// Find a registered item by name
    fn find_by_name(&self, name: &str) -> Option<ItemId>;

    /// Whether the item is shown
    fn is_visible(&self, index: usize) -> bool;

    /// Show or hide an item
    fn set_visible(&mut self, index: usize, visible: bool);

    /// Item height in pixels
    fn height(&self, index: usize) -> i32;

    /// Vertical offset of the item from the top of the content
    fn offset(&self, index: usize) -> i32;

    /// Whether the item shows its selected state
    fn is_highlighted(&self, index: usize) -> bool;

    /// Set the selected-state display
    fn set_highlighted(&mut self, index: usize, highlighted: bool);

    /// Hierarchy depth of an item
    fn indent(&self, index: usize) -> i32;

    /// Set the hierarchy depth of an item
    fn set_indent(&mut self, index: usize, indent: i32);
}

/// In-memory item registry plus the listed content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTree {
    /// All known items
    items: IndexMap<ItemId, ItemData>,
    /// Listed items in display order
    content: Vec<ItemId>,
}

impl ItemTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item without listing it
    pub fn create_item(&mut self, data: ItemData) -> ItemId {
        let id = ItemId::new();
        self.items.insert(id, data);
        id
    }

    /// Get an item by ID
    pub fn get(&self, id: &ItemId) -> Option<&ItemData> {
        self.items.get(id)
    }

    /// Get a mutable reference to an item by ID
    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut ItemData> {
        self.items.get_mut(id)
    }

    /// Unregister an item, unlisting it as well
    pub fn destroy_item(&mut self, id: &ItemId) -> Option<ItemData> {
        self.content.retain(|listed| listed != id);
        self.items.shift_remove(id)
    }

    /// Number of registered items
    pub fn registered_count(&self) -> usize {
        self.items.len()
    }

    /// Listed items in display order
    pub fn content(&self) -> &[ItemId] {
        &self.content
    }

    fn data_at(&self, index: usize) -> Option<&ItemData> {
        self.content.get(index).and_then(|id| self.items.get(id))
    }

    fn data_at_mut(&mut self, index: usize) -> Option<&mut ItemData> {
        let id = self.content.get(index)?;
        self.items.get_mut(id)
    }
}

impl ItemContainer for ItemTree {
    fn len(&self) -> usize {
        self.content.len()
    }

    fn item_at(&self, index: usize) -> Option<ItemId> {
        self.content.get(index).copied()
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.content.iter().position(|listed| *listed == id)
    }

    fn is_registered(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    fn insert(&mut self, index: usize, id: ItemId) -> bool {
        if !self.is_registered(id) || self.content.contains(&id) {
            return false;
        }
        let index = index.min(self.content.len());
        self.content.insert(index, id);
        true
    }

    fn remove_at(&mut self, index: usize) -> Option<ItemId> {
        (index < self.content.len()).then(|| self.content.remove(index))
    }

    fn clear(&mut self) {
        self.content.clear();
    }

    fn find_by_name(&self, name: &str) -> Option<ItemId> {
        self.items
            .iter()
            .find(|(_, data)| data.name == name)
            .map(|(id, _)| *id)
    }

    fn is_visible(&self, index: usize) -> bool {
        self.data_at(index).is_some_and(|data| data.visible)
    }

    fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(data) = self.data_at_mut(index) {
            data.visible = visible;
        }
    }

    fn height(&self, index: usize) -> i32 {
        self.data_at(index).map_or(0, |data| data.height)
    }

    fn offset(&self, index: usize) -> i32 {
        self.content
            .iter()
            .take(index)
            .filter_map(|id| self.items.get(id))
            .filter(|data| data.visible)
            .fold(0i32, |offset, data| offset.saturating_add(data.height))
    }

    fn is_highlighted(&self, index: usize) -> bool {
        self.data_at(index).is_some_and(|data| data.highlighted)
    }

    fn set_highlighted(&mut self, index: usize, highlighted: bool) {
        if let Some(data) = self.data_at_mut(index) {
            data.highlighted = highlighted;
        }
    }

    fn indent(&self, index: usize) -> i32 {
        self.data_at(index).map_or(0, |data| data.indent)
    }

    fn set_indent(&mut self, index: usize, indent: i32) {
        if let Some(data) = self.data_at_mut(index) {
            data.indent = indent;
        }
    }
}
