// SPDX-License-Identifier: MIT OR Apache-2.0
//! List view selection controller.

use crate::config::ListViewConfig;
use crate::event::{EventListener, ListViewEvent};
use crate::hierarchy;
use crate::input::{Key, MouseButton, MouseButtons, Qualifiers};
use crate::item::{ItemContainer, ItemId};
use crate::selection::SelectionSet;
use serde::{Deserialize, Serialize};

/// Default double-click interval in seconds
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: f32 = 0.5;

/// When selected items show their selected state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightMode {
    /// Never highlight
    Never,
    /// Highlight while the list view has focus
    #[default]
    Focus,
    /// Always highlight
    Always,
}

impl HighlightMode {
    /// Parse a mode name case-insensitively. Unknown names give [`HighlightMode::Focus`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "never" => Self::Never,
            "always" => Self::Always,
            _ => Self::Focus,
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Focus => "focus",
            Self::Always => "always",
        }
    }
}

/// Selection and navigation state of a list of items.
///
/// Items live in the container `C`; the view tracks which positions are
/// selected and keeps the selection consistent as items are inserted and
/// removed. Selection changes are reported to subscribers before the
/// triggering call returns.
pub struct ListView<C: ItemContainer> {
    items: C,
    selections: SelectionSet,
    highlight_mode: HighlightMode,
    multiselect: bool,
    hierarchy_mode: bool,
    clear_selection_on_defocus: bool,
    focus: bool,
    double_click_interval: f32,
    double_click_timer: f32,
    last_clicked: Option<usize>,
    /// Fraction of the viewport moved by page up/down
    page_step: f32,
    viewport_height: i32,
    /// Vertical scroll position in pixels
    view_position: i32,
    listeners: Vec<EventListener>,
}

impl<C: ItemContainer> ListView<C> {
    /// Create a list view over a container
    pub fn new(items: C) -> Self {
        Self {
            items,
            selections: SelectionSet::new(),
            highlight_mode: HighlightMode::Focus,
            multiselect: false,
            hierarchy_mode: false,
            clear_selection_on_defocus: false,
            focus: false,
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
            double_click_timer: 0.0,
            last_clicked: None,
            page_step: 1.0,
            viewport_height: 0,
            view_position: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for selection notifications
    pub fn subscribe(&mut self, listener: impl FnMut(&ListViewEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: ListViewEvent) {
        tracing::trace!("List view event {event:?}");
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    /// The item container
    pub fn container(&self) -> &C {
        &self.items
    }

    /// Mutable access to the item container.
    ///
    /// Listing or unlisting items here bypasses selection bookkeeping; use the
    /// item methods of the view for that.
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.items
    }

    /// Advance the double-click timer
    pub fn update(&mut self, time_step: f32) {
        if self.double_click_timer > 0.0 {
            self.double_click_timer = (self.double_click_timer - time_step).max(0.0);
        }
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    /// Append an item
    pub fn add_item(&mut self, item: ItemId) -> bool {
        self.insert_item(self.items.len(), item)
    }

    /// Insert an item at `index` (clamped). Unknown or already listed items are rejected.
    pub fn insert_item(&mut self, index: usize, item: ItemId) -> bool {
        let index = index.min(self.items.len());
        if !self.items.insert(index, item) {
            tracing::debug!("Rejected list item {:?}", item.0);
            return false;
        }

        self.items.set_highlighted(index, false);
        self.selections.shift_for_insert(index);
        self.update_selection_effect();
        true
    }

    /// Remove an item, and its descendants in hierarchy mode
    pub fn remove_item(&mut self, item: ItemId) -> bool {
        match self.items.position(item) {
            Some(index) => self.remove_item_at(index),
            None => false,
        }
    }

    /// Remove the item at `index`, and its descendants in hierarchy mode
    pub fn remove_item_at(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }

        let end = if self.hierarchy_mode {
            hierarchy::descendant_range(&self.items, index).end
        } else {
            index + 1
        };
        let removed = index..end;

        for i in removed.clone() {
            self.items.set_highlighted(i, false);
        }
        for _ in removed.clone() {
            self.items.remove_at(index);
        }
        tracing::debug!("Removed {} list item(s) at {index}", removed.len());

        self.selections.shift_for_removal(removed);
        self.update_selection_effect();
        true
    }

    /// Remove every item and clear the selection
    pub fn remove_all_items(&mut self) {
        for i in 0..self.items.len() {
            self.items.set_highlighted(i, false);
        }
        self.items.clear();
        self.clear_selection();
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Select a single index and scroll it into view
    pub fn set_selection(&mut self, index: usize) {
        self.set_selections([index]);
        self.ensure_item_visibility(index);
    }

    /// Replace the selection.
    ///
    /// Emits a deselect for every index leaving the selection and a select for
    /// every index entering it. In single-select mode only the lowest index is
    /// kept and its select is sent even if it was already selected. Indices past
    /// the item count are ignored.
    pub fn set_selections(&mut self, indices: impl IntoIterator<Item = usize>) {
        let indices: SelectionSet = indices.into_iter().collect();
        let count = self.items.len();

        let deselected: Vec<usize> = self.selections.iter().filter(|i| !indices.contains(*i)).collect();
        for index in deselected {
            self.selections.remove(index);
            self.emit(ListViewEvent::ItemDeselected(index));
        }

        for index in indices.iter() {
            if index < count && (!self.selections.contains(index) || !self.multiselect) {
                self.selections.insert(index);
                self.emit(ListViewEvent::ItemSelected(index));
            }
            if !self.multiselect {
                break;
            }
        }

        self.update_selection_effect();
    }

    /// Add an index to the selection. Replaces the selection when not multiselect.
    pub fn add_selection(&mut self, index: usize) {
        if !self.multiselect {
            self.set_selection(index);
            return;
        }
        if index >= self.items.len() {
            return;
        }

        let mut next = self.selections.clone();
        next.insert(index);
        self.set_selections(next.iter());
        self.ensure_item_visibility(index);
    }

    /// Remove an index from the selection
    pub fn remove_selection(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }

        let mut next = self.selections.clone();
        next.remove(index);
        self.set_selections(next.iter());
        self.ensure_item_visibility(index);
    }

    /// Toggle an index in the selection
    pub fn toggle_selection(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }

        if self.selections.contains(index) {
            self.remove_selection(index);
        } else {
            self.add_selection(index);
        }
    }

    /// Move the selection by `delta` visible items.
    ///
    /// Moving down starts from the last selected index, moving up from the first.
    /// Hidden items are passed over without counting. Stops at the list ends.
    pub fn change_selection(&mut self, delta: i32, additive: bool) {
        let start = if delta > 0 {
            self.selections.last()
        } else {
            self.selections.first()
        };
        let Some(start) = start else {
            return;
        };
        let additive = additive && self.multiselect;

        let count = self.items.len();
        let mut remaining = delta.unsigned_abs();
        let mut current = start;
        let mut landed = start;
        while remaining > 0 {
            let next = if delta > 0 {
                current + 1
            } else {
                match current.checked_sub(1) {
                    Some(next) => next,
                    None => break,
                }
            };
            if next >= count {
                break;
            }

            current = next;
            if self.items.is_visible(current) {
                landed = current;
                remaining -= 1;
            }
        }

        if additive {
            self.add_selection(landed);
        } else {
            self.set_selection(landed);
        }
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.set_selections([]);
    }

    fn page_selection(&mut self, selection: usize, forward: bool, additive: bool) {
        let page = (self.page_step * self.viewport_height as f32) as i32;
        let mut budget = page.saturating_sub(self.items.height(selection));

        let count = self.items.len();
        let mut landed = selection;
        let mut current = if forward {
            selection.checked_add(1)
        } else {
            selection.checked_sub(1)
        };
        while let Some(index) = current.filter(|&i| i < count) {
            if self.items.is_visible(index) {
                let height = self.items.height(index);
                if budget < height {
                    break;
                }
                budget = budget.saturating_sub(height);
                landed = index;
            }
            current = if forward { index.checked_add(1) } else { index.checked_sub(1) };
        }

        if additive {
            self.add_selection(landed);
        } else {
            self.set_selection(landed);
        }
    }

    fn update_selection_effect(&mut self) {
        for i in 0..self.items.len() {
            let highlighted = self.selections.contains(i)
                && match self.highlight_mode {
                    HighlightMode::Never => false,
                    HighlightMode::Focus => self.focus,
                    HighlightMode::Always => true,
                };
            self.items.set_highlighted(i, highlighted);
        }
    }

    /// Scroll so the item at `index` is fully inside the viewport. Hidden items are ignored.
    pub fn ensure_item_visibility(&mut self, index: usize) {
        if !self.items.is_visible(index) {
            return;
        }

        let offset = self.items.offset(index).saturating_sub(self.view_position);
        let height = self.items.height(index);
        let mut view = self.view_position;
        if offset < 0 {
            view = view.saturating_add(offset);
        }
        let bottom = offset.saturating_add(height);
        if bottom > self.viewport_height {
            view = view.saturating_add(bottom - self.viewport_height);
        }
        self.view_position = view;
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Handle a key press. Keys not used for navigation are reported as
    /// [`ListViewEvent::UnhandledKey`].
    pub fn on_key(&mut self, key: Key, buttons: MouseButtons, qualifiers: Qualifiers) {
        let count = self.items.len();
        if let Some(selection) = self.selection().filter(|_| count > 0) {
            let additive = self.multiselect && qualifiers.any();
            let all = i32::try_from(count).unwrap_or(i32::MAX);

            let handled = match key {
                Key::Left if self.hierarchy_mode => {
                    self.set_child_items_visible(selection, false);
                    true
                }
                Key::Right if self.hierarchy_mode => {
                    self.set_child_items_visible(selection, true);
                    true
                }
                Key::Enter if self.hierarchy_mode => {
                    self.toggle_child_items_visible(selection);
                    true
                }
                Key::Up => {
                    self.change_selection(-1, additive);
                    true
                }
                Key::Down => {
                    self.change_selection(1, additive);
                    true
                }
                Key::PageUp => {
                    self.page_selection(selection, false, additive);
                    true
                }
                Key::PageDown => {
                    self.page_selection(selection, true, additive);
                    true
                }
                Key::Home => {
                    self.change_selection(-all, additive);
                    true
                }
                Key::End => {
                    self.change_selection(all, additive);
                    true
                }
                _ => false,
            };
            if handled {
                return;
            }
        }

        self.emit(ListViewEvent::UnhandledKey { key, buttons, qualifiers });
    }

    /// Handle a mouse click on an item
    pub fn on_click(&mut self, item: ItemId, button: MouseButton, qualifiers: Qualifiers) {
        if button != MouseButton::Left {
            return;
        }
        let Some(index) = self.items.position(item) else {
            return;
        };

        let mut is_double_click = false;
        if !self.multiselect || !qualifiers.any() {
            if self.double_click_timer > 0.0 && self.last_clicked == Some(index) {
                is_double_click = true;
                self.double_click_timer = 0.0;
            } else {
                self.double_click_timer = self.double_click_interval;
                self.last_clicked = Some(index);
            }
            self.set_selection(index);
        }

        if self.multiselect {
            if qualifiers.shift {
                self.extend_selection_to(index);
            } else if qualifiers.ctrl {
                self.toggle_selection(index);
            }
        }

        if is_double_click {
            if self.hierarchy_mode {
                self.toggle_child_items_visible(index);
            }
            self.emit(ListViewEvent::ItemDoubleClicked(index));
        }
    }

    /// Grow the contiguous span of the selection to reach `index`
    fn extend_selection_to(&mut self, index: usize) {
        let (Some(first), Some(last)) = (self.selections.first(), self.selections.last()) else {
            self.set_selection(index);
            return;
        };

        let mut next = self.selections.clone();
        if index == first || index == last {
            next.insert_span(first, last);
        } else if index < first {
            next.insert_span(index, first);
        } else if index < last {
            if index - first <= last - index {
                next.insert_span(first, index);
            } else {
                next.insert_span(index, last);
            }
        } else {
            next.insert_span(last, index);
        }
        self.set_selections(next.iter());
    }

    /// Gain or lose keyboard focus
    pub fn set_focus(&mut self, focused: bool) {
        self.focus = focused;
        if !focused && self.clear_selection_on_defocus {
            self.clear_selection();
        }
        self.update_selection_effect();
    }

    // ------------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------------

    /// Show or hide the descendants of an item
    pub fn set_child_items_visible(&mut self, index: usize, visible: bool) {
        if !self.hierarchy_mode || index >= self.items.len() {
            return;
        }
        hierarchy::set_descendants_visible(&mut self.items, index, visible);
    }

    /// Show or hide the descendants of every top-level item
    pub fn set_all_child_items_visible(&mut self, visible: bool) {
        if !self.hierarchy_mode {
            return;
        }
        for i in 0..self.items.len() {
            if self.items.indent(i) == 0 {
                self.set_child_items_visible(i, visible);
            }
        }

        if self.selections.len() == 1 {
            if let Some(selection) = self.selection() {
                self.ensure_item_visibility(selection);
            }
        }
    }

    /// Flip the visibility of an item's descendants
    pub fn toggle_child_items_visible(&mut self, index: usize) {
        if !self.hierarchy_mode || index >= self.items.len() {
            return;
        }
        hierarchy::toggle_descendants_visible(&mut self.items, index);
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Apply a style: list its items, then its flags, then its selections
    pub fn apply_config(&mut self, config: &ListViewConfig) {
        for entry in &config.items {
            let Some(item) = self.items.find_by_name(&entry.name) else {
                tracing::warn!("List item {} not found", entry.name);
                continue;
            };
            self.add_item(item);
            if let Some(indent) = entry.indent {
                if let Some(index) = self.items.position(item) {
                    self.items.set_indent(index, indent);
                }
            }
        }

        if let Some(highlight) = &config.highlight {
            self.set_highlight_mode(HighlightMode::from_name(highlight));
        }
        if let Some(enable) = config.multiselect {
            self.set_multiselect(enable);
        }
        if let Some(enable) = config.hierarchy {
            self.set_hierarchy_mode(enable);
        }
        if let Some(enable) = config.clear_selection_on_defocus {
            self.set_clear_selection_on_defocus(enable);
        }
        if let Some(interval) = config.double_click_interval {
            self.set_double_click_interval(interval);
        }

        for &index in &config.selections {
            self.add_selection(index);
        }
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    /// Set the highlight mode
    pub fn set_highlight_mode(&mut self, mode: HighlightMode) {
        self.highlight_mode = mode;
        self.update_selection_effect();
    }

    /// Highlight mode
    pub fn highlight_mode(&self) -> HighlightMode {
        self.highlight_mode
    }

    /// Allow multiple selected items
    pub fn set_multiselect(&mut self, enable: bool) {
        self.multiselect = enable;
    }

    /// Whether multiple items can be selected
    pub fn is_multiselect(&self) -> bool {
        self.multiselect
    }

    /// Interpret indents as a collapsible hierarchy
    pub fn set_hierarchy_mode(&mut self, enable: bool) {
        self.hierarchy_mode = enable;
    }

    /// Whether hierarchy mode is on
    pub fn is_hierarchy_mode(&self) -> bool {
        self.hierarchy_mode
    }

    /// Clear the selection when focus is lost
    pub fn set_clear_selection_on_defocus(&mut self, enable: bool) {
        self.clear_selection_on_defocus = enable;
    }

    /// Whether the selection is cleared on focus loss
    pub fn clear_selection_on_defocus(&self) -> bool {
        self.clear_selection_on_defocus
    }

    /// Set the double-click interval in seconds
    pub fn set_double_click_interval(&mut self, interval: f32) {
        self.double_click_interval = interval;
    }

    /// Double-click interval in seconds
    pub fn double_click_interval(&self) -> f32 {
        self.double_click_interval
    }

    /// Set the page step as a fraction of the viewport height
    pub fn set_page_step(&mut self, step: f32) {
        self.page_step = step;
    }

    /// Page step
    pub fn page_step(&self) -> f32 {
        self.page_step
    }

    /// Set the viewport height in pixels
    pub fn set_viewport_height(&mut self, height: i32) {
        self.viewport_height = height.max(0);
    }

    /// Viewport height in pixels
    pub fn viewport_height(&self) -> i32 {
        self.viewport_height
    }

    /// Set the vertical scroll position
    pub fn set_view_position(&mut self, position: i32) {
        self.view_position = position;
    }

    /// Vertical scroll position
    pub fn view_position(&self) -> i32 {
        self.view_position
    }

    /// Whether the view has focus
    pub fn has_focus(&self) -> bool {
        self.focus
    }

    /// Number of listed items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item at a position
    pub fn item(&self, index: usize) -> Option<ItemId> {
        self.items.item_at(index)
    }

    /// All listed items in order
    pub fn items(&self) -> Vec<ItemId> {
        (0..self.items.len()).filter_map(|i| self.items.item_at(i)).collect()
    }

    /// First selected index
    pub fn selection(&self) -> Option<usize> {
        self.selections.first()
    }

    /// All selected indices
    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// First selected item
    pub fn selected_item(&self) -> Option<ItemId> {
        self.items.item_at(self.selection()?)
    }

    /// All selected items in index order
    pub fn selected_items(&self) -> Vec<ItemId> {
        self.selections.iter().filter_map(|i| self.items.item_at(i)).collect()
    }

    /// Hierarchy depth of an item
    pub fn item_indent(&self, index: usize) -> i32 {
        self.items.indent(index)
    }

    /// Set the hierarchy depth of an item
    pub fn set_item_indent(&mut self, index: usize, indent: i32) {
        self.items.set_indent(index, indent);
    }
}
