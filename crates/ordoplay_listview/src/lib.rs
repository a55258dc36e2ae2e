// SPDX-License-Identifier: MIT OR Apache-2.0
//! List view selection core for OrdoPlay.
//!
//! This crate provides the non-visual half of a list widget:
//! - Single and multiple selection with change notifications
//! - Keyboard navigation (arrows, page up/down, home/end)
//! - Shift/Ctrl click selection and double-click detection
//! - Indent-encoded hierarchies with collapse/expand
//! - RON style configuration
//!
//! ## Architecture
//!
//! A [`ListView`] addresses items by position in an [`ItemContainer`], which
//! owns the item data (visibility, height, highlight, indent). Selection is an
//! ordered [`SelectionSet`] of positions, shifted as items are inserted and
//! removed. Changes are reported as [`ListViewEvent`]s to subscribed closures.

pub mod config;
pub mod event;
pub mod hierarchy;
pub mod input;
pub mod item;
pub mod selection;
pub mod view;

pub use config::{ConfigError, ConfigItem, ListViewConfig, CONFIG_FORMAT_VERSION};
pub use event::{EventListener, ListViewEvent};
pub use input::{Key, MouseButton, MouseButtons, Qualifiers};
pub use item::{ItemContainer, ItemData, ItemId, ItemTree, DEFAULT_ITEM_HEIGHT};
pub use selection::SelectionSet;
pub use view::{HighlightMode, ListView, DEFAULT_DOUBLE_CLICK_INTERVAL};
