// SPDX-License-Identifier: MIT OR Apache-2.0
//! Notifications emitted by the list view.

use crate::input::{Key, MouseButtons, Qualifiers};

/// List view notification, delivered synchronously to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListViewEvent {
    /// An index entered the selection (resent for the same index in single-select mode)
    ItemSelected(usize),
    /// An index left the selection
    ItemDeselected(usize),
    /// An item was double-clicked
    ItemDoubleClicked(usize),
    /// A key press the list view did not consume
    UnhandledKey {
        /// Key pressed
        key: Key,
        /// Mouse buttons held
        buttons: MouseButtons,
        /// Qualifiers held
        qualifiers: Qualifiers,
    },
}

impl ListViewEvent {
    /// Item index the event refers to, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::ItemSelected(index) | Self::ItemDeselected(index) | Self::ItemDoubleClicked(index) => {
                Some(*index)
            }
            Self::UnhandledKey { .. } => None,
        }
    }
}

/// Boxed event listener
pub type EventListener = Box<dyn FnMut(&ListViewEvent)>;
