// SPDX-License-Identifier: MIT OR Apache-2.0
//! Indent-encoded hierarchy over a flat item list.
//!
//! An item's descendants are the contiguous run of items following it whose
//! indent is greater than its own.

use crate::item::ItemContainer;
use std::ops::Range;

/// Positions of the descendants of the item at `index`. Empty when out of range.
pub fn descendant_range<C: ItemContainer + ?Sized>(items: &C, index: usize) -> Range<usize> {
    let count = items.len();
    if index >= count {
        return count..count;
    }

    let base_indent = items.indent(index);
    let end = (index + 1..count)
        .find(|&i| items.indent(i) <= base_indent)
        .unwrap_or(count);
    index + 1..end
}

/// Show or hide every descendant of the item at `index`
pub fn set_descendants_visible<C: ItemContainer + ?Sized>(items: &mut C, index: usize, visible: bool) {
    for i in descendant_range(items, index) {
        items.set_visible(i, visible);
    }
}

/// Flip the first descendant's visibility and make the rest follow it
pub fn toggle_descendants_visible<C: ItemContainer + ?Sized>(items: &mut C, index: usize) {
    let mut previous = None;
    for i in descendant_range(items, index) {
        let visible = match previous {
            None => !items.is_visible(i),
            Some(previous) => items.is_visible(previous),
        };
        items.set_visible(i, visible);
        previous = Some(i);
    }
}
