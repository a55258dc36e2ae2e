// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered set of selected item indices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// Selected list indices in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an index is selected
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Add an index (idempotent)
    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    /// Remove an index
    pub fn remove(&mut self, index: usize) -> bool {
        self.indices.remove(&index)
    }

    /// Toggle an index
    pub fn toggle(&mut self, index: usize) {
        if !self.remove(index) {
            self.insert(index);
        }
    }

    /// Add every index of an inclusive span
    pub fn insert_span(&mut self, first: usize, last: usize) {
        self.indices.extend(first..=last);
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the number of selected indices
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Lowest selected index
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// Highest selected index
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Make room for an item inserted at `index`
    pub fn shift_for_insert(&mut self, index: usize) {
        self.indices = self
            .indices
            .iter()
            .map(|&i| if i >= index { i + 1 } else { i })
            .collect();
    }

    /// Drop the indices of a removed range and close the gap
    pub fn shift_for_removal(&mut self, removed: Range<usize>) {
        let count = removed.len();
        self.indices = self
            .indices
            .iter()
            .copied()
            .filter(|i| !removed.contains(i))
            .map(|i| if i >= removed.end { i - count } else { i })
            .collect();
    }
}

impl FromIterator<usize> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[usize; N]> for SelectionSet {
    fn from(indices: [usize; N]) -> Self {
        indices.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_bounds() {
        let mut selection = SelectionSet::from([4, 2]);
        assert_eq!(selection.first(), Some(2));
        assert_eq!(selection.last(), Some(4));

        selection.toggle(2);
        selection.toggle(7);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![4, 7]);
    }

    #[test]
    fn test_shift_for_insert() {
        let mut selection = SelectionSet::from([0, 1, 3]);
        selection.shift_for_insert(1);
        assert_eq!(selection, SelectionSet::from([0, 2, 4]));
    }

    #[test]
    fn test_shift_for_removal() {
        let mut selection = SelectionSet::from([0, 2, 3, 6, 9]);
        selection.shift_for_removal(2..5);
        assert_eq!(selection, SelectionSet::from([0, 3, 6]));
    }

    #[test]
    fn test_insert_span() {
        let mut selection = SelectionSet::from([1]);
        selection.insert_span(3, 5);
        assert_eq!(selection.len(), 4);
        assert!(selection.contains(4));
    }
}
