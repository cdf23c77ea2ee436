//! Content binding onto project slots, plus the caller-side tag filter.
//!
//! The content list is positional: entry `i` belongs to slot `i`. A hole
//! (`None`) keeps its slot in place and the cell degrades to an outline, so
//! filtering never reflows the grid.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cell::{CellKey, CellKind};
use crate::mask::GridMask;

/// Minimal content reference bound to a project slot.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Stamp {
    pub id: String,
    pub name: String,
}

impl Stamp {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One entry of the content list: a stamp, or a hole.
pub type ContentSlot = Option<Stamp>;

/// Content bound to the slot under `key`, if the cell is a project slot and
/// the list has a stamp at its index. Indices past the end are holes.
#[must_use]
pub fn bound_content<'a>(
    mask: &GridMask,
    content: &'a [ContentSlot],
    key: CellKey,
) -> Option<&'a Stamp> {
    mask.slot_index(key.row, key.col)
        .and_then(|slot| content.get(slot))
        .and_then(Option::as_ref)
}

/// Effective rendering kind: an unbound project slot renders as an outline.
#[must_use]
pub fn effective_kind(base: CellKind, bound: bool) -> CellKind {
    if base == CellKind::Project && !bound {
        CellKind::Outline
    } else {
        base
    }
}

/// Bound slots in slot order. Used by the list layout.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ListItem {
    pub slot: usize,
    pub stamp: Stamp,
}

#[must_use]
pub fn list_items(mask: &GridMask, content: &[ContentSlot]) -> Vec<ListItem> {
    (0..mask.slot_count())
        .filter_map(|slot| {
            content
                .get(slot)
                .and_then(Option::as_ref)
                .map(|stamp| ListItem {
                    slot,
                    stamp: stamp.clone(),
                })
        })
        .collect()
}

/// Single-select tag filter.
///
/// A stamp passes when its tags contain every selected tag; with no
/// selection everything passes.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TagFilter {
    selected: BTreeSet<String>,
}

impl TagFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting the active tag clears the filter; any other tag replaces it.
    pub fn toggle(&mut self, tag: &str) {
        let was_selected = self.selected.contains(tag);
        self.selected.clear();
        if !was_selected {
            self.selected.insert(tag.to_owned());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    #[must_use]
    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.selected
            .iter()
            .all(|want| tags.iter().any(|t| t.as_ref() == want))
    }

    /// Replace non-matching stamps with holes. Length and order are preserved.
    #[must_use]
    pub fn apply<'t, F, S>(&self, stamps: &[ContentSlot], tags_of: F) -> Vec<ContentSlot>
    where
        F: Fn(&str) -> &'t [S],
        S: AsRef<str> + 't,
    {
        if !self.is_active() {
            return stamps.to_vec();
        }
        stamps
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .filter(|stamp| self.matches(tags_of(stamp.id.as_str())))
                    .cloned()
            })
            .collect()
    }
}
