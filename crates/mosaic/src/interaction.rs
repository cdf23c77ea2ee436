//! Activation of grid cells by pointer or keyboard.
//!
//! Both paths go through [`resolve_activation`] so a cell that responds to
//! a click responds identically to Enter / Space.

use serde::Serialize;

use crate::cell::{CellKind, RenderCell};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trigger<'a> {
    Pointer,
    /// DOM `KeyboardEvent.key` value.
    Key(&'a str),
}

impl Trigger<'_> {
    #[must_use]
    pub fn activates(self) -> bool {
        match self {
            Self::Pointer => true,
            Self::Key(key) => key == "Enter" || key == " ",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum Activation {
    /// Open the detail view for this content id.
    Navigate(String),
    /// Run the host's decoration callback.
    Decoration,
    None,
}

/// Clickable iff the cell holds bound content or hosts a decoration.
#[must_use]
pub fn is_clickable(base: CellKind, has_content: bool, has_decoration: bool) -> bool {
    (base == CellKind::Project && has_content) || has_decoration
}

#[must_use]
pub fn resolve_activation(cell: &RenderCell, trigger: Trigger<'_>) -> Activation {
    if !cell.clickable || !trigger.activates() {
        return Activation::None;
    }
    match (&cell.content, &cell.decoration) {
        (Some(stamp), _) if cell.base_kind == CellKind::Project => {
            Activation::Navigate(stamp.id.clone())
        }
        (_, Some(_)) => Activation::Decoration,
        _ => Activation::None,
    }
}
