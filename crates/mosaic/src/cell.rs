//! Cell kinds and per-cell render records for the project grid.

use std::fmt;

use serde::Serialize;

use crate::content::Stamp;

/// Discriminant values are stable: the host stylesheet keys off them.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Empty = 0,
    Outline = 1,
    Solid = 2,
    Project = 3,
}

impl CellKind {
    /// Parse the single-character text form used by mask literals.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Empty),
            'O' => Some(Self::Outline),
            'S' => Some(Self::Solid),
            'P' => Some(Self::Project),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Outline => 'O',
            Self::Solid => 'S',
            Self::Project => 'P',
        }
    }

    /// Solid and outline cells are the "grey" cells that may host a decoration.
    #[must_use]
    pub fn is_decoratable(self) -> bool {
        matches!(self, Self::Solid | Self::Outline)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Outline => write!(f, "outline"),
            Self::Solid => write!(f, "solid"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// Grid position. Ordered row-major so maps keyed by it iterate in scan order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell-{}-{}", self.row, self.col)
    }
}

impl Serialize for CellKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Background size and position for one solid cell, in CSS pixels.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureWindow {
    pub size_x: f64,
    pub size_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Load state of a project cell's thumbnail.
///
/// Owned by the cell record; the host reports transitions through
/// [`MediaStatus::on_load`] / [`MediaStatus::on_error`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    #[default]
    None,
    Loading,
    Loaded,
    Error,
}

impl MediaStatus {
    #[must_use]
    pub fn on_load(self) -> Self {
        match self {
            Self::Loading => Self::Loaded,
            other => other,
        }
    }

    /// An error is terminal: the host swaps in the fallback image once.
    #[must_use]
    pub fn on_error(self) -> Self {
        match self {
            Self::Loading | Self::Loaded => Self::Error,
            other => other,
        }
    }
}

/// One fully resolved grid cell. Recomputed on every layout pass.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCell {
    pub row: usize,
    pub col: usize,
    /// Kind in the mask.
    pub base_kind: CellKind,
    /// Kind after content binding; an unbound project slot renders as an outline.
    pub kind: CellKind,
    pub content: Option<Stamp>,
    pub clickable: bool,
    pub delay_ms: u32,
    pub decoration: Option<String>,
    pub texture: Option<TextureWindow>,
    pub media: MediaStatus,
}

impl RenderCell {
    #[must_use]
    pub fn key(&self) -> CellKey {
        CellKey::new(self.row, self.col)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.kind != CellKind::Empty
    }

    /// Unbound project slot: filtered out or not yet assigned.
    #[must_use]
    pub fn is_empty_slot(&self) -> bool {
        self.base_kind == CellKind::Project && self.content.is_none()
    }
}
