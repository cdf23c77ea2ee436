//! Static grid template and the slot resolver.
//!
//! Slots are the project cells in row-major order: the first `Project`
//! cell scanned top-to-bottom, left-to-right is slot 0. Content lists
//! produced by callers must use the same ordering.

use std::str::FromStr;

use crate::cell::{CellKind, CellKey};
use crate::error::{MosaicError, Result};

/// The portfolio grid: 5 rows × 12 columns, 20 project slots.
pub const PORTFOLIO_MASK: [&str; 5] = [
    "..OOPPPSO..P",
    "O..OSPSPSO..",
    ".OPPSSP.SPO.",
    ".SSPPSPSPSPS",
    ".OPPSPOSPSPO",
];

/// Immutable rows × cols table of cell kinds. Out-of-range reads return Empty.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GridMask {
    rows: usize,
    cols: usize,
    kinds: Vec<CellKind>,
    slots: Vec<CellKey>,
}

impl GridMask {
    /// Build a mask from rows of kinds. Every row must have the same length.
    ///
    /// # Errors
    ///
    /// [`MosaicError::EmptyMask`] for no rows or no columns,
    /// [`MosaicError::RaggedMask`] for a row of the wrong length.
    pub fn new(table: Vec<Vec<CellKind>>) -> Result<Self> {
        let rows = table.len();
        let cols = table.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(MosaicError::EmptyMask);
        }

        let mut kinds = Vec::with_capacity(rows * cols);
        for (row, line) in table.into_iter().enumerate() {
            if line.len() != cols {
                return Err(MosaicError::RaggedMask {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            kinds.extend(line);
        }

        let slots = kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == CellKind::Project)
            .map(|(i, _)| CellKey::new(i / cols, i % cols))
            .collect();

        Ok(Self {
            rows,
            cols,
            kinds,
            slots,
        })
    }

    /// Parse text rows (`.` empty, `O` outline, `S` solid, `P` project).
    ///
    /// # Errors
    ///
    /// [`MosaicError::UnknownCellKind`] for any other symbol, plus the
    /// shape errors of [`GridMask::new`].
    pub fn from_rows<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut table = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let parsed = line
                .as_ref()
                .chars()
                .enumerate()
                .map(|(col, symbol)| {
                    CellKind::from_symbol(symbol)
                        .ok_or(MosaicError::UnknownCellKind { row, col, symbol })
                })
                .collect::<Result<Vec<_>>>()?;
            table.push(parsed);
        }
        Self::new(table)
    }

    #[must_use]
    pub fn portfolio() -> Self {
        // The literal is fixed and well-formed.
        match Self::from_rows(&PORTFOLIO_MASK) {
            Ok(mask) => mask,
            Err(err) => unreachable!("portfolio mask literal is invalid: {err}"),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    #[must_use]
    pub fn get(&self, row: i32, col: i32) -> CellKind {
        if self.in_bounds(row, col) {
            self.kinds[row as usize * self.cols + col as usize]
        } else {
            CellKind::Empty
        }
    }

    #[must_use]
    pub fn kind_at(&self, key: CellKey) -> CellKind {
        if key.row < self.rows && key.col < self.cols {
            self.kinds[key.row * self.cols + key.col]
        } else {
            CellKind::Empty
        }
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Rank of a project cell among all project cells; `None` for any other cell.
    #[must_use]
    pub fn slot_index(&self, row: usize, col: usize) -> Option<usize> {
        let key = CellKey::new(row, col);
        // `slots` is sorted row-major, matching `CellKey`'s ordering.
        self.slots.binary_search(&key).ok()
    }

    #[must_use]
    pub fn cell_for_slot(&self, index: usize) -> Option<(usize, usize)> {
        self.slots.get(index).map(|key| (key.row, key.col))
    }

    pub fn slots(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.slots.iter().copied()
    }

    /// Every cell in row-major order with its kind.
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, CellKind)> + '_ {
        let cols = self.cols;
        self.kinds
            .iter()
            .enumerate()
            .map(move |(i, &kind)| (CellKey::new(i / cols, i % cols), kind))
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.kinds
            .chunks(self.cols)
            .map(|row| row.iter().map(|kind| kind.symbol()).collect())
            .collect()
    }
}

impl Default for GridMask {
    fn default() -> Self {
        Self::portfolio()
    }
}

impl FromStr for GridMask {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&lines)
    }
}
