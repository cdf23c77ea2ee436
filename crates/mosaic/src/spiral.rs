//! Staggered reveal delays ordered as an outward spiral from the grid center.
//!
//! Each cell's key is its distance from the center plus its angle mapped
//! onto `[0, 1)`. The fractional angle term orders cells within a distance
//! band, so the reveal sweeps around rather than popping in rings.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;

use tracing::trace;

/// Delay between consecutive cells in the reveal.
pub const DEFAULT_STAGGER_MS: u32 = 25;

/// Spiral key for `(row, col)` in a `rows × cols` grid.
#[must_use]
pub fn spiral_key(row: usize, col: usize, rows: usize, cols: usize) -> f64 {
    let cx = (cols / 2) as f64;
    let cy = (rows / 2) as f64;
    let dx = col as f64 - cx;
    let dy = row as f64 - cy;
    let distance = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    distance + (angle + PI) / (2.0 * PI)
}

/// Delay in milliseconds for every cell, indexed `[row][col]`.
///
/// Cells are ranked by ascending spiral key. The sort is stable, so equal
/// keys keep row-major order.
#[must_use]
pub fn compute_spiral_delays(rows: usize, cols: usize, step_ms: u32) -> Vec<Vec<u32>> {
    let mut order: Vec<(usize, usize, f64)> = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c, spiral_key(r, c, rows, cols))))
        .collect();
    order.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut delays = vec![vec![0u32; cols]; rows];
    for (rank, &(r, c, _)) in order.iter().enumerate() {
        delays[r][c] = (rank as u32).saturating_mul(step_ms);
    }
    delays
}

/// Memoized delays per grid shape.
#[derive(Debug, Default)]
pub struct SpiralCache {
    entries: HashMap<(usize, usize, u32), Rc<Vec<Vec<u32>>>>,
}

impl SpiralCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, rows: usize, cols: usize, step_ms: u32) -> Rc<Vec<Vec<u32>>> {
        Rc::clone(self.entries.entry((rows, cols, step_ms)).or_insert_with(|| {
            trace!(target: "mosaic::spiral", rows, cols, step_ms, "computing spiral delays");
            Rc::new(compute_spiral_delays(rows, cols, step_ms))
        }))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn center_reveals_first() {
        let delays = compute_spiral_delays(5, 12, DEFAULT_STAGGER_MS);
        assert_eq!(delays[2][6], 0);
    }

    #[test]
    fn portfolio_grid_opening_sequence() {
        let delays = compute_spiral_delays(5, 12, 25);
        // Center, then up, right, up-left, down, up-right, left.
        let expected = [(2, 6), (1, 6), (2, 7), (1, 5), (3, 6), (1, 7), (2, 5)];
        for (rank, (r, c)) in expected.into_iter().enumerate() {
            assert_eq!(delays[r][c], rank as u32 * 25, "cell ({r}, {c})");
        }
    }

    #[test]
    fn farthest_corner_reveals_last() {
        let delays = compute_spiral_delays(5, 12, 25);
        assert_eq!(delays[4][0], 59 * 25);
    }

    #[test]
    fn empty_grid_has_no_delays() {
        assert!(compute_spiral_delays(0, 0, 25).is_empty());
    }

    #[test]
    fn cache_reuses_by_shape() {
        let mut cache = SpiralCache::new();
        let a = cache.get(5, 12, 25);
        let b = cache.get(5, 12, 25);
        assert!(Rc::ptr_eq(&a, &b));
        let _ = cache.get(4, 4, 25);
        assert_eq!(cache.len(), 2);
    }

    // Pure in (rows, cols); delays are a permutation of rank * step and
    // follow the spiral key.
    proptest! {
        #[test]
        fn prop_spiral_is_deterministic_and_monotone(rows in 1usize..12, cols in 1usize..16) {
            let a = compute_spiral_delays(rows, cols, 25);
            let b = compute_spiral_delays(rows, cols, 25);
            prop_assert_eq!(&a, &b);

            prop_assert_eq!(a[rows / 2][cols / 2], 0);

            let mut cells: Vec<(f64, u32)> = Vec::new();
            for r in 0..rows {
                for c in 0..cols {
                    cells.push((spiral_key(r, c, rows, cols), a[r][c]));
                }
            }
            let mut seen: Vec<u32> = cells.iter().map(|x| x.1).collect();
            seen.sort_unstable();
            let ranks: Vec<u32> = (0..(rows * cols) as u32).map(|i| i * 25).collect();
            prop_assert_eq!(seen, ranks);

            cells.sort_by(|x, y| x.0.total_cmp(&y.0));
            for pair in cells.windows(2) {
                if pair[0].0 < pair[1].0 {
                    prop_assert!(pair[0].1 < pair[1].1);
                }
            }
        }
    }
}
