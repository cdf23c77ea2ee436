//! Seeded decoration placement on grey (solid / outline) cells.
//!
//! Project cells never host a decoration, whether or not they hold
//! content, so a decoration can never cover a navigable tile.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::cell::CellKey;
use crate::error::{MosaicError, Result};
use crate::mask::GridMask;
use crate::rng::Mulberry32;

#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DecorationMode {
    /// Visit every eligible cell in scan order.
    ///
    /// One draw per cell picks the image. When `density < 1` a second draw
    /// per cell keeps the cell only if it falls below `density`.
    Dense {
        #[serde(default = "full_density")]
        density: f64,
    },
    /// Exactly one decoration: one draw picks the cell, a second the image.
    Sparse,
}

fn full_density() -> f64 {
    1.0
}

impl Default for DecorationMode {
    fn default() -> Self {
        Self::Dense { density: 1.0 }
    }
}

impl DecorationMode {
    /// # Errors
    ///
    /// [`MosaicError::InvalidDensity`] unless `density` lies in `0..=1`.
    /// NaN is rejected.
    pub fn dense(density: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&density) {
            Ok(Self::Dense { density })
        } else {
            Err(MosaicError::InvalidDensity(density))
        }
    }

    /// Re-check a mode that was built or deserialized without [`Self::dense`].
    ///
    /// # Errors
    ///
    /// [`MosaicError::InvalidDensity`] for an out-of-range dense density.
    pub fn validate(self) -> Result<Self> {
        match self {
            Self::Dense { density } => Self::dense(density),
            Self::Sparse => Ok(self),
        }
    }
}

/// Cells that may host a decoration, in row-major order.
#[must_use]
pub fn eligible_cells(mask: &GridMask) -> Vec<CellKey> {
    mask.cells()
        .filter(|(_, kind)| kind.is_decoratable())
        .map(|(key, _)| key)
        .collect()
}

fn pick_image(rng: &mut Mulberry32, images: &[String; 2]) -> String {
    let idx = usize::from(rng.next_f64() >= 0.5);
    images[idx].clone()
}

/// Choose which cells show a decoration and which of the two images each uses.
///
/// # Errors
///
/// [`MosaicError::InvalidDensity`] if `mode` is dense with a density
/// outside `0..=1`.
pub fn place_decorations(
    mask: &GridMask,
    seed: u32,
    mode: DecorationMode,
    images: &[String; 2],
) -> Result<BTreeMap<CellKey, String>> {
    let mode = mode.validate()?;
    let mut rng = Mulberry32::new(seed);
    let eligible = eligible_cells(mask);
    let mut placed = BTreeMap::new();

    match mode {
        DecorationMode::Dense { density } => {
            for key in eligible {
                let image = pick_image(&mut rng, images);
                if density < 1.0 && rng.next_f64() >= density {
                    continue;
                }
                placed.insert(key, image);
            }
        }
        DecorationMode::Sparse => {
            if let Some(idx) = rng.next_index(eligible.len()) {
                placed.insert(eligible[idx], pick_image(&mut rng, images));
            }
        }
    }

    debug!(
        target: "mosaic::decor",
        seed,
        ?mode,
        placed = placed.len(),
        "placed decorations"
    );
    Ok(placed)
}
