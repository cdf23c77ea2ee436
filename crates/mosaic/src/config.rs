//! Grid configuration, deserialized from the host's JSON.
//!
//! Every field has a default, so `{}` yields the portfolio grid with no
//! texture and no decorations.

use serde::Deserialize;

use crate::decor::DecorationMode;
use crate::error::Result;
use crate::mask::GridMask;
use crate::rng::coerce_seed;
use crate::spiral::DEFAULT_STAGGER_MS;
use crate::texture::TextureFit;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Grid,
    /// Plain tappable list with no mask geometry (narrow viewports).
    List,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Mask rows in text form; `None` selects the portfolio mask.
    pub mask: Option<Vec<String>>,
    pub stagger_ms: u32,
    pub layout_mode: LayoutMode,
    pub background_url: Option<String>,
    pub texture_fit: TextureFit,
    pub decoration_images: Option<[String; 2]>,
    /// Any JSON number; coerced to an unsigned 32-bit seed.
    pub decoration_seed: Option<f64>,
    pub decoration_mode: DecorationMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            mask: None,
            stagger_ms: DEFAULT_STAGGER_MS,
            layout_mode: LayoutMode::Grid,
            background_url: None,
            texture_fit: TextureFit::Cover,
            decoration_images: None,
            decoration_seed: None,
            decoration_mode: DecorationMode::default(),
        }
    }
}

/// Images, seed and mode for an active decoration pass.
#[derive(Clone, PartialEq, Debug)]
pub struct Decorations {
    pub images: [String; 2],
    pub seed: u32,
    pub mode: DecorationMode,
}

impl GridConfig {
    /// # Errors
    ///
    /// [`MosaicError::Json`] for malformed JSON, otherwise any error from
    /// [`GridConfig::validate`].
    ///
    /// [`MosaicError::Json`]: crate::error::MosaicError::Json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks that serde cannot express.
    ///
    /// # Errors
    ///
    /// [`MosaicError::InvalidDensity`] or [`MosaicError::InvalidTextureScale`].
    ///
    /// [`MosaicError::InvalidDensity`]: crate::error::MosaicError::InvalidDensity
    /// [`MosaicError::InvalidTextureScale`]: crate::error::MosaicError::InvalidTextureScale
    pub fn validate(&self) -> Result<()> {
        self.decoration_mode.validate()?;
        self.texture_fit.validate()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Any mask error from [`GridMask::from_rows`] for custom rows.
    pub fn build_mask(&self) -> Result<GridMask> {
        match &self.mask {
            Some(rows) => GridMask::from_rows(rows.as_slice()),
            None => Ok(GridMask::portfolio()),
        }
    }

    /// Decorations are on only when both the image pair and a seed are set.
    #[must_use]
    pub fn decorations(&self) -> Option<Decorations> {
        let images = self.decoration_images.clone()?;
        let seed = coerce_seed(self.decoration_seed?);
        Some(Decorations {
            images,
            seed,
            mode: self.decoration_mode,
        })
    }
}
