//! Shared-background projection for solid cells.
//!
//! Every solid cell draws the same large image at the same size, shifted by
//! its own offset inside the container. Viewed together the cells look
//! like windows onto one continuous picture.
//!
//! # Recompute model
//!
//! Resize, scroll, content and image-load notifications arrive in no
//! particular order. [`TextureProjector`] keeps only the latest observed
//! state and derives the projection from it on demand, so redundant or
//! reordered notifications are harmless.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::cell::{CellKey, CellKind, TextureWindow};
use crate::error::{MosaicError, Result};
use crate::mask::GridMask;

/// Aspect ratio assumed while the image's natural size is still unknown.
pub const DEFAULT_TEXTURE_ASPECT: f64 = 16.0 / 9.0;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    #[must_use]
    pub fn is_measurable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Deserialize)]
#[serde(tag = "fit", rename_all = "lowercase")]
pub enum TextureFit {
    /// Scale to cover the whole container, cropping the overflow.
    #[default]
    Cover,
    /// Natural size times `factor`, centered.
    Scaled { factor: f64 },
}

impl TextureFit {
    /// # Errors
    ///
    /// [`MosaicError::InvalidTextureScale`] for a scaled fit whose factor is
    /// zero, negative or not finite.
    pub fn validate(self) -> Result<Self> {
        match self {
            Self::Scaled { factor } if !(factor.is_finite() && factor > 0.0) => {
                Err(MosaicError::InvalidTextureScale(factor))
            }
            _ => Ok(self),
        }
    }
}

/// Image size and top-left position relative to the container.
fn placement(container: Size, natural: Option<Size>, fit: TextureFit) -> (Size, Offset) {
    let natural = natural.filter(|n| n.is_measurable());
    let scaled = match fit {
        TextureFit::Cover => {
            let img_aspect = natural.map_or(DEFAULT_TEXTURE_ASPECT, |n| n.width / n.height);
            let grid_aspect = container.width / container.height;
            if img_aspect > grid_aspect {
                Size::new(container.height * img_aspect, container.height)
            } else {
                Size::new(container.width, container.width / img_aspect)
            }
        }
        TextureFit::Scaled { factor } => {
            let base = natural.unwrap_or(container);
            Size::new(base.width * factor, base.height * factor)
        }
    };
    let origin = Offset::new(
        (container.width - scaled.width) / 2.0,
        (container.height - scaled.height) / 2.0,
    );
    (scaled, origin)
}

/// Texture windows for the solid cells that have a measured offset.
///
/// Returns an empty map when the container has not been laid out yet, or
/// when `fit` fails [`TextureFit::validate`].
#[must_use]
pub fn project_texture(
    mask: &GridMask,
    container: Size,
    offsets: &BTreeMap<CellKey, Offset>,
    natural: Option<Size>,
    fit: TextureFit,
) -> BTreeMap<CellKey, TextureWindow> {
    if !container.is_measurable() {
        trace!(target: "mosaic::texture", "container not laid out, skipping projection");
        return BTreeMap::new();
    }
    if let Err(err) = fit.validate() {
        debug!(target: "mosaic::texture", %err, "invalid texture fit, skipping projection");
        return BTreeMap::new();
    }
    let (scaled, origin) = placement(container, natural, fit);

    offsets
        .iter()
        .filter(|(key, _)| mask.kind_at(**key) == CellKind::Solid)
        .map(|(key, offset)| {
            (
                *key,
                TextureWindow {
                    size_x: scaled.width,
                    size_y: scaled.height,
                    offset_x: origin.x - offset.x,
                    offset_y: origin.y - offset.y,
                },
            )
        })
        .collect()
}

/// Latest observed geometry for one grid, projected on demand.
#[derive(Clone, Debug, Default)]
pub struct TextureProjector {
    fit: TextureFit,
    container: Size,
    offsets: BTreeMap<CellKey, Offset>,
    natural: Option<Size>,
    detached: bool,
}

impl TextureProjector {
    #[must_use]
    pub fn new(fit: TextureFit) -> Self {
        Self {
            fit,
            ..Self::default()
        }
    }

    pub fn observe_container(&mut self, size: Size) {
        if !self.detached {
            self.container = size;
        }
    }

    /// Replace all measured offsets (one full layout pass).
    pub fn observe_offsets(&mut self, offsets: BTreeMap<CellKey, Offset>) {
        if !self.detached {
            self.offsets = offsets;
        }
    }

    pub fn observe_offset(&mut self, key: CellKey, offset: Offset) {
        if !self.detached {
            self.offsets.insert(key, offset);
        }
    }

    /// Image finished loading. Non-measurable sizes are ignored.
    pub fn observe_natural(&mut self, size: Size) {
        if !self.detached && size.is_measurable() {
            debug!(
                target: "mosaic::texture",
                width = size.width,
                height = size.height,
                "texture natural size resolved"
            );
            self.natural = Some(size);
        }
    }

    /// Background image changed: the old natural size no longer applies.
    pub fn reset_natural(&mut self) {
        self.natural = None;
    }

    #[must_use]
    pub fn natural(&self) -> Option<Size> {
        self.natural
    }

    #[must_use]
    pub fn project(&self, mask: &GridMask) -> BTreeMap<CellKey, TextureWindow> {
        if self.detached {
            return BTreeMap::new();
        }
        project_texture(mask, self.container, &self.offsets, self.natural, self.fit)
    }

    /// Teardown: drop observed state and ignore later notifications.
    pub fn detach(&mut self) {
        self.detached = true;
        self.offsets.clear();
        self.natural = None;
        self.container = Size::default();
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }
}
