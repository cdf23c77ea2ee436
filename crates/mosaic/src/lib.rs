//! Project grid layout and reveal engine.
//!
//! A fixed [`GridMask`] decides which cells can hold content, host a
//! decoration or show the shared background texture. [`Mosaic`] layers the
//! caller's content list, spiral reveal delays, seeded decorations and
//! texture windows on top of it and hands back one [`RenderCell`] per
//! position.

pub mod catalog;
pub mod cell;
pub mod config;
pub mod content;
pub mod decor;
pub mod error;
pub mod interaction;
pub mod mask;
pub mod rng;
pub mod spiral;
pub mod texture;
pub mod wasm;
pub mod weather;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

pub use cell::{CellKey, CellKind, MediaStatus, RenderCell, TextureWindow};
pub use config::{GridConfig, LayoutMode};
pub use content::{ContentSlot, ListItem, Stamp};
pub use error::{MosaicError, Result};
pub use interaction::{Activation, Trigger};
pub use mask::GridMask;

use decor::{place_decorations, DecorationMode};
use texture::{Offset, Size, TextureFit, TextureProjector};

/// Output of one render pass in the configured layout mode.
#[derive(Clone, PartialEq, Debug, serde::Serialize)]
#[serde(tag = "mode", content = "items", rename_all = "lowercase")]
pub enum Rendered {
    Grid(Vec<Vec<RenderCell>>),
    List(Vec<ListItem>),
}

/// Grid engine for one mounted grid.
#[derive(Debug)]
pub struct Mosaic {
    mask: GridMask,
    layout_mode: LayoutMode,
    delays: Vec<Vec<u32>>,
    background_url: Option<String>,
    decorations: BTreeMap<CellKey, String>,
    projector: TextureProjector,
    media: HashMap<String, MediaStatus>,
    detached: bool,
}

impl Mosaic {
    /// Plain grid over `mask`: default stagger, no texture, no decorations.
    #[must_use]
    pub fn new(mask: GridMask) -> Self {
        let delays = spiral::compute_spiral_delays(
            mask.rows(),
            mask.cols(),
            spiral::DEFAULT_STAGGER_MS,
        );
        Self {
            mask,
            layout_mode: LayoutMode::Grid,
            delays,
            background_url: None,
            decorations: BTreeMap::new(),
            projector: TextureProjector::new(TextureFit::Cover),
            media: HashMap::new(),
            detached: false,
        }
    }

    /// # Errors
    ///
    /// Whatever [`GridConfig::validate`] or [`GridConfig::build_mask`]
    /// rejects. Configs built in code are checked the same way as parsed ones.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        let mask = config.build_mask()?;
        let delays = spiral::compute_spiral_delays(mask.rows(), mask.cols(), config.stagger_ms);
        let decorations = config
            .decorations()
            .map(|d| place_decorations(&mask, d.seed, d.mode, &d.images))
            .transpose()?
            .unwrap_or_default();

        debug!(
            target: "mosaic::engine",
            rows = mask.rows(),
            cols = mask.cols(),
            slots = mask.slot_count(),
            layout_mode = ?config.layout_mode,
            decorations = decorations.len(),
            "grid configured"
        );

        Ok(Self {
            mask,
            layout_mode: config.layout_mode,
            delays,
            background_url: config.background_url.clone(),
            decorations,
            projector: TextureProjector::new(config.texture_fit),
            media: HashMap::new(),
            detached: false,
        })
    }

    #[must_use]
    pub fn mask(&self) -> &GridMask {
        &self.mask
    }

    #[must_use]
    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout_mode = mode;
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.mask.slot_count()
    }

    #[must_use]
    pub fn delays(&self) -> &[Vec<u32>] {
        &self.delays
    }

    #[must_use]
    pub fn decorations(&self) -> &BTreeMap<CellKey, String> {
        &self.decorations
    }

    /// Place decorations for `seed`, replacing any previous placement.
    /// Ignored after [`Mosaic::detach`].
    ///
    /// # Errors
    ///
    /// [`MosaicError::InvalidDensity`] for an out-of-range dense mode; the
    /// previous placement is kept.
    pub fn decorate(
        &mut self,
        seed: u32,
        mode: DecorationMode,
        images: &[String; 2],
    ) -> Result<()> {
        if self.detached {
            return Ok(());
        }
        self.decorations = place_decorations(&self.mask, seed, mode, images)?;
        Ok(())
    }

    pub fn clear_decorations(&mut self) {
        if !self.detached {
            self.decorations.clear();
        }
    }

    /// Switch the shared background. The previous image's size is dropped
    /// until the new one reports its natural size.
    pub fn set_background(&mut self, url: Option<String>) {
        if self.detached {
            return;
        }
        if self.background_url != url {
            self.projector.reset_natural();
        }
        self.background_url = url;
    }

    #[must_use]
    pub fn background(&self) -> Option<&str> {
        self.background_url.as_deref()
    }

    pub fn observe_container(&mut self, width: f64, height: f64) {
        self.projector.observe_container(Size::new(width, height));
    }

    pub fn observe_offsets(&mut self, offsets: BTreeMap<CellKey, Offset>) {
        self.projector.observe_offsets(offsets);
    }

    pub fn observe_offset(&mut self, key: CellKey, x: f64, y: f64) {
        self.projector.observe_offset(key, Offset::new(x, y));
    }

    pub fn observe_texture_size(&mut self, width: f64, height: f64) {
        self.projector.observe_natural(Size::new(width, height));
    }

    /// Thumbnail for `id` finished loading (`ok`) or failed.
    pub fn report_media(&mut self, id: &str, ok: bool) {
        if self.detached {
            trace!(target: "mosaic::engine", id, "media report after detach ignored");
            return;
        }
        let status = self
            .media
            .get(id)
            .copied()
            .unwrap_or(MediaStatus::Loading);
        let next = if ok { status.on_load() } else { status.on_error() };
        self.media.insert(id.to_owned(), next);
    }

    /// Release observers. Later geometry, media, background and decoration
    /// notifications are ignored.
    pub fn detach(&mut self) {
        self.detached = true;
        self.projector.detach();
        self.media.clear();
        debug!(target: "mosaic::engine", "grid detached");
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Resolve every cell against `content`, indexed `[row][col]`.
    #[must_use]
    pub fn layout(&self, content: &[ContentSlot]) -> Vec<Vec<RenderCell>> {
        let textures = if self.background_url.is_some() {
            self.projector.project(&self.mask)
        } else {
            BTreeMap::new()
        };

        (0..self.mask.rows())
            .map(|row| {
                (0..self.mask.cols())
                    .map(|col| self.cell(CellKey::new(row, col), content, &textures))
                    .collect()
            })
            .collect()
    }

    fn cell(
        &self,
        key: CellKey,
        content: &[ContentSlot],
        textures: &BTreeMap<CellKey, TextureWindow>,
    ) -> RenderCell {
        let base_kind = self.mask.kind_at(key);
        let stamp = content::bound_content(&self.mask, content, key).cloned();
        let decoration = self.decorations.get(&key).cloned();
        let clickable =
            interaction::is_clickable(base_kind, stamp.is_some(), decoration.is_some());
        let media = stamp.as_ref().map_or(MediaStatus::None, |s| {
            self.media.get(&s.id).copied().unwrap_or(MediaStatus::Loading)
        });

        RenderCell {
            row: key.row,
            col: key.col,
            base_kind,
            kind: content::effective_kind(base_kind, stamp.is_some()),
            content: stamp,
            clickable,
            delay_ms: self.delays[key.row][key.col],
            decoration,
            texture: textures.get(&key).copied(),
            media,
        }
    }

    /// Bound content in slot order, for the list layout.
    #[must_use]
    pub fn list_items(&self, content: &[ContentSlot]) -> Vec<ListItem> {
        content::list_items(&self.mask, content)
    }

    #[must_use]
    pub fn render(&self, content: &[ContentSlot]) -> Rendered {
        match self.layout_mode {
            LayoutMode::Grid => Rendered::Grid(self.layout(content)),
            LayoutMode::List => Rendered::List(self.list_items(content)),
        }
    }

    /// What activating `(row, col)` does under `content`.
    #[must_use]
    pub fn activate(
        &self,
        content: &[ContentSlot],
        row: usize,
        col: usize,
        trigger: Trigger<'_>,
    ) -> Activation {
        if row >= self.mask.rows() || col >= self.mask.cols() {
            return Activation::None;
        }
        let cell = self.cell(CellKey::new(row, col), content, &BTreeMap::new());
        interaction::resolve_activation(&cell, trigger)
    }

    /// Activate a list item: always navigation when the slot is bound.
    #[must_use]
    pub fn activate_slot(&self, content: &[ContentSlot], slot: usize) -> Activation {
        match content.get(slot).and_then(Option::as_ref) {
            Some(stamp) if slot < self.mask.slot_count() => Activation::Navigate(stamp.id.clone()),
            _ => Activation::None,
        }
    }
}

impl Default for Mosaic {
    fn default() -> Self {
        Self::new(GridMask::portfolio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn images() -> [String; 2] {
        ["present1.svg".to_owned(), "present2.svg".to_owned()]
    }

    fn content(n: usize) -> Vec<ContentSlot> {
        (0..n)
            .map(|i| Some(Stamp::new(format!("p{i}"), format!("Project {i}"))))
            .collect()
    }

    fn flat(cells: &[Vec<RenderCell>]) -> impl Iterator<Item = &RenderCell> {
        cells.iter().flatten()
    }

    #[test]
    fn holes_degrade_in_place() {
        let engine = Mosaic::default();
        let mut list = content(20);
        list[3] = None;
        list[7] = None;
        let cells = engine.layout(&list);

        let bound: Vec<&RenderCell> = flat(&cells).filter(|c| c.content.is_some()).collect();
        assert_eq!(bound.len(), 18);
        assert!(bound.iter().all(|c| c.clickable && c.kind == CellKind::Project));

        for slot in [3, 7] {
            let (r, c) = engine.mask().cell_for_slot(slot).unwrap();
            let cell = &cells[r][c];
            assert_eq!(cell.kind, CellKind::Outline);
            assert_eq!(cell.base_kind, CellKind::Project);
            assert!(!cell.clickable);
            assert!(cell.is_empty_slot());
            assert_eq!(
                engine.activate(&list, r, c, Trigger::Pointer),
                Activation::None
            );
        }
    }

    #[test]
    fn content_cells_navigate() {
        let engine = Mosaic::default();
        let list = content(20);
        let (r, c) = engine.mask().cell_for_slot(5).unwrap();
        assert_eq!(
            engine.activate(&list, r, c, Trigger::Key("Enter")),
            Activation::Navigate("p5".to_owned())
        );
        assert_eq!(engine.activate(&list, 99, 0, Trigger::Pointer), Activation::None);
    }

    #[test]
    fn short_content_list_leaves_trailing_holes() {
        let engine = Mosaic::default();
        let cells = engine.layout(&content(4));
        assert_eq!(flat(&cells).filter(|c| c.content.is_some()).count(), 4);
        assert_eq!(flat(&cells).filter(|c| c.is_empty_slot()).count(), 16);
    }

    #[test]
    fn decorated_cells_fire_callback() {
        let mut engine = Mosaic::default();
        engine.decorate(12345, DecorationMode::Sparse, &images()).unwrap();
        let list = content(20);
        let cells = engine.layout(&list);
        let cell = &cells[4][11];
        assert_eq!(cell.decoration.as_deref(), Some("present1.svg"));
        assert!(cell.clickable);
        assert_eq!(
            engine.activate(&list, 4, 11, Trigger::Key(" ")),
            Activation::Decoration
        );

        engine.clear_decorations();
        assert!(flat(&engine.layout(&list)).all(|c| c.decoration.is_none()));
    }

    #[test]
    fn empty_cells_are_inert() {
        let mut engine = Mosaic::default();
        engine.decorate(1, DecorationMode::default(), &images()).unwrap();
        let cells = engine.layout(&content(20));
        for cell in flat(&cells).filter(|c| c.base_kind == CellKind::Empty) {
            assert!(!cell.clickable);
            assert!(!cell.is_visible());
            assert!(cell.decoration.is_none());
        }
    }

    #[test]
    fn texture_only_with_background() {
        let mut engine = Mosaic::default();
        engine.observe_container(1200.0, 500.0);
        engine.observe_offset(CellKey::new(0, 7), 100.0, 100.0);
        engine.observe_texture_size(800.0, 1000.0);
        assert!(engine.layout(&[])[0][7].texture.is_none());

        engine.set_background(Some("bg.jpg".to_owned()));
        engine.observe_texture_size(800.0, 1000.0);
        let w = engine.layout(&[])[0][7].texture.unwrap();
        assert_eq!((w.size_x, w.size_y), (1200.0, 1500.0));
        assert_eq!((w.offset_x, w.offset_y), (-100.0, -600.0));

        engine.detach();
        assert!(engine.layout(&[])[0][7].texture.is_none());
    }

    #[test]
    fn decorate_rejects_bad_density_and_keeps_placement() {
        let mut engine = Mosaic::default();
        engine.decorate(12345, DecorationMode::Sparse, &images()).unwrap();
        for density in [f64::NAN, 5.0] {
            assert!(matches!(
                engine.decorate(7, DecorationMode::Dense { density }, &images()),
                Err(MosaicError::InvalidDensity(_))
            ));
        }
        assert_eq!(engine.decorations().len(), 1);
    }

    #[test]
    fn native_config_is_validated_like_json() {
        let config = GridConfig {
            decoration_images: Some(images()),
            decoration_seed: Some(7.0),
            decoration_mode: DecorationMode::Dense { density: 5.0 },
            ..GridConfig::default()
        };
        assert!(matches!(
            Mosaic::from_config(&config),
            Err(MosaicError::InvalidDensity(_))
        ));

        let config = GridConfig {
            texture_fit: TextureFit::Scaled { factor: f64::NAN },
            ..GridConfig::default()
        };
        assert!(matches!(
            Mosaic::from_config(&config),
            Err(MosaicError::InvalidTextureScale(_))
        ));
    }

    #[test]
    fn detached_engine_ignores_late_callbacks() {
        let mut engine = Mosaic::default();
        engine.set_background(Some("bg.jpg".to_owned()));
        let list = content(20);
        let (r, c) = engine.mask().cell_for_slot(0).unwrap();
        engine.detach();
        assert!(engine.is_detached());

        engine.report_media("p0", true);
        assert_eq!(engine.layout(&list)[r][c].media, MediaStatus::Loading);

        engine.decorate(12345, DecorationMode::default(), &images()).unwrap();
        assert!(engine.decorations().is_empty());

        engine.set_background(Some("other.jpg".to_owned()));
        assert_eq!(engine.background(), Some("bg.jpg"));
    }

    #[test]
    fn media_status_is_tracked_per_stamp() {
        let mut engine = Mosaic::default();
        let list = content(2);
        let (r, c) = engine.mask().cell_for_slot(0).unwrap();
        assert_eq!(engine.layout(&list)[r][c].media, MediaStatus::Loading);
        engine.report_media("p0", false);
        assert_eq!(engine.layout(&list)[r][c].media, MediaStatus::Error);
        engine.report_media("p0", true);
        assert_eq!(engine.layout(&list)[r][c].media, MediaStatus::Error);
        assert_eq!(engine.layout(&list)[0][0].media, MediaStatus::None);
    }

    #[test]
    fn list_mode_renders_bound_items_only() {
        let config = GridConfig {
            layout_mode: LayoutMode::List,
            ..GridConfig::default()
        };
        let engine = Mosaic::from_config(&config).unwrap();
        let mut list = content(20);
        list[0] = None;
        match engine.render(&list) {
            Rendered::List(items) => {
                assert_eq!(items.len(), 19);
                assert_eq!(items[0].slot, 1);
            }
            Rendered::Grid(_) => panic!("expected list layout"),
        }
        assert_eq!(engine.activate_slot(&list, 0), Activation::None);
        assert_eq!(
            engine.activate_slot(&list, 1),
            Activation::Navigate("p1".to_owned())
        );
    }

    #[test]
    fn config_drives_decorations_and_stagger() {
        let config = GridConfig::from_json(
            r#"{"staggerMs": 10, "decorationImages": ["a", "b"], "decorationSeed": 12345}"#,
        )
        .unwrap();
        let engine = Mosaic::from_config(&config).unwrap();
        assert_eq!(engine.decorations().len(), 27);
        assert_eq!(engine.delays()[1][6], 10);
    }

    // Content and decoration never share a cell.
    proptest! {
        #[test]
        fn prop_content_and_decoration_exclusive(
            seed in any::<u32>(),
            sparse in any::<bool>(),
            holes in proptest::collection::vec(any::<bool>(), 20),
        ) {
            let mut engine = Mosaic::default();
            let mode = if sparse { DecorationMode::Sparse } else { DecorationMode::default() };
            engine.decorate(seed, mode, &images()).unwrap();
            let list: Vec<ContentSlot> = content(20)
                .into_iter()
                .zip(holes)
                .map(|(s, hole)| if hole { None } else { s })
                .collect();
            for cell in flat(&engine.layout(&list)) {
                prop_assert!(!(cell.content.is_some() && cell.decoration.is_some()));
            }
        }
    }
}
