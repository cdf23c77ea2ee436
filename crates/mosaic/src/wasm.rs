//! `wasm-bindgen` exports for the project grid.
//!
//! Host-driven: the page measures the DOM and pushes geometry in, then
//! pulls JSON layouts out. Everything crossing the boundary is a string,
//! number or bool.

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::catalog::Catalog;
use crate::content::{ContentSlot, TagFilter};
use crate::decor::DecorationMode;
use crate::interaction::Trigger;
use crate::rng::coerce_seed;
use crate::weather::{
    Backgrounds, MemoryStore, PreferenceStore, WeatherMode, WeatherState, STORAGE_KEY,
};
use crate::{CellKey, GridConfig, LayoutMode, Mosaic};

fn parse_content(json: &str) -> serde_json::Result<Vec<ContentSlot>> {
    serde_json::from_str(json)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        warn!(target: "mosaic::wasm", %err, "failed to serialize");
        "null".to_owned()
    })
}

/// One mounted project grid.
#[wasm_bindgen]
#[derive(Debug)]
pub struct MosaicGrid {
    engine: Mosaic,
    content: Vec<ContentSlot>,
    config_error: Option<String>,
}

#[wasm_bindgen]
impl MosaicGrid {
    /// Build from a JSON [`GridConfig`]. An invalid config falls back to the
    /// defaults; the reason is available from `configError`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(config_json: &str) -> Self {
        let built = GridConfig::from_json(config_json).and_then(|c| Mosaic::from_config(&c));
        let (engine, config_error) = match built {
            Ok(engine) => (engine, None),
            Err(err) => {
                warn!(target: "mosaic::wasm", %err, "invalid grid config, using defaults");
                (Mosaic::default(), Some(err.to_string()))
            }
        };
        Self {
            engine,
            content: Vec::new(),
            config_error,
        }
    }

    #[wasm_bindgen(js_name = configError)]
    #[must_use]
    pub fn config_error(&self) -> Option<String> {
        self.config_error.clone()
    }

    #[wasm_bindgen(js_name = slotCount)]
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.engine.slot_count() as u32
    }

    #[wasm_bindgen(js_name = layoutMode)]
    #[must_use]
    pub fn layout_mode(&self) -> String {
        match self.engine.layout_mode() {
            LayoutMode::Grid => "grid".to_owned(),
            LayoutMode::List => "list".to_owned(),
        }
    }

    #[wasm_bindgen(js_name = setListMode)]
    pub fn set_list_mode(&mut self, list: bool) {
        let mode = if list { LayoutMode::List } else { LayoutMode::Grid };
        self.engine.set_layout_mode(mode);
    }

    /// Replace the content list: a JSON array of `{id, name}` or `null`.
    /// Returns false and keeps the previous list if the JSON is invalid.
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, stamps_json: &str) -> bool {
        match parse_content(stamps_json) {
            Ok(content) => {
                if content.len() != self.engine.slot_count() {
                    warn!(
                        target: "mosaic::wasm",
                        entries = content.len(),
                        slots = self.engine.slot_count(),
                        "content length does not match slot count"
                    );
                }
                self.content = content;
                true
            }
            Err(err) => {
                warn!(target: "mosaic::wasm", %err, "invalid content JSON");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&mut self, url: Option<String>) {
        self.engine.set_background(url);
    }

    /// Place decorations for `seed` with the given image pair. `density`
    /// applies to the dense mode only; pass 1 for every grey cell.
    /// Returns false and keeps the previous placement if it is out of range.
    #[wasm_bindgen(js_name = decorate)]
    pub fn decorate(
        &mut self,
        seed: f64,
        sparse: bool,
        density: f64,
        image_a: String,
        image_b: String,
    ) -> bool {
        let mode = if sparse {
            DecorationMode::Sparse
        } else {
            DecorationMode::Dense { density }
        };
        match self
            .engine
            .decorate(coerce_seed(seed), mode, &[image_a, image_b])
        {
            Ok(()) => true,
            Err(err) => {
                warn!(target: "mosaic::wasm", %err, "decoration rejected");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = clearDecorations)]
    pub fn clear_decorations(&mut self) {
        self.engine.clear_decorations();
    }

    #[wasm_bindgen(js_name = observeContainer)]
    pub fn observe_container(&mut self, width: f64, height: f64) {
        self.engine.observe_container(width, height);
    }

    #[wasm_bindgen(js_name = observeCellOffset)]
    pub fn observe_cell_offset(&mut self, row: u32, col: u32, x: f64, y: f64) {
        self.engine
            .observe_offset(CellKey::new(row as usize, col as usize), x, y);
    }

    #[wasm_bindgen(js_name = observeTextureSize)]
    pub fn observe_texture_size(&mut self, width: f64, height: f64) {
        self.engine.observe_texture_size(width, height);
    }

    #[wasm_bindgen(js_name = reportMedia)]
    pub fn report_media(&mut self, id: &str, ok: bool) {
        self.engine.report_media(id, ok);
    }

    /// Current render pass as JSON, in the configured layout mode.
    #[wasm_bindgen(js_name = renderJson)]
    #[must_use]
    pub fn render_json(&self) -> String {
        to_json(&self.engine.render(&self.content))
    }

    /// Pointer click on `(row, col)`. Returns the activation as JSON.
    #[must_use]
    pub fn click(&self, row: u32, col: u32) -> String {
        to_json(&self.engine.activate(
            &self.content,
            row as usize,
            col as usize,
            Trigger::Pointer,
        ))
    }

    /// Key press on `(row, col)`; `key` is `KeyboardEvent.key`.
    #[wasm_bindgen(js_name = keyDown)]
    #[must_use]
    pub fn key_down(&self, row: u32, col: u32, key: &str) -> String {
        to_json(&self.engine.activate(
            &self.content,
            row as usize,
            col as usize,
            Trigger::Key(key),
        ))
    }

    /// Tap on a list-mode item.
    #[wasm_bindgen(js_name = tapSlot)]
    #[must_use]
    pub fn tap_slot(&self, slot: u32) -> String {
        to_json(&self.engine.activate_slot(&self.content, slot as usize))
    }

    /// Component teardown.
    pub fn detach(&mut self) {
        self.engine.detach();
    }
}

/// Weather theme toggle. The host owns `localStorage`: it passes the stored
/// value in and writes `storedValue` back after each change.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WeatherPreference {
    state: WeatherState<MemoryStore>,
    backgrounds: Backgrounds,
}

#[wasm_bindgen]
impl WeatherPreference {
    /// `backgrounds_json` is `{"default": url?, "rain": url?}`; invalid JSON
    /// means no backgrounds.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(stored: Option<String>, viewport_width: f64, backgrounds_json: &str) -> Self {
        let mut store = MemoryStore::default();
        if let Some(value) = stored {
            store.save(STORAGE_KEY, &value);
        }
        let backgrounds = serde_json::from_str(backgrounds_json).unwrap_or_else(|err| {
            warn!(target: "mosaic::wasm", %err, "invalid backgrounds JSON");
            Backgrounds::default()
        });
        Self {
            state: WeatherState::load(store, viewport_width),
            backgrounds,
        }
    }

    #[must_use]
    pub fn mode(&self) -> String {
        self.state.mode().to_string()
    }

    /// Mode actually rendered at the current viewport width.
    #[must_use]
    pub fn effective(&self) -> String {
        self.state.effective().to_string()
    }

    /// Toggle `mode` (`"rain"` / `"snow"`); pressing the active one turns
    /// weather off.
    pub fn toggle(&mut self, mode: &str) {
        self.state.toggle(WeatherMode::parse(mode));
    }

    #[wasm_bindgen(js_name = setViewportWidth)]
    pub fn set_viewport_width(&mut self, width: f64) {
        self.state.set_viewport_width(width);
    }

    #[must_use]
    pub fn background(&self) -> Option<String> {
        self.state.background(&self.backgrounds).map(str::to_owned)
    }

    #[wasm_bindgen(js_name = decorationsEnabled)]
    #[must_use]
    pub fn decorations_enabled(&self) -> bool {
        self.state.decorations_enabled()
    }

    /// Value to persist under `weatherMode`.
    #[wasm_bindgen(js_name = storedValue)]
    #[must_use]
    pub fn stored_value(&self) -> Option<String> {
        self.state.store().load(STORAGE_KEY)
    }
}

/// Project catalog with the tag filter, feeding [`MosaicGrid::set_content`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct ProjectCatalog {
    catalog: Catalog,
    filter: TagFilter,
    load_error: Option<String>,
}

#[wasm_bindgen]
impl ProjectCatalog {
    /// Parse a JSON array of projects. Invalid JSON yields an empty catalog;
    /// the reason is available from `loadError`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(projects_json: &str) -> Self {
        let (catalog, load_error) = match Catalog::from_json(projects_json) {
            Ok(catalog) => (catalog, None),
            Err(err) => {
                warn!(target: "mosaic::wasm", %err, "invalid project catalog");
                (Catalog::default(), Some(err.to_string()))
            }
        };
        Self {
            catalog,
            filter: TagFilter::new(),
            load_error,
        }
    }

    #[wasm_bindgen(js_name = loadError)]
    #[must_use]
    pub fn load_error(&self) -> Option<String> {
        self.load_error.clone()
    }

    #[wasm_bindgen(js_name = toggleTag)]
    pub fn toggle_tag(&mut self, tag: &str) {
        self.filter.toggle(tag);
    }

    #[wasm_bindgen(js_name = clearTags)]
    pub fn clear_tags(&mut self) {
        self.filter.clear();
    }

    #[wasm_bindgen(js_name = isTagSelected)]
    #[must_use]
    pub fn is_tag_selected(&self, tag: &str) -> bool {
        self.filter.is_selected(tag)
    }

    /// Filtered content list in catalog order, with holes for filtered-out
    /// projects.
    #[wasm_bindgen(js_name = contentJson)]
    #[must_use]
    pub fn content_json(&self) -> String {
        let stamps = self.catalog.stamps();
        to_json(&self.filter.apply(&stamps, |id| self.catalog.tags_of(id)))
    }

    /// Full project record, or `"null"` for an unknown id.
    #[wasm_bindgen(js_name = projectJson)]
    #[must_use]
    pub fn project_json(&self, id: &str) -> String {
        to_json(&self.catalog.find(id))
    }

    /// `{"prev": id | null, "next": id | null}` in catalog order.
    #[wasm_bindgen(js_name = neighborsJson)]
    #[must_use]
    pub fn neighbors_json(&self, id: &str) -> String {
        let (prev, next) = self.catalog.neighbors(id);
        to_json(&serde_json::json!({
            "prev": prev.map(|p| p.id.as_str()),
            "next": next.map(|p| p.id.as_str()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_json(holes: &[usize]) -> String {
        let entries: Vec<String> = (0..20)
            .map(|i| {
                if holes.contains(&i) {
                    "null".to_owned()
                } else {
                    format!(r#"{{"id":"p{i}","name":"Project {i}"}}"#)
                }
            })
            .collect();
        format!("[{}]", entries.join(","))
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let grid = MosaicGrid::new("{not json");
        assert!(grid.config_error().is_some());
        assert_eq!(grid.slot_count(), 20);

        let grid = MosaicGrid::new("{}");
        assert!(grid.config_error().is_none());
        assert_eq!(grid.layout_mode(), "grid");
    }

    #[test]
    fn content_round_trip_and_activation() {
        let mut grid = MosaicGrid::new("{}");
        assert!(grid.set_content(&content_json(&[3, 7])));
        assert!(!grid.set_content("[1, 2]"));

        // Slot 0 is (0, 4); slot 3 is (0, 11).
        assert_eq!(grid.click(0, 4), r#"{"action":"navigate","id":"p0"}"#);
        assert_eq!(grid.key_down(0, 4, "Enter"), r#"{"action":"navigate","id":"p0"}"#);
        assert_eq!(grid.click(0, 11), r#"{"action":"none"}"#);
        assert_eq!(grid.key_down(0, 4, "Tab"), r#"{"action":"none"}"#);
    }

    #[test]
    fn render_json_reports_mode_and_cells() {
        let mut grid = MosaicGrid::new("{}");
        grid.set_content(&content_json(&[]));
        let value: serde_json::Value = serde_json::from_str(&grid.render_json()).unwrap();
        assert_eq!(value["mode"], "grid");
        assert_eq!(value["items"].as_array().unwrap().len(), 5);
        assert_eq!(value["items"][0][4]["kind"], "project");
        assert_eq!(value["items"][0][4]["content"]["id"], "p0");
        assert_eq!(value["items"][2][6]["delayMs"], 0);
        assert_eq!(value["items"][1][6]["delayMs"], 25);

        grid.set_list_mode(true);
        let value: serde_json::Value = serde_json::from_str(&grid.render_json()).unwrap();
        assert_eq!(value["mode"], "list");
        assert_eq!(value["items"].as_array().unwrap().len(), 20);
        assert_eq!(grid.tap_slot(2), r#"{"action":"navigate","id":"p2"}"#);
    }

    #[test]
    fn decorations_over_the_boundary() {
        let mut grid = MosaicGrid::new("{}");
        assert!(grid.decorate(12345.0, true, 1.0, "a.svg".to_owned(), "b.svg".to_owned()));
        assert_eq!(grid.click(4, 11), r#"{"action":"decoration"}"#);
        assert!(!grid.decorate(1.0, false, f64::NAN, "a.svg".to_owned(), "b.svg".to_owned()));
        assert_eq!(grid.click(4, 11), r#"{"action":"decoration"}"#);
        grid.clear_decorations();
        assert_eq!(grid.click(4, 11), r#"{"action":"none"}"#);
    }

    #[test]
    fn weather_preference_round_trip() {
        let backgrounds = r#"{"default": "default.jpg", "rain": "rain.jpg"}"#;
        let mut weather = WeatherPreference::new(Some("rain".to_owned()), 1440.0, backgrounds);
        assert_eq!(weather.mode(), "rain");
        assert_eq!(weather.background().as_deref(), Some("rain.jpg"));

        weather.toggle("snow");
        assert_eq!(weather.stored_value().as_deref(), Some("snow"));
        assert!(weather.decorations_enabled());
        assert_eq!(weather.background(), None);

        weather.set_viewport_width(800.0);
        assert_eq!(weather.effective(), "none");

        let fresh = WeatherPreference::new(None, 1440.0, "not json");
        assert_eq!(fresh.mode(), "none");
        assert_eq!(fresh.background(), None);
    }

    #[test]
    fn catalog_filter_feeds_grid_content() {
        let projects = r#"[
            {"id": "a", "title": "A", "type": "media", "tags": ["AI"], "description": ""},
            {"id": "b", "title": "B", "type": "text", "tags": ["Fashion"], "description": ""},
            {"id": "c", "title": "C", "type": "media", "tags": ["AI"], "description": ""}
        ]"#;
        let mut catalog = ProjectCatalog::new(projects);
        assert!(catalog.load_error().is_none());

        catalog.toggle_tag("AI");
        assert!(catalog.is_tag_selected("AI"));
        let content = catalog.content_json();
        assert_eq!(
            content,
            r#"[{"id":"a","name":"A"},null,{"id":"c","name":"C"}]"#
        );

        let mut grid = MosaicGrid::new("{}");
        assert!(grid.set_content(&content));
        // Slot 1 is (0, 5).
        assert_eq!(grid.click(0, 5), r#"{"action":"none"}"#);

        let neighbors: serde_json::Value =
            serde_json::from_str(&catalog.neighbors_json("b")).unwrap();
        assert_eq!(neighbors["prev"], "a");
        assert_eq!(neighbors["next"], "c");
        let first: serde_json::Value =
            serde_json::from_str(&catalog.neighbors_json("a")).unwrap();
        assert!(first["prev"].is_null());
        assert_eq!(catalog.project_json("zzz"), "null");
        assert!(ProjectCatalog::new("{").load_error().is_some());
    }
}
