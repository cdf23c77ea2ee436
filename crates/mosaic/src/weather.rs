//! Weather theme preference and what it switches on the grid.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use tracing::debug;

/// Storage key of the persisted preference.
pub const STORAGE_KEY: &str = "weatherMode";

/// Viewports at or below this width run without weather.
pub const MOBILE_MAX_WIDTH: f64 = 980.0;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum WeatherMode {
    #[default]
    None,
    Rain,
    Snow,
}

impl WeatherMode {
    /// Parse a stored value. Anything unrecognised is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            _ => Self::None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rain => "rain",
            Self::Snow => "snow",
        }
    }
}

impl fmt::Display for WeatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store for the single persisted preference.
///
/// Reads and writes are best-effort: an unavailable store behaves as empty.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// Background textures per theme.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
pub struct Backgrounds {
    pub default: Option<String>,
    pub rain: Option<String>,
}

#[derive(Debug)]
pub struct WeatherState<S: PreferenceStore> {
    store: S,
    mode: WeatherMode,
    viewport_width: f64,
}

impl<S: PreferenceStore> WeatherState<S> {
    /// Restore the preference from `store`.
    pub fn load(store: S, viewport_width: f64) -> Self {
        let mode = store
            .load(STORAGE_KEY)
            .map_or(WeatherMode::None, |raw| WeatherMode::parse(&raw));
        Self {
            store,
            mode,
            viewport_width,
        }
    }

    #[must_use]
    pub fn mode(&self) -> WeatherMode {
        self.mode
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.viewport_width <= MOBILE_MAX_WIDTH
    }

    /// Mode actually rendered: weather is disabled on mobile viewports.
    #[must_use]
    pub fn effective(&self) -> WeatherMode {
        if self.is_mobile() {
            WeatherMode::None
        } else {
            self.mode
        }
    }

    pub fn set_mode(&mut self, mode: WeatherMode) {
        debug!(target: "mosaic::weather", from = %self.mode, to = %mode, "weather mode changed");
        self.mode = mode;
        self.store.save(STORAGE_KEY, mode.as_str());
    }

    /// Pressing the active theme turns weather off.
    pub fn toggle(&mut self, mode: WeatherMode) {
        let next = if self.mode == mode {
            WeatherMode::None
        } else {
            mode
        };
        self.set_mode(next);
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Grid background for the selected mode. Snow shows no texture.
    #[must_use]
    pub fn background<'a>(&self, backgrounds: &'a Backgrounds) -> Option<&'a str> {
        match self.mode {
            WeatherMode::Snow => None,
            WeatherMode::Rain => backgrounds.rain.as_deref(),
            WeatherMode::None => backgrounds.default.as_deref(),
        }
    }

    /// Grid decorations are a snow-only feature.
    #[must_use]
    pub fn decorations_enabled(&self) -> bool {
        self.mode == WeatherMode::Snow
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
