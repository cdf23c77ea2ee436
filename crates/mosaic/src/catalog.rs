//! Project records, catalog navigation and gallery paging.

use serde::{Deserialize, Serialize};

use crate::content::{ContentSlot, Stamp};
use crate::error::Result;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Media,
    Text,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Credit {
    pub role: String,
    pub name: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub credits: Vec<Credit>,
    /// Text projects only.
    #[serde(default)]
    pub body: Option<String>,
    /// Media projects only.
    #[serde(default)]
    pub media: Vec<String>,
}

impl Project {
    #[must_use]
    pub fn stamp(&self) -> Stamp {
        Stamp::new(self.id.clone(), self.title.clone())
    }

    /// Gallery images. A media project with nothing to show gets the
    /// placeholder so the page never renders an empty gallery frame.
    #[must_use]
    pub fn gallery_urls(&self, fallback: &str) -> Vec<String> {
        match self.kind {
            ProjectKind::Media if self.media.is_empty() => vec![fallback.to_owned()],
            _ => self.media.clone(),
        }
    }
}

/// Ordered project list. Order drives both slot binding and prev / next.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    #[must_use]
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// # Errors
    ///
    /// [`MosaicError::Json`] if `json` is not an array of project records.
    ///
    /// [`MosaicError::Json`]: crate::error::MosaicError::Json
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn tags_of(&self, id: &str) -> &[String] {
        self.find(id).map(|p| p.tags.as_slice()).unwrap_or_default()
    }

    /// Previous and next project in catalog order.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> (Option<&Project>, Option<&Project>) {
        let Some(idx) = self.projects.iter().position(|p| p.id == id) else {
            return (None, None);
        };
        let prev = idx.checked_sub(1).and_then(|i| self.projects.get(i));
        (prev, self.projects.get(idx + 1))
    }

    /// One stamp per project, in order.
    #[must_use]
    pub fn stamps(&self) -> Vec<ContentSlot> {
        self.projects.iter().map(|p| Some(p.stamp())).collect()
    }
}

/// Clamped image cursor for a project's detail gallery.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Gallery {
    urls: Vec<String>,
    index: usize,
}

impl Gallery {
    #[must_use]
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls, index: 0 }
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.urls.get(self.index).map(String::as_str)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn show_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn show_next(&mut self) {
        if self.index + 1 < self.urls.len() {
            self.index += 1;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
