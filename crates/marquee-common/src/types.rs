//! Core type definitions for media kinds, genre categories, and catalog
//! entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{CatalogItemId, CategoryId};

/// Kind of catalog media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// TV series.
    #[default]
    Tv,
    /// Feature films.
    Movie,
}

impl MediaKind {
    /// Path segment used by TMDB for this kind (`tv` or `movie`).
    #[must_use]
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Movie => "movie",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tv" | "show" | "shows" | "series" => Ok(Self::Tv),
            "movie" | "movies" | "film" => Ok(Self::Movie),
            _ => Err(format!("Invalid media kind: {}", s)),
        }
    }
}

/// A genre category shown as a browse tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }
}

/// A single catalog title as returned by a discover query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub title: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl CatalogItem {
    /// Create an item with no image references.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: CatalogItemId::new(id),
            title: title.into(),
            backdrop_path: None,
            poster_path: None,
        }
    }

    #[must_use]
    pub fn with_backdrop(mut self, path: impl Into<String>) -> Self {
        self.backdrop_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    /// The image used to illustrate this item: backdrop, else poster.
    ///
    /// Empty strings count as missing.
    pub fn image_path(&self) -> Option<&str> {
        self.backdrop_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.poster_path.as_deref().filter(|p| !p.is_empty()))
    }

    pub fn has_image(&self) -> bool {
        self.image_path().is_some()
    }
}
