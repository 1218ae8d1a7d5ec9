//! Typed ID wrappers for type safety across marquee.
//!
//! TMDB identifies genres and titles with plain integers. These newtypes keep
//! a genre id from being passed where a title id is expected.

use serde::{Deserialize, Serialize};

/// Identifier of a genre category (TMDB genre id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a catalog title (TMDB movie or TV id).
///
/// Real catalog ids are positive. Negative ids are reserved for placeholder
/// entries derived from a category, see [`CatalogItemId::placeholder_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogItemId(i64);

impl CatalogItemId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The placeholder id owned by `category`: the negated category id.
    #[must_use]
    pub const fn placeholder_for(category: CategoryId) -> Self {
        Self(-category.0)
    }

    /// Whether this id was derived from a category rather than the catalog.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for CatalogItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
