//! External catalog queries (TMDB discover and genre listing).
//!
//! The [`Catalog`] trait is the seam the featured-artwork assignment depends
//! on; [`TmdbCatalog`] is the production implementation.

pub mod tmdb;

use async_trait::async_trait;
use marquee_common::{CatalogItem, Category, CategoryId, MediaKind};
use serde::{Deserialize, Serialize};

pub use tmdb::TmdbCatalog;

/// One page of a discover query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverPage {
    /// 1-based page number this result answers.
    pub page: u32,
    /// Items in catalog order (descending popularity).
    pub results: Vec<CatalogItem>,
    /// Number of pages the catalog has for the query, if reported.
    pub total_pages: Option<u32>,
}

impl DiscoverPage {
    /// Whether no page after this one can hold more results.
    pub fn is_last(&self) -> bool {
        matches!(self.total_pages, Some(total) if total <= self.page)
    }
}

/// Async catalog of movies and TV shows.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Titles in `category`, most popular first, 1-based `page`.
    async fn discover(
        &self,
        kind: MediaKind,
        category: CategoryId,
        page: u32,
    ) -> anyhow::Result<DiscoverPage>;

    /// All genre categories the catalog knows for `kind`.
    async fn genres(&self, kind: MediaKind) -> anyhow::Result<Vec<Category>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_detection() {
        let page = DiscoverPage {
            page: 3,
            results: Vec::new(),
            total_pages: Some(3),
        };
        assert!(page.is_last());

        let page = DiscoverPage {
            page: 1,
            results: Vec::new(),
            total_pages: Some(500),
        };
        assert!(!page.is_last());

        let page = DiscoverPage {
            page: 1,
            results: Vec::new(),
            total_pages: None,
        };
        assert!(!page.is_last());
    }
}
