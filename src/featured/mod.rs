//! Featured artwork for genre tiles.
//!
//! Each genre tile on the browse screen is illustrated by one catalog title.
//! [`assign_featured`] picks those titles so that no two genres show the same
//! one. Genres are processed strictly in input order with a running set of
//! used ids, so earlier genres get first claim on popular titles; the pass is
//! greedy and never revisits an earlier pick.
//!
//! For every genre the assignment tries, in order:
//!
//! 1. the genre's own discover listing, up to `primary_pages` pages;
//! 2. page 1 (`related_pages`) of each related genre from [`FallbackTables`];
//! 3. a placeholder built from the genre's default image, whose id is the
//!    negated genre id;
//! 4. nothing: the tile is shown without artwork.
//!
//! A failed catalog query counts as an empty page and never aborts the run.

pub mod tables;

use std::collections::HashSet;

use marquee_common::{CatalogItem, CatalogItemId, Category, CategoryId, MediaKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, DiscoverPage};
use crate::config::FeaturedConfig;

pub use tables::FallbackTables;

/// Tuning for [`assign_featured`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedOptions {
    pub primary_pages: u32,
    pub related_pages: u32,
    pub placeholder_title: String,
}

impl Default for FeaturedOptions {
    fn default() -> Self {
        Self {
            primary_pages: 3,
            related_pages: 1,
            placeholder_title: "Featured".to_string(),
        }
    }
}

impl From<&FeaturedConfig> for FeaturedOptions {
    fn from(config: &FeaturedConfig) -> Self {
        Self {
            primary_pages: config.primary_pages,
            related_pages: config.related_pages,
            placeholder_title: config.placeholder_title.clone(),
        }
    }
}

/// Where a featured title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeaturedSource {
    /// The genre's own listing.
    Primary { page: u32 },
    /// A related genre's listing.
    Related { category: CategoryId, page: u32 },
    /// A placeholder built from the genre's default image.
    Placeholder,
}

/// The title chosen for one genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Featured {
    pub item: CatalogItem,
    pub source: FeaturedSource,
}

/// One genre tile and its artwork, if any was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedEntry {
    pub category: Category,
    pub featured: Option<Featured>,
}

impl FeaturedEntry {
    pub fn item(&self) -> Option<&CatalogItem> {
        self.featured.as_ref().map(|f| &f.item)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.featured,
            Some(Featured {
                source: FeaturedSource::Placeholder,
                ..
            })
        )
    }

    /// Full URL of the tile artwork.
    ///
    /// Catalog image paths are appended to `image_base`; placeholder images
    /// are returned as configured.
    pub fn image_url(&self, image_base: &str) -> Option<String> {
        let featured = self.featured.as_ref()?;
        let path = featured.item.image_path()?;
        match featured.source {
            FeaturedSource::Placeholder => Some(path.to_string()),
            _ => Some(format!("{}{}", image_base.trim_end_matches('/'), path)),
        }
    }
}

/// Result of one assignment pass, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeaturedAssignments {
    entries: Vec<FeaturedEntry>,
}

impl FeaturedAssignments {
    pub fn get(&self, category: CategoryId) -> Option<&FeaturedEntry> {
        self.entries.iter().find(|e| e.category.id == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeaturedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<FeaturedEntry> {
        self.entries
    }
}

/// Assign one featured title to every category, without repeats.
pub async fn assign_featured<C: Catalog + ?Sized>(
    catalog: &C,
    kind: MediaKind,
    categories: &[Category],
    tables: &FallbackTables,
    options: &FeaturedOptions,
) -> FeaturedAssignments {
    let mut assigner = Assigner {
        catalog,
        kind,
        tables,
        options,
        used: HashSet::new(),
    };

    let mut entries = Vec::with_capacity(categories.len());
    for category in categories {
        let featured = assigner.pick(category.id).await;
        if let Some(ref f) = featured {
            assigner.used.insert(f.item.id);
        }
        debug!(
            category = %category.id,
            name = %category.name,
            item = ?featured.as_ref().map(|f| f.item.id),
            "Featured pick"
        );
        entries.push(FeaturedEntry {
            category: category.clone(),
            featured,
        });
    }

    let placeholders = entries.iter().filter(|e| e.is_placeholder()).count();
    let missing = entries.iter().filter(|e| e.featured.is_none()).count();
    info!(
        %kind,
        categories = entries.len(),
        placeholders,
        missing,
        "Assigned featured artwork"
    );

    FeaturedAssignments { entries }
}

struct Assigner<'a, C: ?Sized> {
    catalog: &'a C,
    kind: MediaKind,
    tables: &'a FallbackTables,
    options: &'a FeaturedOptions,
    used: HashSet<CatalogItemId>,
}

impl<C: Catalog + ?Sized> Assigner<'_, C> {
    async fn pick(&self, category: CategoryId) -> Option<Featured> {
        if let Some((item, page)) = self.scan(category, self.options.primary_pages).await {
            return Some(Featured {
                item,
                source: FeaturedSource::Primary { page },
            });
        }

        // Related genres are scanned on their own listing only; their own
        // related entries are never followed.
        for &related in self.tables.related(category) {
            if let Some((item, page)) = self.scan(related, self.options.related_pages).await {
                return Some(Featured {
                    item,
                    source: FeaturedSource::Related {
                        category: related,
                        page,
                    },
                });
            }
        }

        self.tables.default_image(category).map(|url| Featured {
            item: CatalogItem {
                id: CatalogItemId::placeholder_for(category),
                title: self.options.placeholder_title.clone(),
                backdrop_path: Some(url.to_string()),
                poster_path: None,
            },
            source: FeaturedSource::Placeholder,
        })
    }

    /// First eligible item in pages `1..=pages` of `category`'s listing.
    async fn scan(&self, category: CategoryId, pages: u32) -> Option<(CatalogItem, u32)> {
        for page in 1..=pages {
            let Some(listing) = self.fetch(category, page).await else {
                continue;
            };

            if let Some(item) = listing.results.iter().find(|item| self.is_eligible(item)) {
                return Some((item.clone(), page));
            }

            if listing.is_last() {
                break;
            }
        }
        None
    }

    async fn fetch(&self, category: CategoryId, page: u32) -> Option<DiscoverPage> {
        match self.catalog.discover(self.kind, category, page).await {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(%category, page, "Catalog query failed, treating as empty: {:#}", e);
                None
            }
        }
    }

    fn is_eligible(&self, item: &CatalogItem) -> bool {
        !item.id.is_placeholder() && !self.used.contains(&item.id) && item.has_image()
    }
}
