//! Fallback data for genres whose own catalog listing runs dry.
//!
//! Two fixed tables ship with the crate:
//!
//! - related genres, consulted in order when a genre has no eligible title
//!   left of its own;
//! - default images, used to build a placeholder entry when even the related
//!   genres come up empty.
//!
//! Both are keyed by TMDB genre id and cover the TV and movie genre lists.
//! `[featured.related]` and `[featured.default_images]` in the config file
//! add entries or replace built-in ones.

use std::collections::HashMap;

use marquee_common::CategoryId;

use crate::config::{parse_genre_key, FeaturedConfig};

/// Built-in related genres: genre id -> ordered fallback genre ids.
const RELATED_GENRES: &[(i64, &[i64])] = &[
    // TV
    (18, &[10766, 10751]),     // Drama -> Soap, Family
    (99, &[10763, 10764]),     // Documentary -> News, Reality
    (10762, &[16, 10751]),     // Kids -> Animation, Family
    (10763, &[99, 10767]),     // News -> Documentary, Talk
    (10764, &[10767, 35]),     // Reality -> Talk, Comedy
    (10766, &[18, 10751]),     // Soap -> Drama, Family
    (10767, &[10764, 35]),     // Talk -> Reality, Comedy
    (10768, &[10759, 18]),     // War & Politics -> Action & Adventure, Drama
    (37, &[10759, 18]),        // Western -> Action & Adventure, Drama
    // Movie
    (36, &[10752, 18]),        // History -> War, Drama
    (10402, &[99, 35]),        // Music -> Documentary, Comedy
    (10752, &[36, 28]),        // War -> History, Action
    (10770, &[18, 10751]),     // TV Movie -> Drama, Family
];

/// Built-in default images: genre id -> bundled artwork.
const DEFAULT_IMAGES: &[(i64, &str)] = &[
    (16, "assets/genres/animation.jpg"),
    (18, "assets/genres/drama.jpg"),
    (36, "assets/genres/history.jpg"),
    (37, "assets/genres/western.jpg"),
    (99, "assets/genres/documentary.jpg"),
    (10402, "assets/genres/music.jpg"),
    (10751, "assets/genres/family.jpg"),
    (10762, "assets/genres/kids.jpg"),
    (10763, "assets/genres/news.jpg"),
    (10764, "assets/genres/reality.jpg"),
    (10766, "assets/genres/soap.jpg"),
    (10767, "assets/genres/talk.jpg"),
    (10768, "assets/genres/war-politics.jpg"),
    (10770, "assets/genres/tv-movie.jpg"),
];

/// Related-genre and default-image lookups used by the assignment.
#[derive(Debug, Clone, Default)]
pub struct FallbackTables {
    related: HashMap<CategoryId, Vec<CategoryId>>,
    default_images: HashMap<CategoryId, String>,
}

impl FallbackTables {
    /// Tables with no entries: every genre relies on its own listing only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tables shipped with marquee.
    pub fn builtin() -> Self {
        let related = RELATED_GENRES
            .iter()
            .map(|(id, related)| {
                (
                    CategoryId::new(*id),
                    related.iter().copied().map(CategoryId::new).collect(),
                )
            })
            .collect();

        let default_images = DEFAULT_IMAGES
            .iter()
            .map(|(id, url)| (CategoryId::new(*id), (*url).to_string()))
            .collect();

        Self {
            related,
            default_images,
        }
    }

    /// Built-in tables with the `[featured]` overrides applied.
    pub fn from_config(config: &FeaturedConfig) -> anyhow::Result<Self> {
        let mut tables = Self::builtin();

        for (key, related) in &config.related {
            let id = parse_genre_key(key)?;
            tables = tables.with_related(id, related.iter().copied());
        }

        for (key, url) in &config.default_images {
            let id = parse_genre_key(key)?;
            tables = tables.with_default_image(id, url.clone());
        }

        Ok(tables)
    }

    /// Set (or replace) the related genres of `category`.
    #[must_use]
    pub fn with_related(mut self, category: i64, related: impl IntoIterator<Item = i64>) -> Self {
        self.related.insert(
            CategoryId::new(category),
            related.into_iter().map(CategoryId::new).collect(),
        );
        self
    }

    /// Set (or replace) the default image of `category`.
    #[must_use]
    pub fn with_default_image(mut self, category: i64, url: impl Into<String>) -> Self {
        self.default_images
            .insert(CategoryId::new(category), url.into());
        self
    }

    /// Related genres of `category`, in fallback order.
    pub fn related(&self, category: CategoryId) -> &[CategoryId] {
        self.related
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn default_image(&self, category: CategoryId) -> Option<&str> {
        self.default_images.get(&category).map(String::as_str)
    }
}
