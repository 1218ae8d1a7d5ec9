use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub featured: FeaturedConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the first-party backend; request paths are joined onto it
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// File holding the persisted access token (tilde is expanded)
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

fn default_token_file() -> PathBuf {
    PathBuf::from("~/.config/marquee/session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key (can also be set with `TMDB_API_KEY`)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,

    /// Prefix for image paths returned by TMDB
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

fn default_language() -> String {
    "en-US".to_string()
}
fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w780".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            base_url: default_tmdb_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturedConfig {
    /// Discover pages scanned for a genre's own candidates (default: 3)
    #[serde(default = "default_primary_pages")]
    pub primary_pages: u32,

    /// Discover pages scanned per related genre (default: 1)
    #[serde(default = "default_related_pages")]
    pub related_pages: u32,

    /// Title given to placeholder entries built from a default image
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,

    /// Extra or replacement related-genre entries, keyed by genre id
    #[serde(default)]
    pub related: BTreeMap<String, Vec<i64>>,

    /// Extra or replacement default images, keyed by genre id
    #[serde(default)]
    pub default_images: BTreeMap<String, String>,
}

fn default_primary_pages() -> u32 {
    3
}
fn default_related_pages() -> u32 {
    1
}
fn default_placeholder_title() -> String {
    "Featured".to_string()
}

impl Default for FeaturedConfig {
    fn default() -> Self {
        Self {
            primary_pages: default_primary_pages(),
            related_pages: default_related_pages(),
            placeholder_title: default_placeholder_title(),
            related: BTreeMap::new(),
            default_images: BTreeMap::new(),
        }
    }
}
