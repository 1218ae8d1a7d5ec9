mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "MARQUEE_API_URL";
/// Environment variable overriding `tmdb.api_key`
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./marquee.toml",
        "~/.config/marquee/config.toml",
        "/etc/marquee/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply `MARQUEE_API_URL` and `TMDB_API_KEY` on top of file values
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api.base_url = url;
        }
    }

    if let Ok(key) = std::env::var(TMDB_API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.tmdb.api_key = key;
        }
    }
}

/// Resolve the token file path, expanding a leading `~`
pub fn token_file_path(config: &Config) -> PathBuf {
    let raw = config.session.token_file.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.api.base_url.trim().is_empty() {
        anyhow::bail!("api.base_url cannot be empty");
    }

    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs cannot be 0");
    }

    if config.tmdb.base_url.trim().is_empty() {
        anyhow::bail!("tmdb.base_url cannot be empty");
    }

    if config.featured.primary_pages == 0 {
        anyhow::bail!("featured.primary_pages cannot be 0");
    }

    if config.featured.related_pages == 0 {
        anyhow::bail!("featured.related_pages cannot be 0");
    }

    for (key, related) in &config.featured.related {
        parse_genre_key(key)?;
        if let Some(bad) = related.iter().find(|id| **id <= 0) {
            anyhow::bail!("featured.related.{key} contains invalid genre id {bad}");
        }
    }

    for (key, url) in &config.featured.default_images {
        parse_genre_key(key)?;
        if url.trim().is_empty() {
            anyhow::bail!("featured.default_images.{key} cannot be empty");
        }
    }

    if config.tmdb.api_key.is_empty() {
        tracing::debug!("No TMDB API key configured; catalog queries will fail");
    }

    Ok(())
}

/// Parse a genre id used as a table key in `[featured]`
pub fn parse_genre_key(key: &str) -> Result<i64> {
    let id: i64 = key
        .trim()
        .parse()
        .with_context(|| format!("Invalid genre id in [featured]: {key:?}"))?;
    if id <= 0 {
        anyhow::bail!("Genre id in [featured] must be positive: {id}");
    }
    Ok(id)
}
