mod cli;

use marquee::{
    backend::{AuthApi, Credentials, LibraryApi, Registration, SavedList, SavedTitle},
    catalog::{Catalog, TmdbCatalog},
    config::{self, Config},
    featured::{self, FallbackTables, FeaturedOptions, FeaturedSource},
    session::{ApiClient, ApiRequest, ClientError, FileTokenStore, LogNavigator},
};
use marquee_common::{CatalogItemId, MediaKind};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ListAction};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "marquee=trace,marquee_common=debug,reqwest=debug".to_string()
        } else {
            "marquee=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("marquee {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run(command, config))
        }
    }
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Featured { kind, json } => show_featured(&config, kind.into(), json).await,
        Commands::Login { email, password } => {
            let auth = AuthApi::new(api_client(&config)?);
            with_login_hint(auth.login(&Credentials { email, password }).await)?;
            println!("Logged in");
            Ok(())
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            let auth = AuthApi::new(api_client(&config)?);
            auth.register(&Registration {
                username,
                email,
                password,
            })
            .await?;
            println!("Account created, logged in");
            Ok(())
        }
        Commands::Logout => {
            let auth = AuthApi::new(api_client(&config)?);
            if let Err(e) = auth.logout().await {
                tracing::debug!("Logout call failed: {}", e);
            }
            println!("Logged out");
            Ok(())
        }
        Commands::Favorites { action } => {
            manage_list(&config, SavedList::Favorites, action).await
        }
        Commands::WatchLater { action } => {
            manage_list(&config, SavedList::WatchLater, action).await
        }
        Commands::Request { method, path, body } => {
            raw_request(&config, &method, &path, body.as_deref()).await
        }
        Commands::Validate { .. } | Commands::Version => Ok(()),
    }
}

fn api_client(config: &Config) -> Result<Arc<ApiClient>> {
    let store = Arc::new(FileTokenStore::new(config::token_file_path(config)));
    let client = ApiClient::from_config(&config.api, store, Arc::new(LogNavigator))
        .context("Failed to create backend client")?;
    Ok(Arc::new(client))
}

fn with_login_hint<T>(result: std::result::Result<T, ClientError>) -> Result<T> {
    result.map_err(|e| {
        if e.requires_login() {
            anyhow::Error::new(e).context("Not logged in (run `marquee login`)")
        } else {
            e.into()
        }
    })
}

async fn show_featured(config: &Config, kind: MediaKind, json: bool) -> Result<()> {
    let catalog = TmdbCatalog::new(&config.tmdb);
    if !catalog.is_available() {
        anyhow::bail!(
            "No TMDB API key configured (set tmdb.api_key or {})",
            config::TMDB_API_KEY_ENV
        );
    }

    let genres = catalog
        .genres(kind)
        .await
        .context("Failed to fetch genre list")?;
    let tables = FallbackTables::from_config(&config.featured)?;
    let options = FeaturedOptions::from(&config.featured);

    let assignments = featured::assign_featured(&catalog, kind, &genres, &tables, &options).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&assignments)?);
        return Ok(());
    }

    for entry in assignments.iter() {
        let Some(ref chosen) = entry.featured else {
            println!("{:<24} -", entry.category.name);
            continue;
        };

        let source = match chosen.source {
            FeaturedSource::Primary { page } => format!("page {page}"),
            FeaturedSource::Related { category, page } => {
                format!("related genre {category}, page {page}")
            }
            FeaturedSource::Placeholder => "default image".to_string(),
        };
        println!(
            "{:<24} {} [{}]",
            entry.category.name, chosen.item.title, source
        );
        if let Some(url) = entry.image_url(&config.tmdb.image_base_url) {
            println!("{:<24} {}", "", url);
        }
    }

    Ok(())
}

async fn manage_list(config: &Config, list: SavedList, action: ListAction) -> Result<()> {
    let library = LibraryApi::new(api_client(config)?);

    match action {
        ListAction::List { json } => {
            let titles = with_login_hint(library.list(list).await)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&titles)?);
            } else if titles.is_empty() {
                println!("No {} yet", list);
            } else {
                for title in &titles {
                    println!("{:>8}  {:<5}  {}", title.media_id, title.media_type, title.title);
                }
            }
        }
        ListAction::Add {
            id,
            kind,
            title,
            poster,
        } => {
            let saved = SavedTitle {
                media_id: CatalogItemId::new(id),
                media_type: kind.into(),
                title,
                poster_path: poster,
            };
            with_login_hint(library.add(list, &saved).await)?;
            println!("Added {} to {}", id, list);
        }
        ListAction::Remove { id, kind } => {
            with_login_hint(
                library
                    .remove(list, CatalogItemId::new(id), kind.into())
                    .await,
            )?;
            println!("Removed {} from {}", id, list);
        }
    }

    Ok(())
}

async fn raw_request(config: &Config, method: &str, path: &str, body: Option<&str>) -> Result<()> {
    let method = reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {method}"))?;

    let mut request = ApiRequest::new(method, path);
    if let Some(body) = body {
        let value: serde_json::Value =
            serde_json::from_str(body).context("Request body is not valid JSON")?;
        request = request.with_body(value);
    }

    let client = api_client(config)?;
    let response = with_login_hint(client.send(&request).await)?;
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    println!("{}", status);
    if !text.is_empty() {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            Err(_) => println!("{}", text),
        }
    }

    if !status.is_success() {
        anyhow::bail!("Request failed with {}", status);
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::load_config_or_default(None)?;
            print_summary(&config);
        }
    }

    Ok(())
}

fn print_summary(config: &Config) {
    println!("  API: {}", config.api.base_url);
    println!(
        "  Token file: {}",
        config::token_file_path(config).display()
    );
    println!(
        "  TMDB key configured: {}",
        !config.tmdb.api_key.is_empty()
    );
    println!(
        "  Featured pages: {} own, {} per related genre",
        config.featured.primary_pages, config.featured.related_pages
    );
}
