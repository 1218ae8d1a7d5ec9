use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use marquee_common::MediaKind;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Movie and TV discovery client")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick one featured title per genre, without repeats
    Featured {
        /// Catalog to browse
        #[arg(long, value_enum, default_value = "tv")]
        kind: KindArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account and store the session token
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// End the session and forget the stored token
    Logout,

    /// Manage favorite titles
    Favorites {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Manage the watch-later list
    WatchLater {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Send an authenticated request to the backend and print the response
    Request {
        /// HTTP method
        method: String,

        /// Path relative to the API base URL
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Show saved titles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a title
    Add {
        /// TMDB id of the title
        id: i64,

        #[arg(long, value_enum, default_value = "tv")]
        kind: KindArg,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long)]
        poster: Option<String>,
    },

    /// Remove a saved title
    Remove {
        /// TMDB id of the title
        id: i64,

        #[arg(long, value_enum, default_value = "tv")]
        kind: KindArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Tv,
    Movie,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tv => MediaKind::Tv,
            KindArg::Movie => MediaKind::Movie,
        }
    }
}
