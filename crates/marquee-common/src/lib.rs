//! Marquee-Common: Shared types, IDs, and errors.
//!
//! This crate provides common functionality used across marquee:
//!
//! - **Typed IDs**: Integer wrappers for TMDB genre and title identifiers
//! - **Core Types**: Media kinds, genre categories, and catalog entries
//! - **Error Handling**: Session storage errors and a result alias
//!
//! # Examples
//!
//! ```
//! use marquee_common::{CatalogItem, CategoryId, MediaKind};
//!
//! let drama = CategoryId::new(18);
//! let item = CatalogItem::new(1396, "Breaking Bad")
//!     .with_backdrop("/tsRy63Mu5cu8etL1X7ZLyf7UP1M.jpg");
//!
//! assert!(item.has_image());
//! assert_eq!(MediaKind::Tv.as_path(), "tv");
//! assert_eq!(drama.get(), 18);
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
