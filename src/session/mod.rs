//! Authenticated access to the first-party backend.
//!
//! # Module layout
//!
//! - [`client`] -- [`ApiClient`], the bearer-token client with one-shot
//!   session renewal.
//! - [`request`] -- [`ApiRequest`], the immutable request value it sends.
//! - [`store`] -- [`TokenStore`] and its memory and file implementations.
//! - [`navigator`] -- the redirect side channel used when renewal fails.

pub mod client;
mod error;
pub mod navigator;
pub mod request;
pub mod store;

pub use client::ApiClient;
pub use error::ClientError;
pub use navigator::{ChannelNavigator, LogNavigator, Navigator, LOGIN_ROUTE};
pub use request::ApiRequest;
pub use store::{
    FileTokenStore, MemoryTokenStore, TokenStore, ACCESS_TOKEN_KEY, SESSION_COOKIE_KEY,
};
