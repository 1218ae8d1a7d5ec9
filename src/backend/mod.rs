//! Typed wrappers over the first-party backend.
//!
//! - [`auth`] -- login, registration, and logout; these are the calls that
//!   put a token into the session store and take it out again.
//! - [`library`] -- the user's favorites and watch-later lists.

pub mod auth;
pub mod library;

pub use auth::{AuthApi, Credentials, Registration};
pub use library::{LibraryApi, SavedList, SavedTitle};
