//! Marquee - movie and TV discovery client
//!
//! This library crate exposes the core functionality for integration testing.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod featured;
pub mod session;
