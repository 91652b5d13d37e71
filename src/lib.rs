//! Postwatch - polls tracked publishing accounts for new content.
//!
//! This crate tracks remote accounts, merges their posts and comment threads
//! into a local cache, and notifies on new posts and on the account owner's
//! own comments and replies, with clean architecture layering.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing sync cycles and services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "postwatch";
