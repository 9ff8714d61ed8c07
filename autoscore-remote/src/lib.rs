//! HTTP client for the hosted review catalog.
//!
//! The catalog is exposed as a PostgREST-style API: three stored
//! procedures under `rpc/` for slug resolution and listings, and the
//! `reviews` table for exact-match review queries. [`RemoteStore`]
//! implements the review store contract on top of it.

pub mod client;
pub mod config;
pub mod error;
pub mod rows;

pub use client::RemoteStore;
pub use config::{ConfigSource, ConfigSources, RemoteConfig, config_path, config_sources};
pub use error::RemoteError;
