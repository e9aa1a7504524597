//! Release listing retrieval and caching.
//!
//! # Sub-modules
//!
//! - [`model`] - Release and asset types shared by the API and the cache.
//! - [`client`] - The [`client::ReleaseClient`] boundary and its GitHub
//!   implementation.
//! - [`cache`] - Fetch-once metadata and asset caches.

pub mod cache;
pub mod client;
pub mod model;
