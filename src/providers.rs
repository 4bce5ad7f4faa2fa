//! Seams to the external collaborators the assistant talks to.
//!
//! Implementations may block on the network. An `Err` is never shown to the
//! user; the assistant logs it and renders the same text as "not found".
use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AnimeResult, Metadata, WatchOptions};

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up canonical facts for a free-text title. `Ok(None)` means not found.
    async fn search_metadata(&self, title: &str) -> Result<Option<Metadata>>;

    /// Every movie matching a free-text query (title or genre). Providers
    /// that only resolve single titles fall back to `search_metadata`.
    async fn search_movies(&self, query: &str) -> Result<Vec<Metadata>> {
        Ok(self.search_metadata(query).await?.into_iter().collect())
    }
}

#[async_trait]
pub trait AnimeProvider: Send + Sync {
    async fn search_anime(&self, query: &str) -> Result<Vec<AnimeResult>>;
}

#[async_trait]
pub trait WatchResolver: Send + Sync {
    async fn get_watch_options(
        &self,
        title: &str,
        year: Option<i32>,
        genre: &str,
    ) -> Result<WatchOptions>;
}
