//! Router directory with file-backed caching.
//!
//! The directory page is fetched once and cached to a JSON file; later runs
//! serve from the cache without touching the network unless a refresh is
//! forced. Cache validity is binary (the file either exists or it doesn't);
//! there is no TTL.

mod parser;

pub use parser::{parse_directory, SortOrder};

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use url::Url;

use crate::error_handling::DirectoryError;
use crate::fetch::TextFetcher;
use crate::models::Router;

/// The cached catalog of queryable routers.
pub struct RouterDirectory {
    fetcher: Arc<dyn TextFetcher>,
    directory_url: Url,
    cache_path: PathBuf,
    sort: SortOrder,
}

impl RouterDirectory {
    /// Creates a directory backed by `fetcher`, caching to `cache_path`.
    pub fn new(
        fetcher: Arc<dyn TextFetcher>,
        directory_url: Url,
        cache_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            directory_url,
            cache_path: cache_path.into(),
            sort: SortOrder::default(),
        }
    }

    /// Reads routers from a different sort widget of the directory page.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the router catalog.
    ///
    /// Serves from the cache file when it exists and `force_refresh` is
    /// false, the default path with no network call.
    /// Otherwise fetches the directory page, parses it, overwrites the
    /// cache and returns the fresh list. Fetch and parse failures
    /// propagate so callers can tell "no routers" from "directory
    /// unavailable".
    pub async fn get_routers(&self, force_refresh: bool) -> Result<Vec<Router>, DirectoryError> {
        if !force_refresh && self.cache_path.exists() {
            debug!(
                "Serving router directory from cache {}",
                self.cache_path.display()
            );
            return self.read_cache().await;
        }

        let html = self
            .fetcher
            .fetch_text(self.directory_url.as_str(), &[], None)
            .await?;
        let routers = parser::parse_directory(&html, self.sort)?;
        self.write_cache(&routers).await?;
        info!(
            "Fetched {} routers from {}",
            routers.len(),
            self.directory_url
        );
        Ok(routers)
    }

    /// Looks a router up by its exact identity triple.
    pub async fn find_router(
        &self,
        ixp: &str,
        city: &str,
        country: &str,
        force_refresh: bool,
    ) -> Result<Option<Router>, DirectoryError> {
        let routers = self.get_routers(force_refresh).await?;
        Ok(routers
            .into_iter()
            .find(|router| router.matches(ixp, city, country)))
    }

    async fn read_cache(&self) -> Result<Vec<Router>, DirectoryError> {
        let raw = tokio::fs::read_to_string(&self.cache_path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn write_cache(&self, routers: &[Router]) -> Result<(), DirectoryError> {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(routers)?;
        tokio::fs::write(&self.cache_path, raw).await?;
        Ok(())
    }
}
