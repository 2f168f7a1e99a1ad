//! Repository lookups over a loaded registry view.
//!
//! Lookups are request-scoped: the service re-reads and re-parses its
//! backing source on every query, so there is no shared mutable cache and
//! no cross-request state to guard. Every failure mode degrades to
//! "not found"; load failures and zero-match queries are logged differently
//! but indistinguishable to callers.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::{
    normalizer::normalize_repo_url,
    record::ApiRecord,
    registry::{load_registry_bytes, load_registry_path, RegistryView, SourceFormat}
};

/// Where the lookup service reads its registry from.
#[derive(Debug, Clone)]
pub enum RegistrySource {
    /// A spreadsheet file on disk.
    Path(PathBuf),
    /// An in-memory buffer, e.g. an uploaded or remotely fetched file.
    Bytes {
        /// Raw file contents.
        bytes:  Vec<u8>,
        /// Declared format of the buffer.
        format: SourceFormat
    }
}

/// Finds canonical records for repository URLs in a registry source.
#[derive(Debug, Clone)]
pub struct LookupService {
    source: RegistrySource
}

impl LookupService {
    /// Creates a service backed by a registry file on disk.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>
    {
        Self {
            source: RegistrySource::Path(path.into())
        }
    }

    /// Creates a service backed by an in-memory registry buffer.
    pub fn from_bytes(bytes: Vec<u8>, format: SourceFormat) -> Self {
        Self {
            source: RegistrySource::Bytes {
                bytes,
                format
            }
        }
    }

    /// Returns every canonical record registered for the queried repository.
    ///
    /// The query is normalized before comparison, and `None` is returned
    /// uniformly for an empty query, a registry that cannot be loaded, and a
    /// query with zero matches. An empty query short-circuits before any
    /// parse is attempted.
    pub fn find_by_repository(&self, query_url: &str) -> Option<Vec<ApiRecord>> {
        if query_url.trim().is_empty() {
            debug!("empty query, skipping registry load");
            return None;
        }

        let view = match self.load() {
            Ok(view) => view,
            Err(error) => {
                warn!(%error, "registry unavailable, degrading to not-found");
                return None;
            }
        };

        find_in_view(&view, query_url)
    }

    fn load(&self) -> Result<RegistryView, crate::Error> {
        match &self.source {
            RegistrySource::Path(path) => load_registry_path(path),
            RegistrySource::Bytes {
                bytes,
                format
            } => load_registry_bytes(bytes, *format)
        }
    }
}

/// Looks up a repository in an already-loaded registry view.
///
/// Grouped views answer with a direct key lookup; flat views scan and
/// compare row by row. Matching is exact on the normalized identity; there
/// is no partial or fuzzy matching.
pub fn find_in_view(view: &RegistryView, query_url: &str) -> Option<Vec<ApiRecord>> {
    let normalized = normalize_repo_url(query_url);
    if normalized.is_empty() {
        return None;
    }

    match view {
        RegistryView::Grouped(groups) => {
            let records = groups.get(&normalized)?;
            debug!(query = %normalized, matches = records.len(), "grouped lookup");
            if records.is_empty() {
                None
            } else {
                Some(records.to_vec())
            }
        }
        RegistryView::Flat(table) => match table.find(query_url) {
            Ok(records) if records.is_empty() => None,
            Ok(records) => Some(records),
            Err(error) => {
                warn!(%error, "flat table unusable, degrading to not-found");
                None
            }
        }
    }
}
