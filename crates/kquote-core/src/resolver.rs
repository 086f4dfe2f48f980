//! Turning arbitrary user terms into codes.
//!
//! Each term passes through four stages and the first hit wins:
//!
//! 1. alias lookup
//! 2. direct code (six ASCII letters or digits, taken as-is)
//! 3. resolution cache
//! 4. fuzzy search over the catalog, written back into the cache
//!
//! The catalog is loaded lazily on the first fuzzy fallback and shared by the
//! rest of the batch. Nothing here touches the disk except that one catalog
//! load; persisting the cache is left to the caller.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::ResolutionCache;
use crate::catalog::{Catalog, CatalogSource};
use crate::error::StoreError;
use crate::fuzzy::find_tickers;
use crate::is_valid_code;

/// Read-only nickname lookup.
pub trait AliasProvider {
    fn resolve_alias(&self, nickname: &str) -> Option<&str>;
}

impl AliasProvider for HashMap<String, String> {
    fn resolve_alias(&self, nickname: &str) -> Option<&str> {
        self.get(nickname).map(String::as_str)
    }
}

impl AliasProvider for BTreeMap<String, String> {
    fn resolve_alias(&self, nickname: &str) -> Option<&str> {
        self.get(nickname).map(String::as_str)
    }
}

/// How a term was turned into a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Resolution {
    Alias { code: String },
    Direct { code: String },
    Cached { code: String },
    Searched { code: String, name: String },
    Unresolved,
}

impl Resolution {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Alias { code }
            | Self::Direct { code }
            | Self::Cached { code }
            | Self::Searched { code, .. } => Some(code),
            Self::Unresolved => None,
        }
    }

    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Alias { .. } => "alias",
            Self::Direct { .. } => "code",
            Self::Cached { .. } => "cache",
            Self::Searched { .. } => "search",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Outcome of resolving several terms at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResolution {
    /// Distinct codes in first-seen order, at most `max_results` of them.
    pub codes: Vec<String>,
    /// Terms no stage could resolve, in input order.
    pub unresolved: Vec<String>,
    /// Distinct codes dropped because of the result limit.
    pub discarded: usize,
}

enum CatalogState {
    NotLoaded,
    Loaded(Catalog),
    Failed(StoreError),
}

/// Resolution pass over one batch of terms.
pub struct Resolver<'a> {
    aliases: &'a dyn AliasProvider,
    catalog_source: &'a dyn CatalogSource,
    cache: Option<&'a mut ResolutionCache>,
    catalog: CatalogState,
}

impl<'a> Resolver<'a> {
    /// Resolver without a cache stage.
    pub fn new(aliases: &'a dyn AliasProvider, catalog_source: &'a dyn CatalogSource) -> Self {
        Self {
            aliases,
            catalog_source,
            cache: None,
            catalog: CatalogState::NotLoaded,
        }
    }

    /// Enables the cache stage and fuzzy write-through.
    pub fn with_cache(mut self, cache: &'a mut ResolutionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn resolve(&mut self, term: &str) -> Resolution {
        let term = term.trim();
        if term.is_empty() {
            return Resolution::Unresolved;
        }

        if let Some(code) = self.aliases.resolve_alias(term) {
            return Resolution::Alias {
                code: code.to_owned(),
            };
        }

        if is_valid_code(term) {
            return Resolution::Direct {
                code: term.to_owned(),
            };
        }

        if let Some(code) = self.cache.as_deref_mut().and_then(|cache| cache.get(term)) {
            return Resolution::Cached { code };
        }

        let Some(catalog) = self.catalog() else {
            return Resolution::Unresolved;
        };
        let Some(best) = find_tickers(catalog.tickers(), term).into_iter().next() else {
            debug!(term, "no catalog entry matched");
            return Resolution::Unresolved;
        };

        if let Some(cache) = self.cache.as_deref_mut() {
            cache.set(term, &best.code);
        }
        Resolution::Searched {
            code: best.code,
            name: best.name,
        }
    }

    /// Resolves `terms` in order, dropping repeated codes and capping the result.
    pub fn resolve_batch<I, S>(&mut self, terms: I, max_results: usize) -> BatchResolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = BatchResolution::default();
        let mut seen = HashSet::new();

        for term in terms {
            let term = term.as_ref();
            match self.resolve(term) {
                Resolution::Unresolved => batch.unresolved.push(term.to_owned()),
                resolution => {
                    if let Some(code) = resolution.code() {
                        if seen.insert(code.to_owned()) {
                            batch.codes.push(code.to_owned());
                        }
                    }
                }
            }
        }

        if batch.codes.len() > max_results {
            batch.discarded = batch.codes.len() - max_results;
            batch.codes.truncate(max_results);
        }
        batch
    }

    /// Error from the catalog load of this pass, if it failed.
    pub fn catalog_error(&self) -> Option<&StoreError> {
        match &self.catalog {
            CatalogState::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn catalog(&mut self) -> Option<&Catalog> {
        if matches!(self.catalog, CatalogState::NotLoaded) {
            self.catalog = match self.catalog_source.load_catalog() {
                Ok(catalog) => {
                    debug!(tickers = catalog.len(), "catalog loaded for fuzzy search");
                    CatalogState::Loaded(catalog)
                }
                Err(error) => {
                    warn!(%error, "could not load ticker catalog; name search disabled");
                    CatalogState::Failed(error)
                }
            };
        }
        match &self.catalog {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }
}
