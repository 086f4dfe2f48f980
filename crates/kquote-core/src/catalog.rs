//! The ticker catalog and its CSV persistence.
//!
//! The catalog is stored as headerless `code,name,market` rows. A bundled copy
//! ships inside the binary; it seeds the local file on first use and replaces
//! any local copy that has fewer entries than itself.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::Ticker;

const BUNDLED_CATALOG_CSV: &str = include_str!("../data/master_tickers.csv");

/// Ordered, immutable list of tickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tickers: Vec<Ticker>,
}

impl Catalog {
    pub fn new(tickers: Vec<Ticker>) -> Self {
        Self { tickers }
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self, StoreError> {
        parse_rows(BUNDLED_CATALOG_CSV.as_bytes())
            .map(Self::new)
            .map_err(|error| StoreError::BundledCatalog(error.to_string()))
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn find_code(&self, code: &str) -> Option<&Ticker> {
        self.tickers.iter().find(|ticker| ticker.code == code)
    }

    pub fn into_tickers(self) -> Vec<Ticker> {
        self.tickers
    }
}

/// Drops repeated codes, keeping the first occurrence and the original order.
pub fn dedup_by_code(tickers: Vec<Ticker>) -> Vec<Ticker> {
    let mut seen = HashSet::with_capacity(tickers.len());
    tickers
        .into_iter()
        .filter(|ticker| seen.insert(ticker.code.clone()))
        .collect()
}

/// Anything that can hand the resolver a catalog on demand.
pub trait CatalogSource {
    fn load_catalog(&self) -> Result<Catalog, StoreError>;
}

impl CatalogSource for Catalog {
    fn load_catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self.clone())
    }
}

/// File-backed catalog persistence.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the local catalog, falling back to the bundled dataset.
    ///
    /// A missing local file, or one with fewer entries than the bundled
    /// dataset, is replaced by the bundled dataset and rewritten to disk.
    /// A failed rewrite is logged and does not fail the load.
    pub fn load(&self) -> Result<Catalog, StoreError> {
        let bundled = Catalog::bundled()?;

        let local = match fs::File::open(&self.path) {
            Ok(file) => {
                parse_rows(file).map_err(|source| StoreError::csv(&self.path, source))?
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(error) => return Err(StoreError::io(&self.path, error)),
        };

        if local.len() >= bundled.len() {
            debug!(path = %self.path.display(), tickers = local.len(), "loaded local catalog");
            return Ok(Catalog::new(local));
        }

        info!(
            local = local.len(),
            bundled = bundled.len(),
            "local catalog is smaller than the bundled dataset; using bundled copy"
        );
        if let Err(error) = self.save(bundled.tickers()) {
            warn!(%error, "failed to refresh local catalog from bundled dataset");
        }
        Ok(bundled)
    }

    /// Overwrites the local catalog.
    pub fn save(&self, tickers: &[Ticker]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::io(parent, source))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|source| StoreError::csv(&self.path, source))?;

        for ticker in tickers {
            writer
                .write_record([
                    ticker.code.as_str(),
                    ticker.name.as_str(),
                    ticker.market.as_str(),
                ])
                .map_err(|source| StoreError::csv(&self.path, source))?;
        }

        writer
            .flush()
            .map_err(|source| StoreError::io(&self.path, source))
    }

    /// Modification time of the local catalog, `None` when it does not exist.
    pub fn last_updated(&self) -> Result<Option<OffsetDateTime>, StoreError> {
        match fs::metadata(&self.path) {
            Ok(metadata) => {
                let modified = metadata
                    .modified()
                    .map_err(|source| StoreError::io(&self.path, source))?;
                Ok(Some(OffsetDateTime::from(modified)))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StoreError::io(&self.path, error)),
        }
    }
}

impl CatalogSource for CatalogStore {
    fn load_catalog(&self) -> Result<Catalog, StoreError> {
        self.load()
    }
}

fn parse_rows<R: io::Read>(input: R) -> Result<Vec<Ticker>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 3 {
            continue;
        }
        match Ticker::parse(&record[0], &record[1], &record[2]) {
            Ok(ticker) => tickers.push(ticker),
            Err(error) => debug!(%error, "skipping malformed catalog row"),
        }
    }
    Ok(tickers)
}
