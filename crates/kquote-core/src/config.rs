//! On-disk locations for user state.
//!
//! | Directory | Files | Override | XDG fallback | Default |
//! |-----------|-------|----------|--------------|---------|
//! | config | `aliases.json`, `portfolios.json` | `KQUOTE_CONFIG_HOME` | `$XDG_CONFIG_HOME/kquote` | `~/.config/kquote` |
//! | data | `master_tickers.csv` | `KQUOTE_DATA_HOME` | `$XDG_DATA_HOME/kquote` | `~/.local/share/kquote` |
//! | cache | `cache.json` | `KQUOTE_CACHE_HOME` | `$XDG_CACHE_HOME/kquote` | `~/.cache/kquote` |

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub const ALIASES_FILE_NAME: &str = "aliases.json";
pub const PORTFOLIOS_FILE_NAME: &str = "portfolios.json";
pub const CATALOG_FILE_NAME: &str = "master_tickers.csv";
pub const CACHE_FILE_NAME: &str = "cache.json";

const APP_DIR: &str = "kquote";

/// Resolved directories for one program run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl AppPaths {
    /// Resolve directories from the environment.
    pub fn from_env() -> Self {
        Self {
            config_dir: resolve_dir("KQUOTE_CONFIG_HOME", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve_dir("KQUOTE_DATA_HOME", "XDG_DATA_HOME", &[".local", "share"]),
            cache_dir: resolve_dir("KQUOTE_CACHE_HOME", "XDG_CACHE_HOME", &[".cache"]),
        }
    }

    /// Place all three directories under one root (`root/config`, `root/data`, `root/cache`).
    pub fn rooted(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            cache_dir: root.join("cache"),
        }
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.config_dir.join(ALIASES_FILE_NAME)
    }

    pub fn portfolios_path(&self) -> PathBuf {
        self.config_dir.join(PORTFOLIOS_FILE_NAME)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE_NAME)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    /// Create every directory that does not exist yet.
    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        for dir in [&self.config_dir, &self.data_dir, &self.cache_dir] {
            fs::create_dir_all(dir).map_err(|source| StoreError::io(dir, source))?;
        }
        Ok(())
    }
}

fn resolve_dir(override_var: &str, xdg_var: &str, home_suffix: &[&str]) -> PathBuf {
    if let Some(path) = non_empty_var(override_var) {
        return PathBuf::from(path);
    }

    if let Some(path) = non_empty_var(xdg_var) {
        return PathBuf::from(path).join(APP_DIR);
    }

    let mut dir = home_dir();
    for part in home_suffix {
        dir.push(part);
    }
    dir.join(APP_DIR)
}

fn home_dir() -> PathBuf {
    if let Some(home) = non_empty_var("HOME") {
        return PathBuf::from(home);
    }
    if let Some(profile) = non_empty_var("USERPROFILE") {
        return PathBuf::from(profile);
    }
    PathBuf::from(".")
}

fn non_empty_var(name: &str) -> Option<std::ffi::OsString> {
    env::var_os(name).filter(|value| !value.is_empty())
}
