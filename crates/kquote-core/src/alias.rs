//! User-defined nicknames for codes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, ValidationError};
use crate::json_file;
use crate::resolver::AliasProvider;
use crate::is_valid_code;

/// Nickname to code mapping persisted as a flat JSON object.
#[derive(Debug, Clone, Default)]
pub struct AliasBook {
    path: Option<PathBuf>,
    aliases: BTreeMap<String, String>,
}

impl AliasBook {
    /// In-memory book, mostly useful for tests and one-off lookups.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: None,
            aliases: entries
                .into_iter()
                .map(|(nick, code)| (nick.into(), code.into()))
                .collect(),
        }
    }

    /// Reads the book at `path`; a missing or blank file is an empty book.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let aliases = json_file::read_or_default(&path)?;
        Ok(Self {
            path: Some(path),
            aliases,
        })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => json_file::write_pretty(path, &self.aliases),
            None => Ok(()),
        }
    }

    /// Adds or replaces a nickname. Returns the code it previously pointed at.
    pub fn set(&mut self, nickname: &str, code: &str) -> Result<Option<String>, ValidationError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(ValidationError::EmptyNickname);
        }
        if !is_valid_code(code) {
            return Err(ValidationError::InvalidCode {
                value: code.to_owned(),
            });
        }
        Ok(self.aliases.insert(nickname.to_owned(), code.to_owned()))
    }

    /// Removes a nickname, returning whether it existed.
    pub fn remove(&mut self, nickname: &str) -> bool {
        self.aliases.remove(nickname.trim()).is_some()
    }

    pub fn resolve(&self, nickname: &str) -> Option<&str> {
        self.aliases.get(nickname).map(String::as_str)
    }

    /// All aliases sorted by nickname.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(nick, code)| (nick.as_str(), code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl AliasProvider for AliasBook {
    fn resolve_alias(&self, nickname: &str) -> Option<&str> {
        self.resolve(nickname)
    }
}
