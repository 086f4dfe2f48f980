//! Named groups of terms.
//!
//! A portfolio name passed where a stock term is expected expands into the
//! portfolio's items. Items may themselves be aliases, codes or names; they
//! are resolved afterwards like any other term. Expansion is one level deep.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, ValidationError};
use crate::json_file;

#[derive(Debug, Clone, Default)]
pub struct PortfolioBook {
    path: Option<PathBuf>,
    portfolios: BTreeMap<String, Vec<String>>,
}

impl PortfolioBook {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let portfolios = json_file::read_or_default(&path)?;
        Ok(Self {
            path: Some(path),
            portfolios,
        })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => json_file::write_pretty(path, &self.portfolios),
            None => Ok(()),
        }
    }

    /// Creates or overwrites a portfolio. Blank items are dropped.
    ///
    /// Returns the number of items stored.
    pub fn set<I, S>(&mut self, name: &str, items: I) -> Result<usize, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyPortfolioName);
        }

        let items: Vec<String> = items
            .into_iter()
            .map(|item| item.as_ref().trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect();
        if items.is_empty() {
            return Err(ValidationError::NoTerms);
        }

        let count = items.len();
        self.portfolios.insert(name.to_owned(), items);
        Ok(count)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.portfolios.remove(name.trim()).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.portfolios.get(name).map(Vec::as_slice)
    }

    /// All portfolios sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.portfolios
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replaces every term naming a portfolio with that portfolio's items.
    pub fn expand<I, S>(&self, terms: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expanded = Vec::new();
        for term in terms {
            let term = term.as_ref();
            match self.portfolios.get(term) {
                Some(items) => expanded.extend(items.iter().cloned()),
                None => expanded.push(term.to_owned()),
            }
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> PortfolioBook {
        let mut book = PortfolioBook::default();
        book.set("tech", ["삼전", "카카오", "035420"]).expect("valid");
        book.set("banks", ["카카오뱅크"]).expect("valid");
        book
    }

    #[test]
    fn expand_replaces_portfolio_names_in_place() {
        let expanded = book().expand(["005930", "tech", "SK하이닉스", "banks"]);

        assert_eq!(
            expanded,
            vec!["005930", "삼전", "카카오", "035420", "SK하이닉스", "카카오뱅크"]
        );
    }

    #[test]
    fn expansion_is_not_recursive() {
        let mut book = PortfolioBook::default();
        book.set("outer", ["inner"]).expect("valid");
        book.set("inner", ["005930"]).expect("valid");

        assert_eq!(book.expand(["outer"]), vec!["inner"]);
    }

    #[test]
    fn set_trims_and_rejects_empty_input() {
        let mut book = PortfolioBook::default();

        assert_eq!(book.set(" mine ", [" 삼전 ", "", "  "]), Ok(1));
        assert_eq!(book.get("mine"), Some(&["삼전".to_owned()][..]));
        assert_eq!(book.set("", ["삼전"]), Err(ValidationError::EmptyPortfolioName));
        assert_eq!(book.set("empty", ["  "]), Err(ValidationError::NoTerms));
    }

    #[test]
    fn set_overwrites_and_remove_reports_existence() {
        let mut book = book();

        book.set("tech", ["000660"]).expect("valid");
        assert_eq!(book.get("tech").map(<[String]>::len), Some(1));
        assert!(book.remove("tech"));
        assert!(!book.remove("tech"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn round_trips_through_disk() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("portfolios.json");

        let mut stored = PortfolioBook::load(&path).expect("missing file loads empty");
        stored.set("tech", ["삼전", "카카오"]).expect("valid");
        stored.save().expect("save");

        let reloaded = PortfolioBook::load(&path).expect("reload");
        let names: Vec<&str> = reloaded.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["tech"]);
        assert_eq!(reloaded.expand(["tech"]), vec!["삼전", "카카오"]);
    }
}
