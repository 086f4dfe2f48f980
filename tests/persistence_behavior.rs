//! Behavior-driven tests for on-disk state
//!
//! These tests verify HOW the catalog, the resolution cache, aliases and
//! portfolios survive between runs, and how damaged files are handled.

use std::fs;

use kquote_core::{
    AliasBook, AppPaths, Catalog, CatalogStore, Market, PortfolioBook, ResolutionCache,
    StoreError, Ticker,
};

fn paths() -> (tempfile::TempDir, AppPaths) {
    let temp = tempfile::tempdir().expect("temp dir");
    let paths = AppPaths::rooted(temp.path());
    paths.ensure_dirs().expect("dirs");
    (temp, paths)
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn when_catalog_is_refreshed_system_prefers_the_larger_local_copy() {
    // Given: A scraped catalog bigger than the bundled dataset
    let (_temp, paths) = paths();
    let store = CatalogStore::new(paths.catalog_path());
    let mut scraped = Catalog::bundled().expect("bundled").into_tickers();
    scraped.push(Ticker::new("900999", "새로상장", Market::Kosdaq));

    // When: It is saved and loaded again
    store.save(&scraped).expect("save");
    let loaded = store.load().expect("load");

    // Then: The local copy is used as-is
    assert_eq!(loaded.len(), scraped.len());
    assert!(loaded.find_code("900999").is_some());
    assert!(store.last_updated().expect("stat").is_some());
}

#[test]
fn when_local_catalog_shrank_system_restores_the_bundled_dataset() {
    let (_temp, paths) = paths();
    let store = CatalogStore::new(paths.catalog_path());
    fs::write(store.path(), "005930,삼성전자,KOSPI\n").expect("write");

    let loaded = store.load().expect("load");

    assert_eq!(loaded, Catalog::bundled().expect("bundled"));
}

// =============================================================================
// Resolution cache
// =============================================================================

#[test]
fn when_cache_is_saved_system_writes_data_and_order_document() {
    let (_temp, paths) = paths();
    let mut cache = ResolutionCache::load(paths.cache_path()).expect("empty");
    cache.set("삼전", "005930");
    cache.set("카카오", "035720");

    assert!(cache.save().expect("save"));

    let raw = fs::read_to_string(paths.cache_path()).expect("read");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["data"]["삼전"], "005930");
    assert_eq!(json["order"], serde_json::json!(["카카오", "삼전"]));
}

#[test]
fn when_cache_snapshot_exceeds_capacity_system_trims_it_on_load() {
    let (_temp, paths) = paths();
    let data: serde_json::Map<String, serde_json::Value> = (0..120)
        .map(|i| (format!("term{i:03}"), serde_json::json!(format!("{i:06}"))))
        .collect();
    let order: Vec<String> = (0..120).map(|i| format!("term{i:03}")).collect();
    fs::write(
        paths.cache_path(),
        serde_json::json!({"data": data, "order": order}).to_string(),
    )
    .expect("write");

    let cache = ResolutionCache::load(paths.cache_path()).expect("load");

    assert_eq!(cache.len(), 100);
    assert_eq!(cache.order().next(), Some("term000"));
    assert!(!cache.contains("term100"));
    assert!(cache.is_dirty(), "trimmed snapshot is rewritten on next save");
}

#[test]
fn when_cache_file_is_corrupt_system_reports_where() {
    let (_temp, paths) = paths();
    fs::write(paths.cache_path(), "not json").expect("write");

    let err = ResolutionCache::load(paths.cache_path()).expect_err("corrupt");

    match err {
        StoreError::Json { path, .. } => assert_eq!(path, paths.cache_path()),
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Aliases and portfolios
// =============================================================================

#[test]
fn when_aliases_and_portfolios_are_saved_they_load_in_the_next_run() {
    let (_temp, paths) = paths();

    let mut aliases = AliasBook::load(paths.aliases_path()).expect("empty");
    aliases.set("sam", "005930").expect("valid");
    aliases.save().expect("save");

    let mut portfolios = PortfolioBook::load(paths.portfolios_path()).expect("empty");
    portfolios.set("tech", ["sam", "카카오"]).expect("valid");
    portfolios.save().expect("save");

    let aliases = AliasBook::load(paths.aliases_path()).expect("reload");
    let portfolios = PortfolioBook::load(paths.portfolios_path()).expect("reload");
    assert_eq!(aliases.resolve("sam"), Some("005930"));
    assert_eq!(portfolios.expand(["tech"]), vec!["sam", "카카오"]);
}

#[test]
fn when_alias_is_removed_it_is_gone_after_reload() {
    let (_temp, paths) = paths();
    let mut aliases = AliasBook::load(paths.aliases_path()).expect("empty");
    aliases.set("sam", "005930").expect("valid");
    aliases.set("kakao", "035720").expect("valid");
    aliases.save().expect("save");

    let mut aliases = AliasBook::load(paths.aliases_path()).expect("reload");
    assert!(aliases.remove("sam"));
    aliases.save().expect("save");

    let aliases = AliasBook::load(paths.aliases_path()).expect("reload");
    let nicks: Vec<&str> = aliases.entries().map(|(nick, _)| nick).collect();
    assert_eq!(nicks, vec!["kakao"]);
}
