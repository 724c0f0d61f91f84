//! Test fixture loading utilities

use std::path::PathBuf;

use councilroom_core::CardCatalog;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// The sample card list, loaded from CSV
#[allow(dead_code)]
pub fn sample_catalog() -> CardCatalog {
    CardCatalog::load(fixture_path("card_list.csv")).expect("sample catalog should load")
}
