//! Catalog loading.
//!
//! Catalogs are read once at startup and cached for the session. A
//! missing or malformed document degrades to the empty catalog with a
//! warning: the game stays playable, narrative advancement simply stops
//! matching anything.

use std::path::Path;

use tracing::warn;

use crate::blurbs::BlurbCatalog;
use crate::rules::RuleCatalog;

/// Parses a progression rule catalog from YAML, degrading to empty on
/// parse failure.
#[must_use]
pub fn parse_rules(text: &str) -> RuleCatalog {
    match serde_yaml::from_str(text) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(%err, "malformed progression rule catalog; using empty catalog");
            RuleCatalog::default()
        }
    }
}

/// Parses a blurb catalog from YAML, degrading to empty on parse failure.
#[must_use]
pub fn parse_blurbs(text: &str) -> BlurbCatalog {
    match serde_yaml::from_str(text) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(%err, "malformed blurb catalog; using empty catalog");
            BlurbCatalog::default()
        }
    }
}

/// Loads the progression rule catalog from `path`, degrading to empty if
/// the file is unreadable or malformed.
#[must_use]
pub fn load_rules(path: &Path) -> RuleCatalog {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_rules(&text),
        Err(err) => {
            warn!(path = %path.display(), %err, "progression rule catalog unreadable; using empty catalog");
            RuleCatalog::default()
        }
    }
}

/// Loads the blurb catalog from `path`, degrading to empty if the file
/// is unreadable or malformed.
#[must_use]
pub fn load_blurbs(path: &Path) -> BlurbCatalog {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_blurbs(&text),
        Err(err) => {
            warn!(path = %path.display(), %err, "blurb catalog unreadable; using empty catalog");
            BlurbCatalog::default()
        }
    }
}
