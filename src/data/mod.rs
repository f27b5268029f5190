//! Core data models for the item lookup service
//!
//! This module contains the normalized product record returned to callers and
//! the verbosity tier used when querying the catalog.

pub mod response_group;

pub use response_group::ResponseGroup;

use serde::{Deserialize, Serialize};

/// Normalized product record
///
/// The flattened, catalog-agnostic representation returned to callers and
/// stored in the cache. Every field is plain text; anything the catalog did not
/// provide is an empty string, and keys missing from a stored record read back
/// as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Item {
    /// Catalog identifier (stable external key)
    #[serde(rename = "ASIN")]
    pub asin: String,
    pub brand: String,
    pub creator: String,
    pub manufacturer: String,
    pub publisher: String,
    pub release_date: String,
    pub studio: String,
    pub title: String,
    /// Detail page URL
    #[serde(rename = "URL")]
    pub url: String,
    pub small_image: String,
    pub medium_image: String,
    pub large_image: String,
}
