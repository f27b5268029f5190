//! Remote product catalog access
//!
//! The lookup service talks to the catalog only through the [`Catalog`] trait,
//! so request handling never depends on a particular API client. The
//! Product Advertising API implementation lives in [`paapi`].

pub mod locale;
pub mod paapi;
mod signing;

pub use locale::{locale_for, Locale, LOCALES};
pub use paapi::{Credentials, PaapiClient};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::data::{Item, ResponseGroup};

/// Errors that can occur when querying the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed; the message carries every underlying cause
    #[error("HTTP request failed: {}", with_causes(.0))]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("catalog API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request could not be signed
    #[error("Failed to sign catalog request: {0}")]
    Signing(String),
}

/// Renders an error followed by its `source()` chain, joined by `": "`
///
/// Causes already spelled out in the outer message are skipped.
pub fn with_causes(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Kind of identifier being looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdType {
    #[default]
    Asin,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Asin => "ASIN",
        }
    }
}

/// Parameters of a single item lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub item_id: String,
    pub id_type: IdType,
    pub response_group: ResponseGroup,
}

impl LookupRequest {
    /// Creates an ASIN lookup at the given verbosity tier
    pub fn asin(item_id: impl Into<String>, response_group: ResponseGroup) -> Self {
        Self {
            item_id: item_id.into(),
            id_type: IdType::Asin,
            response_group,
        }
    }
}

/// A remote product catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Looks up the item described by `request`
    ///
    /// Returns every item the catalog matched, which may be none.
    async fn item_lookup(&self, request: &LookupRequest)
        -> Result<Vec<CatalogItem>, CatalogError>;
}

/// An item as the catalog returns it
///
/// Only the attributes the normalized record needs are decoded; everything is
/// optional and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CatalogItem {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "DetailPageURL")]
    pub detail_page_url: String,
    pub item_info: ItemInfo,
    pub images: Images,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ItemInfo {
    pub title: DisplayValue,
    pub by_line_info: ByLineInfo,
    pub content_info: ContentInfo,
    pub product_info: ProductInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ByLineInfo {
    pub brand: DisplayValue,
    pub manufacturer: DisplayValue,
    pub contributors: Vec<Contributor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Contributor {
    pub name: String,
    pub role: String,
    pub role_type: String,
}

impl Contributor {
    fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role) || self.role_type.eq_ignore_ascii_case(role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContentInfo {
    pub publication_date: DisplayValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductInfo {
    pub release_date: DisplayValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Images {
    pub primary: ImageSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ImageSet {
    pub small: Image,
    pub medium: Image,
    pub large: Image,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(rename = "URL")]
    pub url: String,
}

/// A localized text attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DisplayValue {
    pub display_value: String,
}

impl DisplayValue {
    fn text(&self) -> String {
        self.display_value.clone()
    }
}

const PUBLISHER_ROLE: &str = "Publisher";
const STUDIO_ROLE: &str = "Studio";

/// Projects a catalog item into the normalized record
///
/// Missing attributes become empty strings. `requested_id` stands in for the
/// identifier if the catalog omitted it.
pub fn normalize(item: &CatalogItem, requested_id: &str) -> Item {
    let info = &item.item_info;
    let by_line = &info.by_line_info;

    let contributor_with = |role: &str| {
        by_line
            .contributors
            .iter()
            .find(|c| c.has_role(role))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    };

    let creator = by_line
        .contributors
        .iter()
        .find(|c| !c.has_role(PUBLISHER_ROLE) && !c.has_role(STUDIO_ROLE))
        .map(|c| c.name.clone())
        .unwrap_or_default();

    let release_date = if info.product_info.release_date.display_value.is_empty() {
        info.content_info.publication_date.text()
    } else {
        info.product_info.release_date.text()
    };

    let asin = if item.asin.is_empty() {
        requested_id.to_string()
    } else {
        item.asin.clone()
    };

    Item {
        asin,
        brand: by_line.brand.text(),
        creator,
        manufacturer: by_line.manufacturer.text(),
        publisher: contributor_with(PUBLISHER_ROLE),
        release_date,
        studio: contributor_with(STUDIO_ROLE),
        title: info.title.text(),
        url: item.detail_page_url.clone(),
        small_image: item.images.primary.small.url.clone(),
        medium_image: item.images.primary.medium.url.clone(),
        large_image: item.images.primary.large.url.clone(),
    }
}
