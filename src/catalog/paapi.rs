//! Product Advertising API 5.0 client
//!
//! Implements [`Catalog`] with signed `GetItems` calls. No timeouts or retries
//! are applied; a transport failure is returned as-is.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::locale::Locale;
use super::signing::{amz_date, RequestSigner};
use super::{Catalog, CatalogError, CatalogItem, LookupRequest};
use crate::data::ResponseGroup;

const SERVICE_NAME: &str = "ProductAdvertisingAPI";
const GET_ITEMS_PATH: &str = "/paapi5/getitems";
const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";
const CONTENT_ENCODING: &str = "amz-1.0";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const PARTNER_TYPE: &str = "Associates";

const SMALL_RESOURCES: &[&str] = &["ItemInfo.Title"];

const MEDIUM_RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "ItemInfo.ByLineInfo",
    "ItemInfo.ContentInfo",
    "ItemInfo.ProductInfo",
    "Images.Primary.Small",
];

const LARGE_RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "ItemInfo.ByLineInfo",
    "ItemInfo.ContentInfo",
    "ItemInfo.ProductInfo",
    "Images.Primary.Small",
    "Images.Primary.Medium",
    "Images.Primary.Large",
];

/// Catalog resources requested for a verbosity tier
pub fn resources_for(group: ResponseGroup) -> &'static [&'static str] {
    match group {
        ResponseGroup::Small => SMALL_RESOURCES,
        ResponseGroup::Medium => MEDIUM_RESOURCES,
        ResponseGroup::Large => LARGE_RESOURCES,
    }
}

/// API credentials and affiliate tag
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub partner_tag: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("partner_tag", &self.partner_tag)
            .finish()
    }
}

/// `GetItems` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetItemsRequest<'a> {
    item_ids: [&'a str; 1],
    item_id_type: &'a str,
    partner_tag: &'a str,
    partner_type: &'a str,
    marketplace: &'a str,
    resources: &'a [&'a str],
}

/// `GetItems` response body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct GetItemsResponse {
    items_result: Option<ItemsResult>,
    errors: Vec<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ItemsResult {
    items: Vec<CatalogItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ApiError {
    code: String,
    message: String,
}

impl GetItemsResponse {
    fn first_error(&self) -> Option<String> {
        self.errors
            .first()
            .map(|e| format!("{}: {}", e.code, e.message))
    }
}

/// Client for the Product Advertising API
#[derive(Debug, Clone)]
pub struct PaapiClient {
    http_client: Client,
    signer: RequestSigner,
    partner_tag: String,
    marketplace: String,
    endpoint: Url,
}

impl PaapiClient {
    /// Creates a client for the given marketplace
    pub fn new(credentials: Credentials, locale: &Locale) -> Result<Self, CatalogError> {
        let endpoint = Url::parse(&format!("https://{}{}", locale.host, GET_ITEMS_PATH))
            .map_err(|e| CatalogError::Signing(format!("invalid endpoint: {}", e)))?;

        Ok(Self {
            http_client: Client::new(),
            signer: RequestSigner::new(
                credentials.access_key,
                credentials.secret_key,
                locale.region,
                SERVICE_NAME,
            ),
            partner_tag: credentials.partner_tag,
            marketplace: locale.marketplace.to_string(),
            endpoint,
        })
    }

    /// Points the client at a different base URL (e.g. a local stub or proxy)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, CatalogError> {
        self.endpoint = Url::parse(base_url)
            .and_then(|base| base.join(GET_ITEMS_PATH))
            .map_err(|e| CatalogError::Signing(format!("invalid endpoint: {}", e)))?;
        Ok(self)
    }

    fn request_body(&self, request: &LookupRequest) -> Result<Vec<u8>, CatalogError> {
        let body = GetItemsRequest {
            item_ids: [request.item_id.as_str()],
            item_id_type: request.id_type.as_str(),
            partner_tag: &self.partner_tag,
            partner_type: PARTNER_TYPE,
            marketplace: &self.marketplace,
            resources: resources_for(request.response_group),
        };
        Ok(serde_json::to_vec(&body)?)
    }

    /// Value of the `host` header hyper will send for the endpoint
    fn host_header(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

#[async_trait]
impl Catalog for PaapiClient {
    async fn item_lookup(
        &self,
        request: &LookupRequest,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let payload = self.request_body(request)?;
        let now = Utc::now();
        let amz_date = amz_date(now);
        let host = self.host_header();

        let headers = [
            ("content-encoding", CONTENT_ENCODING),
            ("content-type", CONTENT_TYPE),
            ("host", host.as_str()),
            ("x-amz-date", amz_date.as_str()),
            ("x-amz-target", GET_ITEMS_TARGET),
        ];
        let authorization =
            self.signer
                .authorization("POST", self.endpoint.path(), &headers, &payload, now)?;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header("content-encoding", CONTENT_ENCODING)
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-date", &amz_date)
            .header("x-amz-target", GET_ITEMS_TARGET)
            .header("authorization", authorization)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GetItemsResponse>(&text)
                .ok()
                .and_then(|r| r.first_error())
                .unwrap_or(text);
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GetItemsResponse = serde_json::from_str(&text)?;
        if let Some(error) = parsed.first_error() {
            debug!(item_id = %request.item_id, %error, "catalog reported item errors");
        }

        Ok(parsed.items_result.map(|r| r.items).unwrap_or_default())
    }
}
