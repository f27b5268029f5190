//! Command-line interface parsing for item-lookup
//!
//! Every flag can also be supplied through an environment variable. Values
//! are validated while parsing, so a successfully parsed [`Cli`] always turns
//! into a usable [`ServiceConfig`].

use clap::Parser;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::catalog::{locale_for, Credentials, Locale};
use crate::data::ResponseGroup;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A credential was given but is blank
    #[error("{0} must not be empty")]
    BlankCredential(&'static str),

    /// The marketplace code is not recognized
    #[error("Invalid domain: '{0}'. Valid domains: AU, BR, CA, DE, ES, FR, IN, IT, JP, MX, UK, US")]
    UnknownDomain(String),

    /// The response group is not recognized
    #[error("Invalid response group: '{0}'. Valid response groups: Small, Medium, Large")]
    UnknownResponseGroup(String),
}

/// item-lookup - look up catalog items over HTTP
#[derive(Parser, Debug)]
#[command(name = "item-lookup")]
#[command(about = "HTTP service that looks up catalog items by ASIN and caches them as JSON")]
#[command(version)]
pub struct Cli {
    /// API access key
    #[arg(long, env = "PAAPI_ACCESS_KEY", value_parser = parse_access_key, hide_env_values = true)]
    pub access: String,

    /// API secret key
    #[arg(long, env = "PAAPI_SECRET_KEY", value_parser = parse_secret_key, hide_env_values = true)]
    pub secret: String,

    /// Associate partner tag
    #[arg(long, env = "PAAPI_PARTNER_TAG", value_parser = parse_partner_tag)]
    pub tag: String,

    /// Marketplace domain code
    #[arg(long, env = "PAAPI_DOMAIN", default_value = "JP", value_parser = parse_domain_arg)]
    pub domain: Locale,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory for the JSON cache; caching is disabled when unset or empty
    #[arg(long = "cache-dir", env = "ITEM_CACHE_DIR")]
    pub cache_dir: Option<String>,

    /// Catalog response detail level
    #[arg(
        long = "response-group",
        env = "PAAPI_RESPONSE_GROUP",
        default_value = "Large",
        value_parser = parse_response_group_arg
    )]
    pub response_group: ResponseGroup,
}

/// Settings the service is started with
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub credentials: Credentials,
    pub locale: Locale,
    pub port: u16,
    pub cache: Option<CacheManager>,
    pub response_group: ResponseGroup,
}

/// Parses a marketplace domain code into its locale
pub fn parse_domain_arg(s: &str) -> Result<Locale, CliError> {
    locale_for(s)
        .copied()
        .ok_or_else(|| CliError::UnknownDomain(s.to_string()))
}

/// Parses a response group name
pub fn parse_response_group_arg(s: &str) -> Result<ResponseGroup, CliError> {
    ResponseGroup::from_str(s).ok_or_else(|| CliError::UnknownResponseGroup(s.to_string()))
}

fn non_blank(s: &str, name: &'static str) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(CliError::BlankCredential(name))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_access_key(s: &str) -> Result<String, CliError> {
    non_blank(s, "access key")
}

fn parse_secret_key(s: &str) -> Result<String, CliError> {
    non_blank(s, "secret key")
}

fn parse_partner_tag(s: &str) -> Result<String, CliError> {
    non_blank(s, "partner tag")
}

impl ServiceConfig {
    /// Creates a ServiceConfig from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let cache = cli
            .cache_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(CacheManager::with_dir);

        ServiceConfig {
            credentials: Credentials {
                access_key: cli.access.clone(),
                secret_key: cli.secret.clone(),
                partner_tag: cli.tag.clone(),
            },
            locale: cli.domain,
            port: cli.port,
            cache,
            response_group: cli.response_group,
        }
    }
}
