//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_BASE_URL` - Base URL of the catalog feed API (e.g., <https://chavoya.mx>)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_CATEGORIES_PATH` - Categories feed path (default: /api/categoriasProductos)
//! - `CATALOG_PRODUCTS_PATH` - Products feed path (default: /api/productos)
//! - `CATALOG_BRANDS_PATH` - Brands feed path (default: /api/marca)
//! - `CATALOG_API_TOKEN` - Bearer token sent to the feed API
//! - `CATALOG_CACHE_TTL_SECS` - How long a loaded catalog is reused (default: 300)
//! - `CATALOG_REQUEST_TIMEOUT_SECS` - Per-feed request timeout (default: 30)
//! - `QUOTE_WHATSAPP_NUMBER` - Sales line for quote links (default: 523318937866)
//! - `HERO_IMAGE_URL` - Hero background image (default: /static/images/header.jpg)
//! - `HERO_HEADING` - Hero heading (default: Productos Hidráulicos)
//! - `HERO_SUBHEADING` - Hero subheading (default: Para Optimizar tus Operaciones Industriales)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chavoya_core::quote::DEFAULT_PHONE;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog feed API configuration
    pub catalog: CatalogApiConfig,
    /// Sales line for WhatsApp quote links
    pub quote_phone: String,
    /// Parallax hero content
    pub hero: HeroConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog feed API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL the feed paths are joined to
    pub base_url: Url,
    pub categories_path: String,
    pub products_path: String,
    pub brands_path: String,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// How long a successful load is reused
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("categories_path", &self.categories_path)
            .field("products_path", &self.products_path)
            .field("brands_path", &self.brands_path)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl", &self.cache_ttl)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Content of the parallax hero banner.
#[derive(Debug, Clone)]
pub struct HeroConfig {
    pub image_url: String,
    pub heading: String,
    pub subheading: Option<String>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            image_url: "/static/images/header.jpg".to_string(),
            heading: "Productos Hidráulicos".to_string(),
            subheading: Some("Para Optimizar tus Operaciones Industriales".to_string()),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = parse_env_or_default("STOREFRONT_PORT", 3000_u16)?;

        let catalog = CatalogApiConfig::from_env()?;
        let quote_phone = get_env_or_default("QUOTE_WHATSAPP_NUMBER", DEFAULT_PHONE);
        let hero = HeroConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            catalog,
            quote_phone,
            hero,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_required_env("CATALOG_API_BASE_URL")?)?;
        let api_token = get_optional_env("CATALOG_API_TOKEN")
            .map(|token| {
                validate_secret_strength(&token, "CATALOG_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        Ok(Self {
            base_url,
            categories_path: get_env_or_default(
                "CATALOG_CATEGORIES_PATH",
                "/api/categoriasProductos",
            ),
            products_path: get_env_or_default("CATALOG_PRODUCTS_PATH", "/api/productos"),
            brands_path: get_env_or_default("CATALOG_BRANDS_PATH", "/api/marca"),
            api_token,
            cache_ttl: Duration::from_secs(parse_env_or_default("CATALOG_CACHE_TTL_SECS", 300)?),
            request_timeout: Duration::from_secs(parse_env_or_default(
                "CATALOG_REQUEST_TIMEOUT_SECS",
                30,
            )?),
        })
    }

    /// Configuration pointing at `base_url` with default paths and no token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            categories_path: "/api/categoriasProductos".to_string(),
            products_path: "/api/productos".to_string(),
            brands_path: "/api/marca".to_string(),
            api_token: None,
            cache_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
        })
    }
}

impl HeroConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            image_url: get_optional_env("HERO_IMAGE_URL").unwrap_or(defaults.image_url),
            heading: get_optional_env("HERO_HEADING").unwrap_or(defaults.heading),
            subheading: get_optional_env("HERO_SUBHEADING")
                .or(defaults.subheading)
                .filter(|s| !s.trim().is_empty()),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse the feed API base URL. Only absolute http(s) URLs are accepted.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("CATALOG_API_BASE_URL".to_string(), msg);

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
