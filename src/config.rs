//! Configuration types
//!
//! The user-supplied source configuration, the HTTP settings derived from
//! it, and the Airbyte-shaped catalog types exchanged with the pipeline.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::streams::{ApiFamily, ResourceDescriptor};
use crate::types::{DestinationSyncMode, JsonValue, SyncMode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.planningcenteronline.com";

// ============================================================================
// Source Config
// ============================================================================

/// Configuration supplied by the user
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Personal access token application id
    pub app_id: String,

    /// Personal access token secret
    pub secret: String,

    /// API host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Product families to expose
    #[serde(default = "default_families")]
    pub families: Vec<ApiFamily>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_families() -> Vec<ApiFamily> {
    ApiFamily::ALL.to_vec()
}

impl SourceConfig {
    /// Create a config with default settings
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
            base_url: default_base_url(),
            families: default_families(),
            http: HttpSettings::default(),
        }
    }

    /// Parse a config object.
    ///
    /// `app_id` and `secret` are checked first so their absence is reported
    /// by name. Their values are otherwise not validated.
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::config("config must be a JSON object"))?;

        for field in ["app_id", "secret"] {
            match object.get(field) {
                None | Some(JsonValue::Null) => return Err(Error::missing_field(field)),
                Some(JsonValue::String(_)) => {}
                Some(_) => return Err(Error::invalid_value(field, "expected a string")),
            }
        }

        let config: Self = serde_json::from_value(value.clone())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(&serde_json::from_str(text)?)
    }

    /// Check the optional settings
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if self.families.is_empty() {
            return Err(Error::invalid_value("families", "at least one family is required"));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value("http.timeout_seconds", "must be positive"));
        }
        Ok(())
    }

    /// Whether a stream is exposed under this config
    pub fn includes(&self, descriptor: &ResourceDescriptor) -> bool {
        self.families.contains(&descriptor.family)
    }

    /// Build the HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries);

        builder = match self.http.rate_limit_rps {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        };
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("app_id", &self.app_id)
            .field("secret", &"***")
            .field("base_url", &self.base_url)
            .field("families", &self.families)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP settings exposed in the source config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Requests per second; `null` disables client-side limiting
    #[serde(default = "default_rate_limit_rps")]
    pub rate_limit_rps: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            rate_limit_rps: default_rate_limit_rps(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit_rps() -> Option<u32> {
    Some(5)
}

// ============================================================================
// Connector Specification
// ============================================================================

/// JSON schema of [`SourceConfig`], returned by `spec`
pub fn connection_specification() -> JsonValue {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Planning Center Spec",
        "type": "object",
        "required": ["app_id", "secret"],
        "additionalProperties": true,
        "properties": {
            "app_id": {
                "type": "string",
                "title": "Application ID",
                "description": "Application ID of a Planning Center personal access token",
                "order": 0
            },
            "secret": {
                "type": "string",
                "title": "Secret",
                "description": "Secret of a Planning Center personal access token",
                "airbyte_secret": true,
                "order": 1
            },
            "base_url": {
                "type": "string",
                "title": "Base URL",
                "default": DEFAULT_BASE_URL,
                "format": "uri",
                "order": 2
            },
            "families": {
                "type": "array",
                "title": "Products",
                "items": {"type": "string", "enum": ["groups", "people"]},
                "default": ["groups", "people"],
                "order": 3
            },
            "http": {
                "type": "object",
                "title": "HTTP settings",
                "properties": {
                    "timeout_seconds": {"type": "integer", "minimum": 1, "default": 30},
                    "max_retries": {"type": "integer", "minimum": 0, "default": 5},
                    "rate_limit_rps": {"type": ["integer", "null"], "minimum": 1, "default": 5},
                    "user_agent": {"type": "string"}
                },
                "order": 4
            }
        }
    })
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Discovered catalog (available streams)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogStream>,
}

/// Stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON schema for the stream
    #[serde(default)]
    pub json_schema: JsonValue,

    /// Supported sync modes
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,

    /// Source-defined primary key
    #[serde(default)]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

impl CatalogStream {
    /// Catalog entry for a resource
    pub fn from_descriptor(descriptor: &ResourceDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            json_schema: record_schema(),
            supported_sync_modes: vec![SyncMode::FullRefresh],
            source_defined_primary_key: Some(vec![vec![descriptor.primary_key.to_string()]]),
        }
    }
}

/// Open schema of a JSON:API resource object
fn record_schema() -> JsonValue {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": true,
        "properties": {
            "id": {"type": "string"},
            "type": {"type": ["string", "null"]},
            "attributes": {"type": ["object", "null"]},
            "relationships": {"type": ["object", "null"]},
            "links": {"type": ["object", "null"]}
        }
    })
}

impl Catalog {
    /// Configure every stream of the catalog for a full refresh
    pub fn into_configured(self) -> ConfiguredCatalog {
        ConfiguredCatalog {
            streams: self
                .streams
                .into_iter()
                .map(ConfiguredStream::full_refresh)
                .collect(),
        }
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&CatalogStream> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// Configured catalog (selected streams for sync)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// Keep only the named streams, in the order given
    pub fn select(&self, names: &[String]) -> Result<Self> {
        let streams = names
            .iter()
            .map(|name| {
                self.streams
                    .iter()
                    .find(|s| &s.stream.name == name)
                    .cloned()
                    .ok_or_else(|| Error::stream_not_found(name.as_str()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { streams })
    }

    /// Names of the configured streams
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.stream.name.as_str()).collect()
    }
}

/// Configured stream for sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream reference
    pub stream: CatalogStream,

    /// Selected sync mode
    #[serde(default)]
    pub sync_mode: SyncMode,

    /// Destination sync mode
    #[serde(default)]
    pub destination_sync_mode: DestinationSyncMode,

    /// Primary key to use
    #[serde(default)]
    pub primary_key: Option<Vec<Vec<String>>>,
}

impl ConfiguredStream {
    /// Full refresh with overwrite, keyed on the source primary key
    pub fn full_refresh(stream: CatalogStream) -> Self {
        Self {
            primary_key: stream.source_defined_primary_key.clone(),
            stream,
            sync_mode: SyncMode::FullRefresh,
            destination_sync_mode: DestinationSyncMode::Overwrite,
        }
    }
}
