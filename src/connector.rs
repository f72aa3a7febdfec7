//! Connector trait and the Planning Center source
//!
//! Defines the lifecycle every source goes through (spec, check, discover,
//! read) and implements it on top of the stream table and the engine.

use crate::auth::BasicAuthenticator;
use crate::config::{
    connection_specification, Catalog, CatalogStream, ConfiguredCatalog, SourceConfig,
};
use crate::engine::{stop_after_error, Message, StreamReader};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::LIMIT_PARAM;
use crate::streams::{self, ApiFamily, ResourceDescriptor};
use crate::types::SyncMode;
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Connector Spec
// ============================================================================

/// Connector specification returned by spec()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Connector name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Documentation URL
    pub documentation_url: String,

    /// JSON schema of the configuration
    pub connection_specification: Value,
}

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Type alias for the message stream returned by read()
pub type MessageStream = BoxStream<'static, Result<Message>>;

/// Core trait that all connectors implement
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector specification
    fn spec(&self) -> ConnectorSpec;

    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &Value) -> Result<CheckResult>;

    /// Lists available streams
    async fn discover(&self, config: &Value) -> Result<Catalog>;

    /// Reads the selected streams, one after another.
    ///
    /// The returned stream ends right after the first error.
    async fn read(&self, config: &Value, catalog: &ConfiguredCatalog) -> Result<MessageStream>;
}

// ============================================================================
// Planning Center Source
// ============================================================================

/// Source reading the Planning Center Groups and People APIs
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcePlanningCenter;

impl SourcePlanningCenter {
    /// Create the source
    pub fn new() -> Self {
        Self
    }

    /// Authenticated client for a config
    pub fn client(config: &SourceConfig) -> Result<HttpClient> {
        HttpClient::with_auth(
            config.http_client_config(),
            BasicAuthenticator::new(config.app_id.clone(), config.secret.clone()),
        )
    }

    /// Resolve configured stream names to descriptors.
    ///
    /// Every stream is read as a full refresh; a configured stream asking
    /// for another sync mode is rejected.
    pub fn resolve_streams(
        config: &SourceConfig,
        catalog: &ConfiguredCatalog,
    ) -> Result<Vec<&'static ResourceDescriptor>> {
        catalog
            .streams
            .iter()
            .map(|configured| {
                let name = configured.stream.name.as_str();
                let descriptor = streams::find(name)
                    .filter(|descriptor| config.includes(descriptor))
                    .ok_or_else(|| Error::stream_not_found(name))?;
                if configured.sync_mode != SyncMode::FullRefresh {
                    return Err(Error::invalid_value(
                        "sync_mode",
                        format!("stream '{name}' only supports full_refresh"),
                    ));
                }
                Ok(descriptor)
            })
            .collect()
    }
}

/// Stream read by `check`: the cheapest list of an enabled family
fn check_stream(config: &SourceConfig) -> &'static ResourceDescriptor {
    if config.families.contains(&ApiFamily::People) {
        &streams::PEOPLE_CAMPUS
    } else {
        &streams::GROUPS_GROUP_TYPE
    }
}

#[async_trait]
impl Connector for SourcePlanningCenter {
    fn spec(&self) -> ConnectorSpec {
        ConnectorSpec {
            name: crate::NAME.to_string(),
            title: "Planning Center".to_string(),
            documentation_url: "https://developer.planning.center/docs/#/overview/".to_string(),
            connection_specification: connection_specification(),
        }
    }

    async fn check(&self, config: &Value) -> Result<CheckResult> {
        let config = SourceConfig::from_value(config)?;
        let client = Self::client(&config)?;
        let descriptor = check_stream(&config);

        let (version_header, version) = descriptor.version_header();
        let request = RequestConfig::new()
            .query(LIMIT_PARAM, "1")
            .header(version_header, version);

        match client.get_json(&descriptor.request_path(), &request).await {
            Ok(_) => {
                info!(stream = descriptor.name, "Connection check succeeded");
                Ok(CheckResult::success())
            }
            Err(e) if e.is_auth_failure() => {
                warn!("Connection check rejected credentials: {e}");
                Ok(CheckResult::failure(format!(
                    "Invalid application id or secret: {e}"
                )))
            }
            Err(e) => {
                warn!("Connection check failed: {e}");
                Ok(CheckResult::failure(e.to_string()))
            }
        }
    }

    async fn discover(&self, config: &Value) -> Result<Catalog> {
        let config = SourceConfig::from_value(config)?;
        let streams = streams::for_families(&config.families)
            .map(CatalogStream::from_descriptor)
            .collect();
        Ok(Catalog { streams })
    }

    async fn read(&self, config: &Value, catalog: &ConfiguredCatalog) -> Result<MessageStream> {
        let config = SourceConfig::from_value(config)?;
        let descriptors = Self::resolve_streams(&config, catalog)?;
        let client = Arc::new(Self::client(&config)?);

        let messages = stream::iter(descriptors)
            .map(move |descriptor| read_stream(StreamReader::new(client.clone()), descriptor))
            .flatten()
            .boxed();

        Ok(stop_after_error(messages))
    }
}

/// Messages for one stream: started, its records, complete
fn read_stream(reader: StreamReader, descriptor: &'static ResourceDescriptor) -> MessageStream {
    let name = descriptor.name;
    let records = Arc::new(AtomicU64::new(0));
    let counter = records.clone();

    let started = stream::once(async move {
        info!(stream = name, "Starting stream");
        Ok(Message::started(name))
    });

    let body = reader.read(descriptor).map_ok(move |record| {
        counter.fetch_add(1, Ordering::Relaxed);
        Message::record(name, record)
    });

    let complete = stream::once(async move {
        let records = records.load(Ordering::Relaxed);
        let pages = reader.pages_fetched();
        info!(stream = name, records, pages, "Finished stream");
        Ok(Message::complete(name, records, pages))
    });

    started.chain(body).chain(complete).boxed()
}
