use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use shared::{domain::SetId, error::AccessApiError, protocol::TopshotSetResult};
use tracing::{debug, info, warn};

pub mod cadence;
pub mod config;
pub mod error;
pub mod script;

use cadence::{decode_set_result, CadenceValue};
use config::Settings;
pub use error::{DecodeError, QueryError};

/// Block the scripts are executed against.
const SCRIPT_BLOCK_HEIGHT: &str = "sealed";

/// Opaque remote procedure: runs a read-only script and returns its decoded
/// JSON-Cadence result.
#[async_trait]
pub trait ScriptTransport: Send + Sync {
    async fn execute_script(
        &self,
        source: &str,
        arguments: &[CadenceValue],
    ) -> std::result::Result<CadenceValue, QueryError>;
}

/// Fetches one set together with the full play catalog.
#[async_trait]
pub trait SetQueryExecutor: Send + Sync {
    async fn fetch_set(&self, set_id: SetId) -> std::result::Result<TopshotSetResult, QueryError>;
}

/// Flow Access REST API client (`POST /v1/scripts`).
pub struct FlowAccessClient {
    http: Client,
    access_node_url: String,
}

impl FlowAccessClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("failed to build access node http client")?;
        Ok(Self::with_http(http, settings))
    }

    /// Uses a caller-built `http` client; its timeout and proxy setup are kept.
    pub fn with_http(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            access_node_url: settings
                .access_node_url
                .as_str()
                .trim_end_matches('/')
                .to_string(),
        }
    }

    pub fn access_node_url(&self) -> &str {
        &self.access_node_url
    }
}

#[async_trait]
impl ScriptTransport for FlowAccessClient {
    async fn execute_script(
        &self,
        source: &str,
        arguments: &[CadenceValue],
    ) -> std::result::Result<CadenceValue, QueryError> {
        let access_node_url = &self.access_node_url;
        let body = script::encode_script_request(source, arguments);
        let response = self
            .http
            .post(format!("{access_node_url}/v1/scripts"))
            .query(&[("block_height", SCRIPT_BLOCK_HEIGHT)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                QueryError::transport(format!("failed to reach access node {access_node_url}: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            QueryError::transport(format!("failed to read access node response: {e}"))
        })?;

        if !status.is_success() {
            return match serde_json::from_str::<AccessApiError>(&text) {
                Ok(api_error) => {
                    if api_error.is_script_failure() {
                        warn!(code = api_error.code, "script aborted on access node");
                    } else {
                        warn!(code = api_error.code, "access node rejected script request");
                    }
                    Err(QueryError::Execution {
                        code: api_error.code,
                        message: api_error.message,
                    })
                }
                Err(_) => Err(QueryError::transport(format!(
                    "access node returned {status}: {}",
                    text.trim()
                ))),
            };
        }

        let encoded: String = serde_json::from_str(&text)
            .map_err(|e| DecodeError::new("$", format!("response is not a JSON string: {e}")))?;
        let raw = STANDARD
            .decode(encoded.trim())
            .map_err(|e| DecodeError::new("$", format!("response is not valid base64: {e}")))?;
        let json: serde_json::Value = serde_json::from_slice(&raw)
            .map_err(|e| DecodeError::new("$", format!("response is not valid JSON: {e}")))?;
        debug!(bytes = raw.len(), "script result received");

        Ok(CadenceValue::from_json(&json)?)
    }
}

/// Query Executor for the Top Shot contract: one script call per fetch, no
/// retry, no partial results.
pub struct TopShotSetQuery {
    transport: Arc<dyn ScriptTransport>,
    source: String,
}

impl TopShotSetQuery {
    pub fn new(transport: Arc<dyn ScriptTransport>, settings: &Settings) -> Self {
        Self {
            transport,
            source: script::set_query_source(&settings.topshot_address.to_prefixed()),
        }
    }

    /// Executor backed by the Flow Access REST API named in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = FlowAccessClient::new(settings)?;
        Ok(Self::new(Arc::new(client), settings))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[async_trait]
impl SetQueryExecutor for TopShotSetQuery {
    async fn fetch_set(&self, set_id: SetId) -> std::result::Result<TopshotSetResult, QueryError> {
        info!(set_id = set_id.0, "fetching set");
        let arguments = script::set_query_arguments(set_id);
        let value = self
            .transport
            .execute_script(&self.source, &arguments)
            .await
            .inspect_err(|e| warn!(set_id = set_id.0, error = %e, "set query failed"))?;

        let result = decode_set_result(&value).inspect_err(|e| {
            warn!(set_id = set_id.0, error = %e, "set query result has unexpected shape")
        })?;
        info!(
            set_id = set_id.0,
            editions = result.set.editions.len(),
            plays = result.plays.len(),
            "set fetched"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
