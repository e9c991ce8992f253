// # Cloudflare Record Provider
//
// This crate implements the provider half of a cfddns sync cycle against the
// Cloudflare API v4: resolving the record that backs a domain and replacing
// its content.
//
// ## Behavior
//
// - One HTTP request per call, no retries, no backoff, no caching
// - Every request carries a bounded timeout (30 seconds by default)
// - Responses are judged by their JSON body, not by the HTTP status
// - Errors are returned, never logged (reporting belongs to `SyncEngine`)
//
// ## Authentication
//
// Global API key authentication: `X-Auth-Email` and `X-Auth-Key` on every
// request. The key never appears in error messages or `Debug` output.
//
// ## API Reference
//
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

mod api;

use api::{ListRecordsResponse, UpdateRecordResponse};
use async_trait::async_trait;
use cfddns_core::{Error, ProviderCredentials, RecordProvider, ResolvedRecord, Result, UpdateRequest};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "cloudflare";

/// Cloudflare record provider
///
/// Holds no credentials: they are passed by reference into every call. The
/// pooled HTTP client is the only thing shared between calls.
#[derive(Debug, Clone)]
pub struct CloudflareProvider {
    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl CloudflareProvider {
    /// Create a provider talking to the public Cloudflare API
    pub fn new() -> Result<Self> {
        Self::with_base_url(CLOUDFLARE_API_BASE, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a provider with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_base_url(CLOUDFLARE_API_BASE, timeout)
    }

    /// Create a provider against an arbitrary base URL
    ///
    /// Used for API-compatible endpoints and for tests against a mock server.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("Cloudflare API base URL cannot be empty"));
        }

        Ok(Self { base_url, client })
    }

    /// API base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    /// Attach the authentication and content-type headers
    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
        credentials: &ProviderCredentials,
    ) -> reqwest::RequestBuilder {
        builder
            .header("X-Auth-Email", &credentials.email)
            .header("X-Auth-Key", &credentials.api_key)
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode its JSON body
    ///
    /// # Errors
    ///
    /// - `Error::Transport`: connection failure, timeout, or unreadable body
    /// - `Error::Decode`: the body is not the expected JSON shape
    async fn exchange<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("HTTP request timed out: {}", e))
            } else {
                Error::transport(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            Error::decode(format!("Failed to parse response (HTTP {}): {}", status, e))
        })
    }
}

#[async_trait]
impl RecordProvider for CloudflareProvider {
    /// Resolve the record whose name is exactly `domain`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn resolve(&self, credentials: &ProviderCredentials, domain: &str) -> Result<ResolvedRecord> {
        if domain.is_empty() {
            return Err(Error::invalid_input("domain cannot be empty"));
        }

        let request = self
            .authorized(self.client.get(self.records_url(&credentials.zone_id)), credentials)
            .query(&[("name", domain)]);

        let body: ListRecordsResponse = self.exchange(request).await?;

        if let Some(message) = api::top_level_error(body.error) {
            return Err(Error::provider(PROVIDER_NAME, message));
        }

        if body.success == Some(false) {
            return Err(Error::provider(PROVIDER_NAME, api::render_errors(body.errors)?));
        }

        let records = body
            .result
            .ok_or_else(|| Error::decode("Invalid response format: result is missing"))?;

        // The provider filters by name, but its ordering and matching are not
        // relied on: first exact match wins.
        let record = records
            .into_iter()
            .find(|r| r.name == domain)
            .ok_or_else(|| Error::not_found(domain))?;

        Ok(ResolvedRecord {
            id: record.id,
            content: record.content,
        })
    }

    /// Replace the record addressed by `record_id`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "type": "A" or "AAAA",
    ///   "name": "home.example.com",
    ///   "content": "203.0.113.5",
    ///   "ttl": 1
    /// }
    /// ```
    async fn update(
        &self,
        credentials: &ProviderCredentials,
        record_id: &str,
        request: &UpdateRequest,
    ) -> Result<()> {
        let url = format!("{}/{}", self.records_url(&credentials.zone_id), record_id);
        // Headers first: `json()` only sets Content-Type when it is absent
        let builder = self.authorized(self.client.put(url), credentials).json(request);

        let body: UpdateRecordResponse = self.exchange(builder).await?;

        if let Some(message) = api::top_level_error(body.error) {
            return Err(Error::provider(PROVIDER_NAME, message));
        }

        if body.success != Some(true) {
            return Err(Error::provider(PROVIDER_NAME, api::render_errors(body.errors)?));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
