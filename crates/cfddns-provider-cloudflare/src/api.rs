//! Cloudflare API v4 response bodies
//!
//! Only the fields the sync protocol reads are modeled. Anything else the
//! API returns is ignored; anything modeled that has the wrong shape is a
//! decode error.

use cfddns_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Body of `GET /zones/:zone_id/dns_records?name=...`
#[derive(Debug, Deserialize)]
pub(crate) struct ListRecordsResponse {
    /// Top-level error string (takes precedence over everything else)
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub success: Option<bool>,

    /// Parsed lazily, only when `success` is false
    #[serde(default)]
    pub errors: Option<Value>,

    #[serde(default)]
    pub result: Option<Vec<ListedRecord>>,
}

/// One entry of the record listing
#[derive(Debug, Deserialize)]
pub(crate) struct ListedRecord {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Body of `PUT /zones/:zone_id/dns_records/:record_id`
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRecordResponse {
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub errors: Option<Value>,
}

/// One entry of the `errors` array
#[derive(Debug, Deserialize)]
struct ApiError {
    code: serde_json::Number,
    message: String,
}

/// The top-level error string, if present and non-empty
pub(crate) fn top_level_error(error: Option<String>) -> Option<String> {
    error.filter(|e| !e.is_empty())
}

/// Render the `errors` array as one `code: message` line per entry
///
/// Log scrapers match on this layout; keep it stable.
pub(crate) fn render_errors(errors: Option<Value>) -> Result<String> {
    let errors = errors.ok_or_else(|| Error::decode("Invalid response format: errors is missing"))?;

    let errors: Vec<ApiError> = serde_json::from_value(errors)
        .map_err(|e| Error::decode(format!("Invalid response format: errors: {}", e)))?;

    if errors.is_empty() {
        return Ok("request not acknowledged, no errors reported".to_string());
    }

    Ok(errors
        .iter()
        .map(|e| format!("{}: {}\n", e.code, e.message))
        .collect())
}
