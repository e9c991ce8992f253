// # Record Provider Trait
//
// Defines the provider-facing half of a sync cycle: looking up the record
// that currently backs a domain, and replacing its content.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::{RecordProvider, UpdateRequest};
//
// let record = provider.resolve(&credentials, "home.example.com").await?;
// if record.content != current_ip {
//     let request = UpdateRequest::new("home.example.com", current_ip);
//     provider.update(&credentials, &record.id, &request).await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ProviderCredentials;

/// TTL value meaning "automatic" for the provider
pub const AUTOMATIC_TTL: u32 = 1;

/// DNS record type written by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Pick the record type from the textual form of an address
    ///
    /// Any colon means IPv6. This is a syntactic check only: the literal is
    /// not validated, the provider is the final arbiter.
    pub fn for_address(ip: &str) -> Self {
        if ip.contains(':') {
            RecordType::Aaaa
        } else {
            RecordType::A
        }
    }

    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record currently backing a domain
///
/// Only valid for the domain it was resolved for, and only within the sync
/// cycle that resolved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    /// Provider-assigned record identifier (opaque)
    pub id: String,
    /// Current record content (an address literal)
    pub content: String,
}

/// Full desired state of a record, sent as the body of an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record name (the domain)
    pub name: String,
    /// New content (an address literal)
    pub content: String,
    /// Time-to-live, always [`AUTOMATIC_TTL`]
    pub ttl: u32,
}

impl UpdateRequest {
    /// Build the update for `domain` pointing at `ip`
    pub fn new(domain: impl Into<String>, ip: impl Into<String>) -> Self {
        let content = ip.into();
        Self {
            record_type: RecordType::for_address(&content),
            name: domain.into(),
            content,
            ttl: AUTOMATIC_TTL,
        }
    }
}

/// Trait for provider implementations
///
/// Implementations issue exactly one request per call. They must not retry,
/// sleep, cache record identifiers, or log failures: every error is returned
/// to the [`SyncEngine`](crate::SyncEngine), which owns reporting.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Find the record whose name is exactly `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedRecord)`: identifier and current content of the first exact match
    /// - `Err(Error::RecordNotFound)`: no record, or only records with other names
    /// - `Err(Error::Provider)`: the provider reported an error
    /// - `Err(Error::Transport | Error::Decode)`: the exchange itself failed
    async fn resolve(
        &self,
        credentials: &ProviderCredentials,
        domain: &str,
    ) -> Result<ResolvedRecord, crate::Error>;

    /// Replace the record addressed by `record_id` with `request`
    ///
    /// `record_id` must come from a [`resolve`](Self::resolve) call for the
    /// same domain in the same cycle.
    async fn update(
        &self,
        credentials: &ProviderCredentials,
        record_id: &str,
        request: &UpdateRequest,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
