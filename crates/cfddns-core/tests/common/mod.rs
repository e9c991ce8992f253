//! Test doubles and common utilities for sync contract tests
//!
//! The doubles record every call so tests can assert on what the engine
//! asked the provider to do, not only on the outcomes it reported.

#![allow(dead_code)]

use cfddns_core::error::{Error, Result};
use cfddns_core::{ProviderCredentials, RecordProvider, ResolvedRecord, SyncConfig, UpdateRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One call the engine made to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Resolve { domain: String },
    Update { record_id: String, request: UpdateRequest },
}

/// An in-memory provider backed by a map of domain → record
///
/// Updates rewrite the stored content, so consecutive cycles observe the
/// effect of earlier ones like they would against a real zone.
pub struct ScriptedProvider {
    records: Arc<Mutex<HashMap<String, ResolvedRecord>>>,
    resolve_failures: Arc<Mutex<HashMap<String, Error>>>,
    update_failures: Arc<Mutex<HashMap<String, Error>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    update_call_count: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            resolve_failures: Arc::new(Mutex::new(HashMap::new())),
            update_failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            update_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Seed an existing record
    pub fn with_record(self, domain: &str, id: &str, content: &str) -> Self {
        self.records.lock().unwrap().insert(
            domain.to_string(),
            ResolvedRecord {
                id: id.to_string(),
                content: content.to_string(),
            },
        );
        self
    }

    /// Make resolve fail for a domain
    pub fn failing_resolve(self, domain: &str, error: Error) -> Self {
        self.resolve_failures
            .lock()
            .unwrap()
            .insert(domain.to_string(), error);
        self
    }

    /// Make update fail for a record identifier
    pub fn failing_update(self, record_id: &str, error: Error) -> Self {
        self.update_failures
            .lock()
            .unwrap()
            .insert(record_id.to_string(), error);
        self
    }

    /// Create a new ScriptedProvider that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            resolve_failures: Arc::clone(&other.resolve_failures),
            update_failures: Arc::clone(&other.update_failures),
            calls: Arc::clone(&other.calls),
            update_call_count: Arc::clone(&other.update_call_count),
        }
    }

    /// Get the number of times update() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Update calls only
    pub fn updates(&self) -> Vec<(String, UpdateRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProviderCall::Update { record_id, request } => Some((record_id, request)),
                ProviderCall::Resolve { .. } => None,
            })
            .collect()
    }

    /// Current content of a stored record
    pub fn content_of(&self, domain: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(domain)
            .map(|r| r.content.clone())
    }
}

#[async_trait::async_trait]
impl RecordProvider for ScriptedProvider {
    async fn resolve(&self, _credentials: &ProviderCredentials, domain: &str) -> Result<ResolvedRecord> {
        self.calls.lock().unwrap().push(ProviderCall::Resolve {
            domain: domain.to_string(),
        });

        if let Some(error) = self.resolve_failures.lock().unwrap().get(domain) {
            return Err(error.clone());
        }

        self.records
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .ok_or_else(|| Error::not_found(domain))
    }

    async fn update(
        &self,
        _credentials: &ProviderCredentials,
        record_id: &str,
        request: &UpdateRequest,
    ) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(ProviderCall::Update {
            record_id: record_id.to_string(),
            request: request.clone(),
        });

        if let Some(error) = self.update_failures.lock().unwrap().get(record_id) {
            return Err(error.clone());
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .values_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::provider("scripted", "81044: Record does not exist.\n"))?;
        record.content = request.content.clone();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Helper to create a SyncConfig for the given domains
pub fn config_for(domains: &[&str]) -> SyncConfig {
    SyncConfig::new(
        ProviderCredentials::new("ops@example.com", "test-key", "test-zone"),
        domains.iter().map(|d| d.to_string()).collect(),
    )
}
