//! Configuration types for the cfddns system
//!
//! Both structures are built once by the caller and only ever borrowed by
//! the engine and the provider.

use serde::{Deserialize, Serialize};

/// Account credentials and the zone every configured domain lives in
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Account email, sent as `X-Auth-Email`
    pub email: String,

    /// Global API key, sent as `X-Auth-Key`
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// Zone identifier the records belong to
    pub zone_id: String,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

impl ProviderCredentials {
    /// Create a new set of credentials
    pub fn new(
        email: impl Into<String>,
        api_key: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
            zone_id: zone_id.into(),
        }
    }

    /// Validate that no field is empty
    ///
    /// The values themselves are opaque; the provider is the one that
    /// decides whether they are accepted.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.email.trim().is_empty() {
            return Err(crate::Error::config("Account email cannot be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Zone ID cannot be empty"));
        }
        Ok(())
    }
}

/// Everything one sync cycle needs besides the current address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Provider credentials
    pub credentials: ProviderCredentials,

    /// Domains to keep in sync, processed in this order
    pub domains: Vec<String>,
}

impl SyncConfig {
    /// Create a new configuration
    pub fn new(credentials: ProviderCredentials, domains: Vec<String>) -> Self {
        Self {
            credentials,
            domains,
        }
    }

    /// Add a domain to the end of the list
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;

        if self.domains.is_empty() {
            return Err(crate::Error::config("No domains configured"));
        }

        if let Some(index) = self.domains.iter().position(|d| d.trim().is_empty()) {
            return Err(crate::Error::config(format!(
                "Domain at position {} is empty",
                index
            )));
        }

        Ok(())
    }
}
