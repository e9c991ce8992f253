//! Sync orchestrator
//!
//! The SyncEngine is responsible for:
//! - Walking the configured domains in order
//! - Resolving each domain's current record via the RecordProvider
//! - Updating the record only when its content differs from the current IP
//! - Turning every per-domain failure into a `Failed` outcome
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────┐
//!  current IP ───▶│  SyncEngine  │───▶ SyncReport
//!                 └──────────────┘
//!                   │          ▲
//!        resolve()  │          │ ResolvedRecord
//!        update()   ▼          │
//!                 ┌──────────────┐
//!                 │RecordProvider│
//!                 └──────────────┘
//! ```
//!
//! ## Per-domain flow
//!
//! 1. Resolve the record (failure → `Failed`, next domain)
//! 2. Pick `A` or `AAAA` from the address literal
//! 3. Same content → `Unchanged`
//! 4. Otherwise update with the identifier from step 1 (failure → `Failed`)

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::traits::{RecordProvider, UpdateRequest};
use tracing::{debug, info, warn};

/// Result of syncing a single domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Record already pointed at the current address
    Unchanged {
        /// The record content
        current: String,
    },

    /// Record was rewritten
    Updated {
        /// Content before the update
        previous: String,
        /// Content after the update
        current: String,
    },

    /// Resolve or update failed; the batch carried on
    Failed {
        /// Why this domain failed
        error: Error,
    },
}

impl SyncOutcome {
    /// Whether this outcome is a failure
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// Outcome for one configured domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainOutcome {
    /// The domain name
    pub domain: String,
    /// What happened to it
    pub outcome: SyncOutcome,
}

/// Outcomes of one sync cycle, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One entry per configured domain
    pub outcomes: Vec<DomainOutcome>,
}

impl SyncReport {
    /// Number of domains in the cycle
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the cycle covered no domains
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of records rewritten
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Updated { .. }))
    }

    /// Number of records left alone
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Unchanged { .. }))
    }

    /// Number of domains that failed
    pub fn failed(&self) -> usize {
        self.count(SyncOutcome::is_failed)
    }

    /// Whether any domain failed
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Outcome for a given domain (first occurrence)
    pub fn get(&self, domain: &str) -> Option<&SyncOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.domain == domain)
            .map(|o| &o.outcome)
    }

    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

/// Core sync engine
///
/// Holds the provider and the configuration for the lifetime of the process;
/// every call to [`SyncEngine::sync`] is one independent cycle with no state
/// carried over from the previous one.
///
/// ## Ordering
///
/// Domains are processed strictly one after the other. The resolve/update
/// pair of one domain never overlaps another domain's, since record
/// identifiers are only meaningful for the domain they were resolved for.
pub struct SyncEngine {
    /// Provider used for both resolve and update
    provider: Box<dyn RecordProvider>,

    /// Credentials and domain list
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Returns
    ///
    /// - `Ok(SyncEngine)`: ready to run cycles
    /// - `Err(Error::Config)`: the configuration failed validation
    pub fn new(provider: Box<dyn RecordProvider>, config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Configured domains, in processing order
    pub fn domains(&self) -> &[String] {
        &self.config.domains
    }

    /// Run one sync cycle against `current_ip`
    ///
    /// Never fails: each domain's error is captured in its outcome and the
    /// loop moves on to the next domain.
    pub async fn sync(&self, current_ip: &str) -> SyncReport {
        let mut report = SyncReport {
            outcomes: Vec::with_capacity(self.config.domains.len()),
        };

        for domain in &self.config.domains {
            let outcome = match self.sync_domain(domain, current_ip).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(
                        domain = %domain,
                        kind = error.kind(),
                        "{} sync failed for {}: {}",
                        self.provider.provider_name(),
                        domain,
                        error
                    );
                    SyncOutcome::Failed { error }
                }
            };

            report.outcomes.push(DomainOutcome {
                domain: domain.clone(),
                outcome,
            });
        }

        info!(
            "Sync cycle finished: {} updated, {} unchanged, {} failed",
            report.updated(),
            report.unchanged(),
            report.failed()
        );

        report
    }

    /// Resolve, compare and (maybe) update a single domain
    async fn sync_domain(&self, domain: &str, current_ip: &str) -> Result<SyncOutcome> {
        let credentials = &self.config.credentials;

        let record = self.provider.resolve(credentials, domain).await?;

        if record.content == current_ip {
            debug!("Record {} already has content {}, skipping update", domain, current_ip);
            return Ok(SyncOutcome::Unchanged {
                current: record.content,
            });
        }

        let request = UpdateRequest::new(domain, current_ip);
        debug!(
            "Record {} ({}) differs: {} -> {}",
            domain, request.record_type, record.content, current_ip
        );

        self.provider.update(credentials, &record.id, &request).await?;

        info!("{}: {} updated to {}", self.provider.provider_name(), domain, current_ip);

        Ok(SyncOutcome::Updated {
            previous: record.content,
            current: request.content,
        })
    }
}
