//! Core traits for the cfddns system
//!
//! - [`RecordProvider`]: Resolve and update DNS records via a provider API

pub mod record_provider;

pub use record_provider::{RecordProvider, RecordType, ResolvedRecord, UpdateRequest, AUTOMATIC_TTL};
