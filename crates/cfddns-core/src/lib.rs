// # cfddns-core
//
// Core library for the cfddns record synchronizer.
//
// ## Architecture Overview
//
// One sync cycle walks the configured domains in order and, for each one,
// resolves the existing record, compares it with the current address and
// rewrites it only when the two differ.
//
// - **RecordProvider**: Trait for the provider-facing half (resolve + update)
// - **SyncEngine**: Orchestrator that runs the per-domain loop and never aborts the batch
// - **SyncConfig / ProviderCredentials**: Immutable configuration shared by every call
// - **Error**: The shared error taxonomy (transport, decode, provider, not found)
//
// ## Design Principles
//
// 1. **Sequential**: Domains are processed one full round-trip at a time
// 2. **Stateless**: Record identifiers are re-resolved every cycle, never cached
// 3. **Library-First**: The daemon is a thin shell around this crate
// 4. **Quiet providers**: Providers return errors, the engine decides what to log

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{ProviderCredentials, SyncConfig};
pub use engine::{DomainOutcome, SyncEngine, SyncOutcome, SyncReport};
pub use error::{Error, Result};
pub use traits::{RecordProvider, RecordType, ResolvedRecord, UpdateRequest};
