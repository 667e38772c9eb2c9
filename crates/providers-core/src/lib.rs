// # providers-core
//
// Core library for the provider registry.
//
// ## Architecture Overview
//
// This library provides the record-management rules for provider records:
// - **normalize**: Canonicalizes caller-supplied text
// - **ProviderValidator**: Accumulates every field rule violation in one pass
// - **UniquenessGuard**: Rejects email/phone collisions among active records
// - **AuditStamper**: Maintains `created_*` / `updated_*` columns
// - **ProviderService**: Orchestrates the above around a store
// - **ProviderStore**: Trait for persistence (memory and file stores bundled)
// - **StoreRegistry**: Plugin-based registry for store backends
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Business rules live in the service, persistence behind a trait
// 2. **Explicit Outcomes**: Validation, conflict and not-found are `Error` variants, not panics
// 3. **Soft Deletion**: Records are flagged, never removed
// 4. **Library-First**: Binaries are thin callers of this crate

pub mod audit;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod service;
pub mod store;
pub mod traits;
pub mod uniqueness;
pub mod validate;

// Re-export core types for convenience
pub use audit::{AuditStamper, Clock, SystemClock};
pub use config::{ProvidersConfig, StoreConfig};
pub use error::{Error, Result};
pub use model::{ActorId, Field, Provider, ProviderDraft, ProviderId};
pub use registry::StoreRegistry;
pub use service::ProviderService;
pub use store::{FileProviderStore, MemoryProviderStore};
pub use traits::{ProviderStore, ProviderStoreFactory};
pub use uniqueness::UniquenessGuard;
pub use validate::{ProviderValidator, ValidationErrors, Validator};
