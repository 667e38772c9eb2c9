// # Provider Store Trait
//
// Defines the storage contract the provider service depends on.
//
// ## Purpose
//
// The store owns persistence of provider records:
// - Assigning ids on creation
// - Filtering out soft-deleted rows from every read
// - Keeping deleted rows around for history
//
// ## Implementations
//
// - In-memory: `MemoryProviderStore`
// - JSON file: `FileProviderStore`
// - Future: SQL databases behind the same trait
//
// ## Usage
//
// ```rust,ignore
// use providers_core::ProviderStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* ProviderStore implementation */;
//
//     // Only active records are ever returned
//     let active = store.list_active().await?;
//     let one = store.get_active_by_id(5).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{Provider, ProviderId};

/// Trait for provider store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Trust Level: Trusted (Core Component)
///
/// ## Allowed Capabilities
/// - ✅ Perform I/O for persistent storage (files, databases, etc.)
/// - ✅ Implement locking/concurrency control for thread safety
/// - ✅ Enforce contact-field uniqueness atomically, reporting `Error::Conflict`
///
/// ## Forbidden Capabilities
/// - ❌ Normalize or validate input (owned by `ProviderService`)
/// - ❌ Stamp audit columns (owned by `ProviderService`)
/// - ❌ Physically remove rows
///
/// ## Implementation Guidelines
///
/// - **Active-only reads**: `get_active_by_id` and `list_active` never return
///   rows with `is_deleted = true`
/// - **Immutable creation audit**: `update` and `soft_delete` must not overwrite
///   the stored `created_by`/`created_at`
/// - **Errors pass through**: infrastructure failures are reported as-is; the
///   service does not reinterpret them
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Persist a new record
    ///
    /// # Returns
    ///
    /// - `Ok(Provider)`: The stored record with its assigned id
    /// - `Err(Error::Conflict)`: Another active record holds the email or phone
    /// - `Err(Error)`: Storage error
    async fn create(&self, provider: Provider) -> Result<Provider, crate::Error>;

    /// Fetch an active record by id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Provider))`: The active record
    /// - `Ok(None)`: No such id, or the record is soft-deleted
    /// - `Err(Error)`: Storage error
    async fn get_active_by_id(&self, id: ProviderId) -> Result<Option<Provider>, crate::Error>;

    /// List every active record ordered by `(last_name, first_name)` ascending
    async fn list_active(&self) -> Result<Vec<Provider>, crate::Error>;

    /// Write the mutable columns of an existing active record
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully updated
    /// - `Err(Error::NotFound)`: No active record with this id
    /// - `Err(Error::Conflict)`: The new contact values collide with another record
    /// - `Err(Error)`: Storage error
    async fn update(&self, provider: &Provider) -> Result<(), crate::Error>;

    /// Mark a record deleted and refresh its `updated_*` columns
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully marked
    /// - `Err(Error::NotFound)`: No active record with this id
    /// - `Err(Error)`: Storage error
    async fn soft_delete(&self, provider: &Provider) -> Result<(), crate::Error>;
}

/// Helper trait for constructing provider stores from configuration
#[async_trait]
pub trait ProviderStoreFactory: Send + Sync {
    /// Create a ProviderStore instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Serialized `StoreConfig` for this store type
    ///
    /// # Returns
    ///
    /// A boxed ProviderStore trait object
    async fn create(&self, config: &serde_json::Value)
    -> Result<Box<dyn ProviderStore>, crate::Error>;
}
