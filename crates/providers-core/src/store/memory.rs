// # Memory Provider Store
//
// In-memory implementation of ProviderStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for testing and for embedding the registry where another layer owns
// durability.
//
// ## Crash Behavior
//
// - All records are lost on restart/crash
// - Ids start again at 1

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ProviderTable;
use crate::Error;
use crate::model::{Provider, ProviderId};
use crate::traits::provider_store::{ProviderStore, ProviderStoreFactory};

/// In-memory provider store implementation
///
/// This implementation stores all rows in a table protected by a RwLock.
/// Uniqueness is enforced while the write lock is held, so concurrent
/// registrations of the same contact data cannot both succeed.
///
/// # Example
///
/// ```rust,no_run
/// use providers_core::{ActorId, MemoryProviderStore, ProviderDraft, ProviderService};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = ProviderService::new(Arc::new(MemoryProviderStore::new()));
///
///     let ana = service
///         .register(ProviderDraft::new("Ana", "Lopez", "5551234"), ActorId(7))
///         .await?;
///     assert_eq!(ana.id, 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryProviderStore {
    inner: Arc<RwLock<ProviderTable>>,
}

impl MemoryProviderStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of rows in the store, soft-deleted ones included
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store holds no rows at all
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Fetch a row by id whether or not it is soft-deleted
    pub async fn get_any(&self, id: ProviderId) -> Option<Provider> {
        self.inner.read().await.get_any(id).cloned()
    }
}

#[async_trait]
impl ProviderStore for MemoryProviderStore {
    async fn create(&self, provider: Provider) -> Result<Provider, Error> {
        let mut guard = self.inner.write().await;
        guard.insert(provider)
    }

    async fn get_active_by_id(&self, id: ProviderId) -> Result<Option<Provider>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get_active(id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Provider>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.list_active())
    }

    async fn update(&self, provider: &Provider) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.update(provider)
    }

    async fn soft_delete(&self, provider: &Provider) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.soft_delete(provider)
    }
}

/// Factory registered under `"memory"`
#[derive(Debug, Default)]
pub struct MemoryProviderStoreFactory;

#[async_trait]
impl ProviderStoreFactory for MemoryProviderStoreFactory {
    async fn create(&self, _config: &serde_json::Value) -> Result<Box<dyn ProviderStore>, Error> {
        Ok(Box::new(MemoryProviderStore::new()))
    }
}
