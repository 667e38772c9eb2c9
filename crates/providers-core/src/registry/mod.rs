//! Plugin-based store registry
//!
//! The registry allows provider stores to be registered dynamically at
//! runtime, so binaries pick a backend from configuration instead of
//! hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use providers_core::registry::StoreRegistry;
//! use providers_core::config::StoreConfig;
//!
//! // Built-in "memory" and "file" stores are pre-registered
//! let registry = StoreRegistry::with_builtin();
//!
//! // Register an out-of-tree backend
//! registry.register_store("postgres", Arc::new(PostgresStoreFactory));
//!
//! // Create a store from config
//! let store = registry.create_store(&StoreConfig::Memory).await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{FileProviderStoreFactory, MemoryProviderStoreFactory};
use crate::traits::{ProviderStore, ProviderStoreFactory};

/// Registry of provider store factories keyed by type name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Arc<dyn ProviderStoreFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `memory` and `file` stores registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_store("memory", Arc::new(MemoryProviderStoreFactory));
        registry.register_store("file", Arc::new(FileProviderStoreFactory));
        registry
    }

    /// Register a store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "file", "memory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_store(&self, name: impl Into<String>, factory: Arc<dyn ProviderStoreFactory>) {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        stores.insert(name.into(), factory);
    }

    /// Create a provider store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ProviderStore>)`: Created store instance
    /// - `Err(Error)`: If the config is invalid, the type is not registered, or creation fails
    pub async fn create_store(&self, config: &StoreConfig) -> Result<Box<dyn ProviderStore>> {
        config.validate()?;

        let store_type = config.type_name();
        let factory = {
            let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
            stores
                .get(store_type)
                .cloned()
                .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?
        };

        let config_json = serde_json::to_value(config)?;
        tracing::debug!("Creating provider store of type {}", store_type);
        factory.create(&config_json).await
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.keys().cloned().collect()
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.contains_key(name)
    }
}
