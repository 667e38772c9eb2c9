//! Core traits for the provider registry
//!
//! This module defines the abstract interfaces that storage implementations follow.
//!
//! - [`ProviderStore`]: Persistence of provider records
//! - [`ProviderStoreFactory`]: Construction of stores from configuration

pub mod provider_store;

pub use provider_store::{ProviderStore, ProviderStoreFactory};
