// # Provider Store Implementations
//
// This module provides implementations of the ProviderStore trait for
// different persistence strategies. Both share `ProviderTable`, which holds the
// rows and enforces the active-set uniqueness constraint under the caller's
// write lock.

pub mod file;
pub mod memory;

pub use file::{FileProviderStore, FileProviderStoreFactory};
pub use memory::{MemoryProviderStore, MemoryProviderStoreFactory};

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{Provider, ProviderId, UNPERSISTED_ID, sort_by_name};
use crate::uniqueness::UniquenessGuard;

/// First id handed out by an empty table
const FIRST_ID: ProviderId = 1;

/// Rows of a store, soft-deleted ones included
#[derive(Debug, Clone)]
pub(crate) struct ProviderTable {
    next_id: ProviderId,
    rows: BTreeMap<ProviderId, Provider>,
}

impl ProviderTable {
    pub(crate) fn new() -> Self {
        Self {
            next_id: FIRST_ID,
            rows: BTreeMap::new(),
        }
    }

    /// Rebuild a table from persisted rows
    ///
    /// `next_id` is raised past the highest stored id if it lags behind.
    pub(crate) fn from_rows(next_id: ProviderId, rows: Vec<Provider>) -> Self {
        let rows: BTreeMap<_, _> = rows.into_iter().map(|p| (p.id, p)).collect();
        let after_max = rows.keys().next_back().map_or(FIRST_ID, |max| max + 1);
        Self {
            next_id: next_id.max(after_max),
            rows,
        }
    }

    pub(crate) fn next_id(&self) -> ProviderId {
        self.next_id
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &Provider> {
        self.rows.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn get_any(&self, id: ProviderId) -> Option<&Provider> {
        self.rows.get(&id)
    }

    pub(crate) fn get_active(&self, id: ProviderId) -> Option<&Provider> {
        self.rows.get(&id).filter(|p| p.is_active())
    }

    pub(crate) fn list_active(&self) -> Vec<Provider> {
        let mut active: Vec<Provider> = self.rows.values().filter(|p| p.is_active()).cloned().collect();
        sort_by_name(&mut active);
        active
    }

    /// Assign an id and store the record
    pub(crate) fn insert(&mut self, mut provider: Provider) -> Result<Provider> {
        provider.id = UNPERSISTED_ID;
        UniquenessGuard::new().check(self.rows.values(), &provider)?;

        provider.id = self.next_id;
        self.next_id += 1;
        self.rows.insert(provider.id, provider.clone());
        Ok(provider)
    }

    /// Overwrite the mutable columns of an active row
    pub(crate) fn update(&mut self, provider: &Provider) -> Result<()> {
        if self.get_active(provider.id).is_none() {
            return Err(Error::not_found(provider.id));
        }
        UniquenessGuard::new().check(self.rows.values(), provider)?;

        let row = self
            .rows
            .get_mut(&provider.id)
            .ok_or_else(|| Error::not_found(provider.id))?;
        row.first_name.clone_from(&provider.first_name);
        row.last_name.clone_from(&provider.last_name);
        row.email.clone_from(&provider.email);
        row.phone.clone_from(&provider.phone);
        row.updated_by = provider.updated_by;
        row.updated_at = provider.updated_at;
        Ok(())
    }

    /// Flag an active row deleted and copy its `updated_*` columns
    pub(crate) fn soft_delete(&mut self, provider: &Provider) -> Result<()> {
        let row = self
            .rows
            .get_mut(&provider.id)
            .filter(|row| row.is_active())
            .ok_or_else(|| Error::not_found(provider.id))?;
        row.is_deleted = true;
        row.updated_by = provider.updated_by;
        row.updated_at = provider.updated_at;
        Ok(())
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self::new()
    }
}
