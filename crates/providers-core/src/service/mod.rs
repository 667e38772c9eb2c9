//! Provider service
//!
//! The ProviderService is responsible for:
//! - Normalizing caller input
//! - Validating the normalized record
//! - Enforcing contact-field uniqueness among active records
//! - Stamping audit columns
//! - Handing the record to the ProviderStore
//!
//! ## Architecture
//!
//! ```text
//!                  ┌─────────────────┐
//!  ProviderDraft ─▶│ ProviderService │
//!                  └─────────────────┘
//!                           │
//!     ┌──────────────┬──────┴───────┬──────────────┐
//!     ▼              ▼              ▼              ▼
//! ┌─────────┐  ┌───────────┐  ┌────────────┐  ┌────────────────┐
//! │normalize│─▶│ Validator │─▶│ Uniqueness │─▶│ AuditStamper   │─▶ ProviderStore
//! └─────────┘  └───────────┘  │   Guard    │  └────────────────┘
//!                             └────────────┘
//! ```
//!
//! ## Lifecycle of a record
//!
//! 1. `register` creates it active, with `created_*` mirrored into `updated_*`
//! 2. `update` revises it, refreshing `updated_*` only
//! 3. `soft_delete` flags it deleted; it stays in storage but no operation sees it again

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::audit::{AuditStamper, Clock};
use crate::error::{Error, Result};
use crate::model::{ActorId, Provider, ProviderDraft, ProviderId};
use crate::traits::ProviderStore;
use crate::uniqueness::UniquenessGuard;
use crate::validate::{ProviderValidator, Validator};

/// Record-management service for providers
///
/// The service holds no mutable state of its own; it is `Send + Sync` and can
/// be shared behind an `Arc` by concurrent callers. Every operation suspends
/// only on the store.
///
/// ## Uniqueness
///
/// Before every create or update the service scans the active set for
/// colliding contact values. The scan and the write are separate store calls,
/// so stores are also expected to enforce the constraint atomically; a
/// store-level [`Error::Conflict`] is returned to the caller unchanged.
pub struct ProviderService {
    /// Store for provider records
    store: Arc<dyn ProviderStore>,

    /// Field rules applied after normalization
    validator: Box<dyn Validator<Provider>>,

    /// Contact-field collision check
    guard: UniquenessGuard,

    /// Audit column stamping
    stamper: AuditStamper,
}

impl ProviderService {
    /// Create a service over `store` with the built-in rules and the system clock
    pub fn new(store: Arc<dyn ProviderStore>) -> Self {
        Self {
            store,
            validator: Box::new(ProviderValidator::new()),
            guard: UniquenessGuard::new(),
            stamper: AuditStamper::default(),
        }
    }

    /// Replace the validation rules
    pub fn with_validator(mut self, validator: Box<dyn Validator<Provider>>) -> Self {
        self.validator = validator;
        self
    }

    /// Read audit timestamps from `clock`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.stamper = AuditStamper::new(clock);
        self
    }

    /// Register a new provider
    ///
    /// # Returns
    ///
    /// - `Ok(Provider)`: The persisted record with its assigned id
    /// - `Err(Error::Validation)`: The normalized input broke one or more rules
    /// - `Err(Error::Conflict)`: Another active record has the same email or phone
    pub async fn register(&self, draft: ProviderDraft, actor: ActorId) -> Result<Provider> {
        let mut provider = Provider::from_draft(draft.normalize());

        self.validate(&provider)?;
        self.ensure_unique(&provider).await?;

        self.stamper.stamp_created(&mut provider, actor);
        let created = self.store.create(provider).await?;

        info!("Registered provider {} (actor {})", created.id, actor);
        Ok(created)
    }

    /// Revise an active provider
    ///
    /// The draft's fields replace the stored ones; identity, deletion flag and
    /// `created_*` are kept.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully updated
    /// - `Err(Error::NotFound)`: No active record with this id
    /// - `Err(Error::Validation)`: The merged record broke one or more rules
    /// - `Err(Error::Conflict)`: Another active record has the same email or phone
    pub async fn update(&self, id: ProviderId, draft: ProviderDraft, actor: ActorId) -> Result<()> {
        let mut provider = self.load_active(id).await?;
        provider.apply_draft(draft.normalize());

        self.validate(&provider)?;
        self.ensure_unique(&provider).await?;

        self.stamper.stamp_updated(&mut provider, actor);
        self.store.update(&provider).await?;

        info!("Updated provider {} (actor {})", id, actor);
        Ok(())
    }

    /// Fetch an active provider
    ///
    /// A missing or soft-deleted id is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: ProviderId) -> Result<Option<Provider>> {
        let provider = self.store.get_active_by_id(id).await?;
        if provider.is_none() {
            debug!("Provider {} not found among active records", id);
        }
        Ok(provider)
    }

    /// All active providers ordered by last name, then first name
    pub async fn list(&self) -> Result<Vec<Provider>> {
        let providers = self.store.list_active().await?;
        debug!("Listed {} active providers", providers.len());
        Ok(providers)
    }

    /// Soft-delete an active provider
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The record is flagged deleted
    /// - `Err(Error::NotFound)`: No active record with this id
    pub async fn soft_delete(&self, id: ProviderId, actor: ActorId) -> Result<()> {
        let mut provider = self.load_active(id).await?;

        provider.is_deleted = true;
        self.stamper.stamp_updated(&mut provider, actor);
        self.store.soft_delete(&provider).await?;

        info!("Soft-deleted provider {} (actor {})", id, actor);
        Ok(())
    }

    async fn load_active(&self, id: ProviderId) -> Result<Provider> {
        match self.store.get_active_by_id(id).await? {
            Some(provider) => Ok(provider),
            None => {
                warn!("Provider {} not found among active records", id);
                Err(Error::not_found(id))
            }
        }
    }

    fn validate(&self, provider: &Provider) -> Result<()> {
        self.validator.validate(provider).into_result().map_err(|errors| {
            warn!("Rejected provider {}: {}", provider.id, errors);
            Error::Validation(errors)
        })
    }

    async fn ensure_unique(&self, provider: &Provider) -> Result<()> {
        let active = self.store.list_active().await?;
        self.guard.check(&active, provider).inspect_err(|e| {
            warn!("Rejected provider {}: {}", provider.id, e);
        })
    }
}

impl std::fmt::Debug for ProviderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderService")
            .field("stamper", &self.stamper)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;
    use crate::store::MemoryProviderStore;

    fn service() -> (ProviderService, MemoryProviderStore) {
        let store = MemoryProviderStore::new();
        (ProviderService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_register_normalizes_before_storing() {
        let (service, _) = service();
        let draft = ProviderDraft::new("  Ana   Maria ", "Lopez", " 5551234 ")
            .with_email("ANA@Example.com");

        let created = service.register(draft, ActorId(7)).await.unwrap();

        assert_eq!(created.first_name, "Ana Maria");
        assert_eq!(created.email.as_deref(), Some("ana@example.com"));
        assert_eq!(created.phone, "5551234");
        assert_eq!(created.created_by, ActorId(7));
    }

    #[tokio::test]
    async fn test_validation_runs_before_store_access() {
        let (service, store) = service();
        let draft = ProviderDraft::new("A", "", "abc");

        let err = service.register(draft, ActorId(1)).await.unwrap_err();

        let errors = match err {
            Error::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(errors.contains(Field::FirstName));
        assert!(errors.contains(Field::LastName));
        assert!(errors.contains(Field::Phone));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_custom_validator() {
        struct RejectAll;

        impl Validator<Provider> for RejectAll {
            fn validate(&self, _record: &Provider) -> crate::validate::ValidationErrors {
                let mut errors = crate::validate::ValidationErrors::new();
                errors.add(Field::Phone, "blocked");
                errors
            }
        }

        let (service, _) = service();
        let service = service.with_validator(Box::new(RejectAll));

        let result = service
            .register(ProviderDraft::new("Ana", "Lopez", "5551234"), ActorId(1))
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let (service, _) = service();
        let created = service
            .register(ProviderDraft::new("Ana", "Lopez", "5551234"), ActorId(7))
            .await
            .unwrap();

        service
            .update(created.id, ProviderDraft::new("Ana", "Perez", "5551234"), ActorId(8))
            .await
            .unwrap();

        let updated = service.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.last_name, "Perez");
        assert_eq!(updated.created_by, ActorId(7));
        assert_eq!(updated.updated_by, ActorId(8));
    }
}
