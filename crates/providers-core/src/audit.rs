//! Audit stamping
//!
//! Creation sets `created_*` and mirrors it into `updated_*`. Every later
//! mutation, soft-delete included, refreshes `updated_*` only.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::model::{ActorId, Provider};

/// Source of the current time for audit columns
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Attaches actor and timestamp to records before they are persisted
#[derive(Clone)]
pub struct AuditStamper {
    clock: Arc<dyn Clock>,
}

impl AuditStamper {
    /// Create a stamper reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Stamp a record that is about to be created
    pub fn stamp_created(&self, provider: &mut Provider, actor: ActorId) {
        let now = self.clock.now();
        provider.created_by = actor;
        provider.created_at = now;
        provider.updated_by = actor;
        provider.updated_at = now;
    }

    /// Stamp a record that is about to be updated or soft-deleted
    pub fn stamp_updated(&self, provider: &mut Provider, actor: ActorId) {
        provider.updated_by = actor;
        provider.updated_at = self.clock.now();
    }
}

impl Default for AuditStamper {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for AuditStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStamper").finish_non_exhaustive()
    }
}
