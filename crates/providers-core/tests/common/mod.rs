//! Test doubles and common utilities for service contract tests
//!
//! This module provides a call-counting store wrapper and a deterministic
//! clock so the contract tests can assert on what the service did, not just
//! on what it returned.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use providers_core::error::Result;
use providers_core::{
    ActorId, Clock, MemoryProviderStore, Provider, ProviderDraft, ProviderId, ProviderService,
    ProviderStore,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

/// A store that counts calls and delegates to a [`MemoryProviderStore`]
#[derive(Default)]
pub struct MockProviderStore {
    inner: MemoryProviderStore,
    /// When set, `list_active` reports an empty set, as a reader racing a
    /// concurrent writer would see
    stale_reads: bool,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    soft_delete_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose active-set reads never see existing rows
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn soft_delete_call_count(&self) -> usize {
        self.soft_delete_calls.load(Ordering::SeqCst)
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Total number of mutating calls
    pub fn mutation_count(&self) -> usize {
        self.create_call_count() + self.update_call_count() + self.soft_delete_call_count()
    }

    /// Raw row lookup, soft-deleted rows included
    pub async fn row(&self, id: ProviderId) -> Option<Provider> {
        self.inner.get_any(id).await
    }

    pub async fn row_count(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl ProviderStore for MockProviderStore {
    async fn create(&self, provider: Provider) -> Result<Provider> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(provider).await
    }

    async fn get_active_by_id(&self, id: ProviderId) -> Result<Option<Provider>> {
        self.inner.get_active_by_id(id).await
    }

    async fn list_active(&self) -> Result<Vec<Provider>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.stale_reads {
            return Ok(Vec::new());
        }
        self.inner.list_active().await
    }

    async fn update(&self, provider: &Provider) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(provider).await
    }

    async fn soft_delete(&self, provider: &Provider) -> Result<()> {
        self.soft_delete_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.soft_delete(provider).await
    }
}

/// A clock that advances one minute on every reading
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2025, 1, 9, 12, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }

    /// Time returned by the `n`th reading, counting from zero
    pub fn reading(&self, n: i64) -> DateTime<Utc> {
        self.start + Duration::minutes(n)
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.reading(n)
    }
}

/// Build a service over `store` with a stepping clock
pub fn service_with(store: &Arc<MockProviderStore>) -> ProviderService {
    ProviderService::new(store.clone()).with_clock(Arc::new(SteppingClock::new()))
}

const NAMES: [&str; 6] = ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"];

/// A valid draft distinct from every other `sample_draft(n)`
pub fn sample_draft(n: usize) -> ProviderDraft {
    ProviderDraft::new(NAMES[n % NAMES.len()], "Sample", format!("555000{n}"))
        .with_email(format!("sample{n}@example.com"))
}

/// Register `count` sample providers, returning them in id order
pub async fn seed(service: &ProviderService, count: usize) -> Vec<Provider> {
    let mut created = Vec::with_capacity(count);
    for n in 1..=count {
        let provider = service
            .register(sample_draft(n), ActorId(1))
            .await
            .expect("seed registration succeeds");
        created.push(provider);
    }
    created
}
