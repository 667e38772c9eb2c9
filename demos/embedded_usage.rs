//! Minimal embedding example for providers-core
//!
//! This example demonstrates using providers-core as a library in a custom
//! application. The application owns the store and hands it to the service.

use providers_core::{
    ActorId, Error, MemoryProviderStore, ProviderDraft, ProviderService, Result,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Keep a handle on the store to show soft-deleted rows afterwards
    let store = MemoryProviderStore::new();
    let service = ProviderService::new(Arc::new(store.clone()));

    let ana = service
        .register(
            ProviderDraft::new("  Ana   Maria ", "Lopez", " 5551234 ").with_email("ANA@Example.com"),
            ActorId(7),
        )
        .await?;
    info!("Registered {:?}", ana);

    service
        .register(ProviderDraft::new("Luis", "Gomez", "5559876"), ActorId(7))
        .await?;

    // Same email in another casing is rejected
    match service
        .register(
            ProviderDraft::new("Ana", "Perez", "5550000").with_email("ana@EXAMPLE.com"),
            ActorId(8),
        )
        .await
    {
        Err(Error::Conflict { field }) => info!("Rejected duplicate {}", field),
        other => {
            warn!("Expected an email conflict, got {:?}", other);
            return Err(Error::Other("duplicate email was not rejected".to_string()));
        }
    }

    // Change only the phone; the email stays the record's own
    let draft = ProviderDraft::from(&ana).with_phone("5551235");
    service.update(ana.id, draft, ActorId(8)).await?;

    for provider in service.list().await? {
        info!(
            "{} {} <{}> {}",
            provider.first_name,
            provider.last_name,
            provider.email_str(),
            provider.phone
        );
    }

    service.soft_delete(ana.id, ActorId(9)).await?;
    info!("Active after delete: {}", service.list().await?.len());
    info!("Rows kept in store: {}", store.len().await);

    Ok(())
}
