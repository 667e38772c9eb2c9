//! Contract Test: Registration
//!
//! Constraints verified:
//! - Input is normalized before it is validated and stored
//! - Validation failures report every violated rule and never reach the store
//! - Email collisions are case-insensitive and win over phone collisions
//! - Creation stamps `created_*` and mirrors it into `updated_*`

mod common;

use common::*;
use providers_core::{ActorId, Error, Field, ProviderDraft};
use std::sync::Arc;

#[tokio::test]
async fn register_normalizes_and_stamps_new_record() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    let draft = ProviderDraft {
        first_name: "  Ana   Maria ".into(),
        last_name: "Lopez".into(),
        email: Some("ANA@Example.com".into()),
        phone: Some(" 5551234 ".into()),
    };

    let created = service.register(draft, ActorId(7)).await.unwrap();

    assert!(created.id > 0, "storage assigns an id");
    assert_eq!(created.first_name, "Ana Maria");
    assert_eq!(created.last_name, "Lopez");
    assert_eq!(created.email.as_deref(), Some("ana@example.com"));
    assert_eq!(created.phone, "5551234");
    assert!(!created.is_deleted);
    assert_eq!(created.created_by, ActorId(7));
    assert_eq!(created.updated_by, ActorId(7));
    assert_eq!(created.created_at, created.updated_at);

    let stored = store.row(created.id).await.expect("row exists");
    assert_eq!(stored, created);
}

#[tokio::test]
async fn duplicate_email_in_any_casing_is_a_conflict() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    service
        .register(
            ProviderDraft::new("Ana Maria", "Lopez", "5551234").with_email("ana@example.com"),
            ActorId(7),
        )
        .await
        .unwrap();

    let err = service
        .register(
            ProviderDraft::new("Ana", "Perez", "5559876").with_email(" Ana@EXAMPLE.com "),
            ActorId(8),
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Conflict { field: Field::Email }),
        "expected email conflict, got {err:?}"
    );
    assert_eq!(store.create_call_count(), 1, "no record is created on conflict");
    assert_eq!(store.row_count().await, 1);
}

#[tokio::test]
async fn duplicate_phone_is_a_conflict() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    service
        .register(ProviderDraft::new("Ana", "Lopez", "5551234"), ActorId(1))
        .await
        .unwrap();

    let err = service
        .register(ProviderDraft::new("Luis", "Gomez", " 5551234"), ActorId(1))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Conflict { field: Field::Phone }));
}

#[tokio::test]
async fn email_is_reported_before_phone() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    let first = sample_draft(1);
    service.register(first.clone(), ActorId(1)).await.unwrap();

    let err = service.register(first, ActorId(1)).await.unwrap_err();
    assert!(matches!(err, Error::Conflict { field: Field::Email }));
}

#[tokio::test]
async fn providers_without_email_do_not_collide() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    let a = service
        .register(ProviderDraft::new("Ana", "Lopez", "5551234"), ActorId(1))
        .await
        .unwrap();
    let b = service
        .register(
            ProviderDraft::new("Luis", "Gomez", "5559876").with_email("   "),
            ActorId(1),
        )
        .await
        .unwrap();

    assert_eq!(a.email, None);
    assert_eq!(b.email, None);
    assert_eq!(service.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_input_reports_every_rule_and_skips_store() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    let draft = ProviderDraft {
        first_name: "J".into(),
        last_name: "0".into(),
        email: Some("no-at-sign".into()),
        phone: Some("12-34".into()),
    };

    let err = service.register(draft, ActorId(1)).await.unwrap_err();
    let errors = match err {
        Error::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };

    assert_eq!(errors.messages(Field::FirstName).len(), 1);
    assert_eq!(errors.messages(Field::LastName).len(), 2);
    assert_eq!(errors.messages(Field::Email).len(), 1);
    assert_eq!(errors.messages(Field::Phone).len(), 1);
    assert!(errors.to_map()["last_name"].contains("; "));

    assert_eq!(store.list_call_count(), 0, "validation fails before the uniqueness scan");
    assert_eq!(store.mutation_count(), 0);
}

#[tokio::test]
async fn shortening_a_valid_name_flags_only_that_field() {
    let store = Arc::new(MockProviderStore::new());
    let service = service_with(&store);

    let mut draft = sample_draft(1);
    draft.last_name = "S".into();

    let err = service.register(draft, ActorId(1)).await.unwrap_err();
    let errors = match err {
        Error::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::LastName]);
}
