//! Provider record types
//!
//! [`Provider`] is the stored entity. [`ProviderDraft`] is what a caller submits
//! when registering or revising a provider: only the free-text fields, never the
//! identity, deletion flag or audit columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage-assigned provider identity
pub type ProviderId = i64;

/// Id carried by a record that has not been persisted yet
pub const UNPERSISTED_ID: ProviderId = 0;

/// Opaque identifier of the caller performing a mutation
///
/// The core never derives this value; it is supplied by whatever boundary
/// authenticated the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub i64);

impl ActorId {
    /// Parse a raw actor value, falling back to `0` when absent or unparsable
    ///
    /// # Example
    ///
    /// ```rust
    /// use providers_core::ActorId;
    ///
    /// assert_eq!(ActorId::parse_or_default(Some(" 42 ")), ActorId(42));
    /// assert_eq!(ActorId::parse_or_default(Some("admin")), ActorId(0));
    /// assert_eq!(ActorId::parse_or_default(None), ActorId(0));
    /// ```
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .map(ActorId)
            .unwrap_or_default()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ActorId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Fields subject to validation and uniqueness rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl Field {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider record as held by storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Storage-assigned identity, [`UNPERSISTED_ID`] until created
    pub id: ProviderId,
    pub first_name: String,
    pub last_name: String,
    /// Optional contact email, never stored as an empty string
    pub email: Option<String>,
    pub phone: String,
    /// Soft-delete marker
    pub is_deleted: bool,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub updated_by: ActorId,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Build an unpersisted record from a draft
    ///
    /// Audit columns are left at their defaults; the service stamps them
    /// before the record reaches storage.
    pub fn from_draft(draft: ProviderDraft) -> Self {
        let mut provider = Self {
            id: UNPERSISTED_ID,
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            phone: String::new(),
            is_deleted: false,
            created_by: ActorId::default(),
            created_at: DateTime::<Utc>::default(),
            updated_by: ActorId::default(),
            updated_at: DateTime::<Utc>::default(),
        };
        provider.apply_draft(draft);
        provider
    }

    /// Overwrite the free-text fields with the values of `draft`
    pub fn apply_draft(&mut self, draft: ProviderDraft) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.email = draft.email.filter(|email| !email.is_empty());
        self.phone = draft.phone.unwrap_or_default();
    }

    /// Whether storage has assigned an id to this record
    pub fn is_persisted(&self) -> bool {
        self.id != UNPERSISTED_ID
    }

    /// Whether the record is part of the active set
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Email as a plain string, empty when absent
    pub fn email_str(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

/// Caller-supplied values for a registration or a revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProviderDraft {
    /// Create a draft with the required fields set
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: Some(phone.into()),
        }
    }

    /// Set the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl From<&Provider> for ProviderDraft {
    fn from(provider: &Provider) -> Self {
        Self {
            first_name: provider.first_name.clone(),
            last_name: provider.last_name.clone(),
            email: provider.email.clone(),
            phone: Some(provider.phone.clone()),
        }
    }
}

/// Order records by last name, then first name
pub fn sort_by_name(providers: &mut [Provider]) {
    providers.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}
