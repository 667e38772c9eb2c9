//! Input normalization
//!
//! Canonicalizes caller-supplied text before it is validated or compared.
//! Every function here is total and idempotent.

use crate::model::ProviderDraft;

/// Trim and collapse internal whitespace runs to a single space
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim and lower-case an email; absent input yields an empty string
pub fn normalize_email(raw: Option<&str>) -> String {
    raw.map(|email| email.trim().to_lowercase())
        .unwrap_or_default()
}

/// Trim a phone number; absent input yields an empty string
pub fn normalize_phone(raw: Option<&str>) -> String {
    raw.map(|phone| phone.trim().to_string()).unwrap_or_default()
}

impl ProviderDraft {
    /// Return a copy of the draft with every field normalized
    ///
    /// Contact fields come back as `Some`, possibly holding an empty string, so
    /// the result is a fixed point: normalizing it again changes nothing.
    pub fn normalize(&self) -> ProviderDraft {
        ProviderDraft {
            first_name: normalize_name(&self.first_name),
            last_name: normalize_name(&self.last_name),
            email: Some(normalize_email(self.email.as_deref())),
            phone: Some(normalize_phone(self.phone.as_deref())),
        }
    }
}
