//! Contact-field uniqueness among active records
//!
//! A candidate collides when some *other* active record has the same email
//! (case-insensitive) or the same phone (exact, after trimming). The candidate's
//! own id is excluded so that a revision may keep its current contact values.
//! A blank email never collides.
//!
//! Email is checked before phone and only the first collision is reported.

use crate::error::{Error, Result};
use crate::model::{Field, Provider};

/// Checks a candidate record against an active set
#[derive(Debug, Clone, Copy, Default)]
pub struct UniquenessGuard;

impl UniquenessGuard {
    pub fn new() -> Self {
        Self
    }

    /// Fail with [`Error::Conflict`] if the candidate collides with another record
    ///
    /// Records in `existing` that are soft-deleted or share the candidate's id
    /// are ignored, so callers may pass either the active set or a full table.
    pub fn check<'a, I>(&self, existing: I, candidate: &Provider) -> Result<()>
    where
        I: IntoIterator<Item = &'a Provider>,
    {
        match self.find_conflict(existing, candidate) {
            Some(field) => Err(Error::conflict(field)),
            None => Ok(()),
        }
    }

    /// The first colliding field, if any
    pub fn find_conflict<'a, I>(&self, existing: I, candidate: &Provider) -> Option<Field>
    where
        I: IntoIterator<Item = &'a Provider>,
    {
        let email = candidate.email_str().trim();
        let phone = candidate.phone.trim();

        let others: Vec<&Provider> = existing
            .into_iter()
            .filter(|other| other.is_active() && !is_same_record(other, candidate))
            .collect();

        if !email.is_empty()
            && others
                .iter()
                .any(|other| other.email_str().trim().to_lowercase() == email.to_lowercase())
        {
            return Some(Field::Email);
        }

        if !phone.is_empty() && others.iter().any(|other| other.phone.trim() == phone) {
            return Some(Field::Phone);
        }

        None
    }
}

fn is_same_record(other: &Provider, candidate: &Provider) -> bool {
    candidate.is_persisted() && other.id == candidate.id
}
