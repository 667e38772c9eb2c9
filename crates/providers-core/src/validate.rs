//! Field validation
//!
//! [`ProviderValidator`] applies every rule to every field in a single pass and
//! collects all violations into [`ValidationErrors`]. It never stops at the
//! first failure, so one call can report several messages for one field and
//! errors for several fields at once.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::model::{Field, Provider};

/// Shortest accepted name, in characters
pub const NAME_MIN_CHARS: usize = 2;

/// Longest accepted name, in characters
pub const NAME_MAX_CHARS: usize = 50;

/// Longest accepted email, in characters
pub const EMAIL_MAX_CHARS: usize = 100;

/// Latin letters, including accented ones, and spaces
static LETTERS_AND_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ ]+$").expect("letters pattern is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// 7 to 12 digits, optionally followed by `-` and one check digit
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{7,12}(-[0-9])?$").expect("phone pattern is valid")
});

/// Field-tagged validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Whether no rule was violated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Whether `field` has at least one message
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Messages recorded for `field`
    pub fn messages(&self, field: Field) -> &[String] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Fields with at least one message, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.keys().copied()
    }

    /// One entry per field, multiple messages joined with `"; "`
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str().to_string(), messages.join("; ")))
            .collect()
    }

    /// `Ok(())` when empty, otherwise the errors themselves
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, messages.join("; "))?;
            first = false;
        }
        Ok(())
    }
}

/// Rule engine over a record type
///
/// Implementations must be stateless with respect to the record: calling
/// `validate` twice on the same input yields the same errors.
pub trait Validator<T>: Send + Sync {
    /// Check `record` against every rule, returning all violations
    fn validate(&self, record: &T) -> ValidationErrors;
}

/// Built-in rules for [`Provider`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderValidator;

impl ProviderValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_name(errors: &mut ValidationErrors, field: Field, label: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            errors.add(field, format!("{label} is required"));
            return;
        }

        let len = value.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
            errors.add(
                field,
                format!("{label} must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"),
            );
        }

        if !LETTERS_AND_SPACES.is_match(value) {
            errors.add(field, format!("{label} may only contain letters and spaces"));
        }
    }

    fn check_email(errors: &mut ValidationErrors, value: &str) {
        // Email is optional
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        if value.chars().count() > EMAIL_MAX_CHARS {
            errors.add(
                Field::Email,
                format!("email must not exceed {EMAIL_MAX_CHARS} characters"),
            );
        }

        if !EMAIL.is_match(value) {
            errors.add(Field::Email, "email is not a valid address");
        }
    }

    fn check_phone(errors: &mut ValidationErrors, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            errors.add(Field::Phone, "phone is required");
        } else if !PHONE.is_match(value) {
            errors.add(
                Field::Phone,
                "phone must have 7 to 12 digits, optionally followed by a hyphen and a check digit",
            );
        }
    }
}

impl Validator<Provider> for ProviderValidator {
    fn validate(&self, record: &Provider) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        Self::check_name(&mut errors, Field::FirstName, "first name", &record.first_name);
        Self::check_name(&mut errors, Field::LastName, "last name", &record.last_name);
        Self::check_email(&mut errors, record.email_str());
        Self::check_phone(&mut errors, &record.phone);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProviderDraft;

    fn valid() -> Provider {
        Provider::from_draft(
            ProviderDraft::new("Ana Maria", "Lopez", "5551234").with_email("ana@example.com"),
        )
    }

    fn validate(provider: &Provider) -> ValidationErrors {
        ProviderValidator::new().validate(provider)
    }

    #[test]
    fn test_valid_record_has_no_errors() {
        assert!(validate(&valid()).is_empty());
    }

    #[test]
    fn test_accented_names_are_letters() {
        let mut provider = valid();
        provider.first_name = "José Ñúñez".into();
        provider.last_name = "Müller".into();
        assert!(validate(&provider).is_empty());
    }

    #[test]
    fn test_single_character_name() {
        let mut provider = valid();
        provider.first_name = "A".into();

        let errors = validate(&provider);
        assert!(errors.contains(Field::FirstName));
        assert_eq!(errors.messages(Field::FirstName).len(), 1);
        assert!(!errors.contains(Field::LastName));
    }

    #[test]
    fn test_name_reports_length_and_charset_together() {
        let mut provider = valid();
        provider.last_name = "7".into();

        let errors = validate(&provider);
        assert_eq!(errors.messages(Field::LastName).len(), 2);
        assert_eq!(
            errors.to_map()["last_name"],
            "last name must be between 2 and 50 characters; last name may only contain letters and spaces"
        );
    }

    #[test]
    fn test_empty_name_is_required_only() {
        let mut provider = valid();
        provider.first_name = "   ".into();

        let errors = validate(&provider);
        assert_eq!(errors.messages(Field::FirstName), ["first name is required"]);
    }

    #[test]
    fn test_name_length_bounds() {
        let mut provider = valid();
        provider.first_name = "a".repeat(NAME_MAX_CHARS);
        assert!(validate(&provider).is_empty());

        provider.first_name = "a".repeat(NAME_MAX_CHARS + 1);
        assert!(validate(&provider).contains(Field::FirstName));
    }

    #[test]
    fn test_email_optional() {
        let mut provider = valid();
        provider.email = None;
        assert!(validate(&provider).is_empty());

        provider.email = Some(String::new());
        assert!(validate(&provider).is_empty());
    }

    #[test]
    fn test_email_shape_and_length() {
        let mut provider = valid();
        provider.email = Some("not-an-email".into());
        assert_eq!(validate(&provider).messages(Field::Email).len(), 1);

        provider.email = Some(format!("{}@example.com", "a".repeat(95)));
        assert_eq!(
            validate(&provider).messages(Field::Email),
            ["email must not exceed 100 characters"]
        );
    }

    #[test]
    fn test_phone_rules() {
        let mut provider = valid();
        for ok in ["5551234", "555123456789", "5551234-7"] {
            provider.phone = ok.into();
            assert!(validate(&provider).is_empty(), "{ok} should be valid");
        }

        for bad in ["555123", "5551234567890", "555-1234", "5551234-12", "55512a4"] {
            provider.phone = bad.into();
            assert!(validate(&provider).contains(Field::Phone), "{bad} should be rejected");
        }

        provider.phone = String::new();
        assert_eq!(validate(&provider).messages(Field::Phone), ["phone is required"]);
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let provider = Provider::from_draft(ProviderDraft {
            first_name: "A".into(),
            last_name: String::new(),
            email: Some("bad".into()),
            phone: None,
        });

        let errors = validate(&provider);
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![Field::FirstName, Field::LastName, Field::Email, Field::Phone]
        );
        assert_eq!(errors.len(), 4);
    }
}
