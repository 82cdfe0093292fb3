use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use unicode_normalization::UnicodeNormalization as _;

use crate::record::{ContactRecord, Field, RawSubmission};

/// A `local@domain.tld` shaped address: no whitespace and exactly one `@`, followed by
/// a domain containing at least one dot.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile the email pattern")
});

/// The minimum number of digits of a phone number.
pub const MINIMUM_PHONE_DIGITS: usize = 10;

/// The kind of rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    Invalid,
    TooShort,
}

impl FieldErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::Required => "required",
            FieldErrorKind::Invalid => "invalid",
            FieldErrorKind::TooShort => "too_short",
        }
    }
}

/// A failed rule on a single field, together with the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    fn name_required() -> Self {
        FieldError {
            kind: FieldErrorKind::Required,
            message: "Name is required",
        }
    }

    fn email_invalid() -> Self {
        FieldError {
            kind: FieldErrorKind::Invalid,
            message: "Invalid email",
        }
    }

    fn phone_invalid() -> Self {
        FieldError {
            kind: FieldErrorKind::Invalid,
            message: "Phone must contain only digits",
        }
    }

    fn phone_too_short() -> Self {
        FieldError {
            kind: FieldErrorKind::TooShort,
            message: "Phone must be at least 10 digits",
        }
    }
}

/// All the field errors of a submission. Every field is checked, so the user interface
/// is able to show all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the failing fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .iter()
            .map(|(field, error)| format!("{}: {}", field, error.message))
            .collect::<Vec<_>>();
        write!(formatter, "{}", messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Serialized as `{ "field": "message" }`, which is what the form displays inline.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(field, error)| (field.key(), error.message)))
    }
}

/// Validates and normalizes a raw submission.
///
/// Values are trimmed and NFC-normalized first. Each rule is evaluated on its own field
/// only: a failing name never prevents the email or the phone from being checked.
/// On success the returned record satisfies every invariant of `ContactRecord`.
pub fn validate(submission: &RawSubmission) -> Result<ContactRecord, ValidationErrors> {
    let normalized = |field: Field| normalize(submission.value(field));

    let name = normalized(Field::Name);
    let email = normalized(Field::Email);
    let phone = normalized(Field::Phone);
    let position = normalized(Field::Position);
    let description = normalized(Field::Description);

    let mut errors = ValidationErrors::default();
    if let Some(error) = check_name(&name) {
        errors.insert(Field::Name, error);
    }
    if let Some(error) = check_email(&email) {
        errors.insert(Field::Email, error);
    }
    if let Some(error) = check_phone(&phone) {
        errors.insert(Field::Phone, error);
    }

    if !errors.is_empty() {
        log::debug!("Rejected the submission: {}", errors);
        return Err(errors);
    }

    Ok(ContactRecord::from_normalized_fields(
        name,
        email,
        phone,
        position,
        description,
    ))
}

/// Trims the value and brings it into the NFC form, absent values become empty strings.
fn normalize(value: Option<&str>) -> String {
    value
        .map(|value| value.trim_matches(is_trimmed).nfc().collect())
        .unwrap_or_default()
}

/// Whitespace, and the byte order mark which browser form fields trim as well.
fn is_trimmed(character: char) -> bool {
    character.is_whitespace() || character == '\u{feff}'
}

fn check_name(name: &str) -> Option<FieldError> {
    name.is_empty().then(FieldError::name_required)
}

fn check_email(email: &str) -> Option<FieldError> {
    (!EMAIL_PATTERN.is_match(email)).then(FieldError::email_invalid)
}

/// A non-digit character makes the phone invalid regardless of its length, the length is
/// only checked on digit-only values.
fn check_phone(phone: &str) -> Option<FieldError> {
    if !phone.chars().all(|character| character.is_ascii_digit()) {
        return Some(FieldError::phone_invalid());
    }
    (phone.len() < MINIMUM_PHONE_DIGITS).then(FieldError::phone_too_short)
}
