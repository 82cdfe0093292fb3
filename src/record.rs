use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContextError;
use crate::validation::{validate, ValidationErrors};

/// The fields collected by the contact form, in the order in which they are displayed,
/// validated and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Position,
    Description,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Position,
        Field::Description,
    ];

    /// The key of the field in JSON submissions and error maps.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Position => "position",
            Field::Description => "description",
        }
    }

    /// The bold label printed in front of the value in the rendered document.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name:",
            Field::Email => "Email:",
            Field::Phone => "Phone:",
            Field::Position => "Position:",
            Field::Description => "Description:",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.key())
    }
}

/// The values of a form submission exactly as they were entered, before any trimming
/// or validation. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
}

impl RawSubmission {
    /// Reads a raw submission from a JSON file, where any of the keys may be missing.
    pub fn from_path(submission_path: &Path) -> Result<Self, ContextError> {
        let submission_content = std::fs::read_to_string(submission_path).map_err(|error| {
            ContextError::with_error(
                format!("Unable to read the submission {:?}", submission_path),
                &error,
            )
        })?;
        serde_json::from_str(&submission_content).map_err(|error| {
            ContextError::with_error(
                format!("Unable to parse the submission {:?}", submission_path),
                &error,
            )
        })
    }

    /// The raw value entered for the given field, if any.
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Position => self.position.as_deref(),
            Field::Description => self.description.as_deref(),
        }
    }

    /// Fills the given field only if nothing was entered for it yet.
    pub fn fill_if_missing(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Position => &mut self.position,
            Field::Description => &mut self.description,
        };
        if slot.as_deref().map_or(true, |current| current.trim().is_empty()) {
            *slot = Some(value);
        }
    }
}

/// A validated and normalized contact. It can only be obtained through [`validate`],
/// which makes it impossible to render a document from unchecked input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    name: String,
    email: String,
    phone: String,
    position: String,
    description: String,
}

impl ContactRecord {
    /// Only the validator builds records, after having checked every invariant.
    pub(crate) fn from_normalized_fields(
        name: String,
        email: String,
        phone: String,
        position: String,
        description: String,
    ) -> Self {
        ContactRecord {
            name,
            email,
            phone,
            position,
            description,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The normalized value of the given field, empty for absent optional fields.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Position => &self.position,
            Field::Description => &self.description,
        }
    }

    /// Serializes the record into the JSON object handed from the validation step to the
    /// rendering step.
    pub fn to_json(&self) -> Result<String, ContextError> {
        serde_json::to_string_pretty(self)
            .map_err(|error| ContextError::with_error("Unable to serialize the record", &error))
    }

    /// Reads a record back from its JSON form. The payload goes through the validator
    /// again, so a tampered or stale record is rejected with the usual field errors.
    pub fn from_json(json: &str) -> Result<Result<Self, ValidationErrors>, ContextError> {
        let submission: RawSubmission = serde_json::from_str(json)
            .map_err(|error| ContextError::with_error("Unable to parse the record", &error))?;

        Ok(validate(&submission))
    }
}

impl From<&ContactRecord> for RawSubmission {
    fn from(record: &ContactRecord) -> Self {
        RawSubmission {
            name: Some(record.name.clone()),
            email: Some(record.email.clone()),
            phone: Some(record.phone.clone()),
            position: Some(record.position.clone()),
            description: Some(record.description.clone()),
        }
    }
}
