//! Field-level validation shared by the JSON API and the dashboard forms.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire
    pub field: String,
    /// Why the value was rejected
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every field that failed validation for one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn field_errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_field_errors(self) -> Vec<FieldError> {
        self.0
    }
}

/// Length of the hyphenated form, e.g. `67e55044-10b1-426f-9247-bb680e5fe0c8`.
const HYPHENATED_UUID_LEN: usize = 36;

/// Parses a UUID written in the hyphenated form. The simple, braced and URN forms are rejected.
pub fn parse_hyphenated_uuid(raw: &str) -> Option<Uuid> {
    if raw.len() != HYPHENATED_UUID_LEN {
        return None;
    }
    Uuid::try_parse(raw).ok()
}

/// Collects field errors while a request is being validated.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A value that must be present and contain something other than whitespace.
    pub(crate) fn required_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.errors
                    .push(FieldError::new(field, format!("{field} is required")));
                None
            }
            Some(text) => self.non_empty_text(field, text),
        }
    }

    /// A value that, when supplied, must contain something other than whitespace.
    pub(crate) fn optional_text(
        &mut self,
        field: &str,
        value: Option<String>,
    ) -> Option<Option<String>> {
        match value {
            None => Some(None),
            Some(text) => self.non_empty_text(field, text).map(Some),
        }
    }

    /// Like `required_text`, but also caps the length at `max` characters.
    pub(crate) fn required_text_max(
        &mut self,
        field: &str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        let text = self.required_text(field, value)?;
        if text.chars().count() > max {
            self.errors.push(FieldError::new(
                field,
                format!("{field} must be at most {max} characters"),
            ));
            return None;
        }
        Some(text)
    }

    pub(crate) fn required_uuid(&mut self, field: &str, value: Option<String>) -> Option<Uuid> {
        let text = self.required_text(field, value)?;
        match parse_hyphenated_uuid(&text) {
            Some(id) => Some(id),
            None => {
                self.errors
                    .push(FieldError::new(field, format!("{field} must be a UUID")));
                None
            }
        }
    }

    pub(crate) fn priority(
        &mut self,
        field: &str,
        value: Option<String>,
    ) -> Option<Option<TaskPriority>> {
        match value {
            None => Some(None),
            Some(text) => match TaskPriority::parse(&text) {
                Some(priority) => Some(Some(priority)),
                None => {
                    self.errors.push(FieldError::new(
                        field,
                        format!("{field} must be one of: High, Medium, Low"),
                    ));
                    None
                }
            },
        }
    }

    pub(crate) fn status(
        &mut self,
        field: &str,
        value: Option<String>,
    ) -> Option<Option<TaskStatus>> {
        match value {
            None => Some(None),
            Some(text) => match TaskStatus::parse(&text) {
                Some(status) => Some(Some(status)),
                None => {
                    self.errors.push(FieldError::new(
                        field,
                        format!("{field} must be one of: Pending, In Progress, Complete"),
                    ));
                    None
                }
            },
        }
    }

    /// Ends validation, returning the collected errors if there were any.
    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }

    fn non_empty_text(&mut self, field: &str, text: String) -> Option<String> {
        if text.trim().is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{field} must not be empty")));
            None
        } else {
            Some(text)
        }
    }
}
