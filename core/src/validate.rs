//! Structural validation of request parameters.
//!
//! Every failing field is reported, not just the first. Field names use the
//! vendor's parameter names so messages line up with the API documentation.

use crate::types::{
    CreatePropertyVersionRequest, GetLatestVersionRequest, GetPropertyVersionRequest,
    GetPropertyVersionsRequest, PropertyVersionCreate,
};

const BLANK: &str = "cannot be blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field failures of one request, kept sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}.", join_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self.errors.sort_by(|a, b| a.field.cmp(&b.field));
    }

    /// Merge a nested struct's errors under `prefix`.
    pub fn nest(&mut self, prefix: &str, nested: ValidationErrors) {
        for err in nested.errors {
            self.add(format!("{prefix}.{}", err.field), err.message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn required_str(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, BLANK);
    }
}

fn required_num(errors: &mut ValidationErrors, field: &str, value: u32) {
    if value == 0 {
        errors.add(field, BLANK);
    }
}

impl Validate for GetPropertyVersionsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_str(&mut errors, "PropertyID", &self.property_id);
        errors.into_result()
    }
}

impl Validate for GetLatestVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_str(&mut errors, "PropertyID", &self.property_id);
        errors.into_result()
    }
}

impl Validate for GetPropertyVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_str(&mut errors, "PropertyID", &self.property_id);
        required_num(&mut errors, "PropertyVersion", self.property_version);
        errors.into_result()
    }
}

impl Validate for PropertyVersionCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_num(&mut errors, "CreateFromVersion", self.create_from_version);
        errors.into_result()
    }
}

impl Validate for CreatePropertyVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_str(&mut errors, "PropertyID", &self.property_id);
        if let Err(nested) = self.version.validate() {
            errors.nest("Version", nested);
        }
        errors.into_result()
    }
}
