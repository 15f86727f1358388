//! Domain error types for formbridge.
//!
//! Each service has a structured error enum; the HTTP layer maps them onto the
//! 400/404/500 contract via the `is_client_error` / `is_not_found` helpers.

use thiserror::Error;

/// Errors raised while parsing or validating a form's field configuration.
#[derive(Error, Debug)]
pub enum FieldConfigError {
    /// The stored `fieldConfigs` value is not a JSON array
    #[error("Field configs must be a JSON array")]
    NotAnArray,

    /// A descriptor has no `dataFormat` and no nested `fields` group
    #[error("Field '{0}' is missing a data format")]
    MissingDataFormat(String),

    /// Unrecognised `dataFormat` value
    #[error("Unknown data format '{format}' on field '{name}'")]
    UnknownDataFormat { name: String, format: String },

    /// `options` supplied for a non-choice field
    #[error("Field '{0}' carries options but is not a choice field")]
    UnexpectedOptions(String),

    /// Both static `options` and a remote `optionSource` supplied
    #[error("Field '{0}' carries both options and an option source")]
    AmbiguousChoiceSource(String),

    /// Two descriptors share the same name within one form
    #[error("Duplicate field name '{0}'")]
    DuplicateName(String),

    /// Blank or missing field name
    #[error("Field name cannot be empty")]
    EmptyName,

    /// A grouped descriptor with no members
    #[error("Field group '{0}' has no members")]
    EmptyGroup(String),

    /// Groups render one level deep only
    #[error("Field group '{0}' nests another group")]
    NestedGroup(String),

    /// JSON deserialization error
    #[error("Invalid field configs: {0}")]
    Json(#[from] serde_json::Error),
}

/// Salesforce form operation errors
#[derive(Error, Debug)]
pub enum FormError {
    /// Form not found by ID
    #[error("Salesforce form {0} not found")]
    NotFound(i32),

    /// Form not found by name
    #[error("Salesforce form '{0}' not found")]
    NameNotFound(String),

    /// Another form already uses this name within the locale
    #[error("Form name \"{name}\" already exists in locale \"{locale}\"")]
    AlreadyExists { name: String, locale: String },

    /// Field configuration failed validation
    #[error("Invalid field configuration: {0}")]
    FieldConfig(#[from] FieldConfigError),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl FormError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FormError::AlreadyExists { .. } | FormError::FieldConfig(_)
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, FormError::NotFound(_) | FormError::NameNotFound(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            FormError::NotFound(_) | FormError::NameNotFound(_) => "NOT_FOUND",
            FormError::AlreadyExists { .. } => "CONFLICT",
            FormError::FieldConfig(_) => "VALIDATION_FAILED",
            FormError::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Form submission operation errors
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// Submission not found by ID
    #[error("Form submission {0} not found")]
    NotFound(i32),

    /// Submission not found by generated code
    #[error("Form submission with code '{0}' not found")]
    CodeNotFound(String),

    /// The referenced salesforce form does not exist
    #[error("Salesforce form {0} not found")]
    FormNotFound(i32),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Spreadsheet export failed
    #[error("Export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl SubmissionError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SubmissionError::NotFound(_)
                | SubmissionError::CodeNotFound(_)
                | SubmissionError::FormNotFound(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SubmissionError::NotFound(_)
            | SubmissionError::CodeNotFound(_)
            | SubmissionError::FormNotFound(_) => "NOT_FOUND",
            SubmissionError::Database(_) => "DATABASE_ERROR",
            SubmissionError::Xlsx(_) => "EXPORT_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_is_client_error() {
        let err = FormError::AlreadyExists {
            name: "contact-us".to_string(),
            locale: "en".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Form name \"contact-us\" already exists in locale \"en\""
        );
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn test_form_not_found() {
        let err = FormError::NotFound(42);
        assert_eq!(err.to_string(), "Salesforce form 42 not found");
        assert!(err.is_not_found());
        assert!(!err.is_client_error());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_field_config_error_wraps_as_client_error() {
        let err = FormError::FieldConfig(FieldConfigError::DuplicateName("email".to_string()));
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_submission_code_not_found() {
        let err = SubmissionError::CodeNotFound("abc-123".to_string());
        assert_eq!(
            err.to_string(),
            "Form submission with code 'abc-123' not found"
        );
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
