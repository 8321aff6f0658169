//! Model validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length for model IDs
pub const MAX_MODEL_ID_LENGTH: usize = 50;

/// Maximum length for model display names
pub const MAX_MODEL_NAME_LENGTH: usize = 100;

/// Regex pattern for valid model IDs (alphanumeric + hyphens)
static MODEL_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$")
        .expect("model id pattern is valid")
});

/// Model validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelValidationError {
    #[error("Model ID cannot be empty")]
    EmptyId,

    #[error("Model ID too long: {length} characters (max {max})")]
    IdTooLong { length: usize, max: usize },

    #[error(
        "Invalid model ID format '{id}': must be alphanumeric with hyphens, cannot start or end with hyphen"
    )]
    InvalidIdFormat { id: String },

    #[error("Model name cannot be empty")]
    EmptyName,

    #[error("Model name too long: {length} characters (max {max})")]
    NameTooLong { length: usize, max: usize },

    #[error("Unknown provider '{0}': expected one of aws, azure, gcp, anthropic, openai, custom")]
    UnknownProvider(String),
}

/// Validate a model ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
/// - Only alphanumeric characters and hyphens
/// - Must start and end with alphanumeric
pub fn validate_model_id(id: &str) -> Result<(), ModelValidationError> {
    if id.is_empty() {
        return Err(ModelValidationError::EmptyId);
    }

    if id.len() > MAX_MODEL_ID_LENGTH {
        return Err(ModelValidationError::IdTooLong {
            length: id.len(),
            max: MAX_MODEL_ID_LENGTH,
        });
    }

    if !MODEL_ID_PATTERN.is_match(id) {
        return Err(ModelValidationError::InvalidIdFormat { id: id.to_string() });
    }

    Ok(())
}

/// Validate a model display name
pub fn validate_model_name(name: &str) -> Result<(), ModelValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ModelValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_MODEL_NAME_LENGTH {
        return Err(ModelValidationError::NameTooLong {
            length: trimmed.chars().count(),
            max: MAX_MODEL_NAME_LENGTH,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_model_ids() {
        assert!(validate_model_id("1").is_ok());
        assert!(validate_model_id("gpt-4-turbo").is_ok());
        assert!(validate_model_id("1718000000000").is_ok());
    }

    #[test]
    fn test_invalid_model_ids() {
        assert_eq!(validate_model_id(""), Err(ModelValidationError::EmptyId));
        assert!(matches!(
            validate_model_id("-model"),
            Err(ModelValidationError::InvalidIdFormat { .. })
        ));
        assert!(matches!(
            validate_model_id("model_1"),
            Err(ModelValidationError::InvalidIdFormat { .. })
        ));
        assert!(matches!(
            validate_model_id(&"a".repeat(51)),
            Err(ModelValidationError::IdTooLong { length: 51, max: 50 })
        ));
    }

    #[test]
    fn test_model_name_validation() {
        assert!(validate_model_name("Claude 3 Opus").is_ok());
        assert_eq!(
            validate_model_name("   "),
            Err(ModelValidationError::EmptyName)
        );
        assert!(validate_model_name(&"x".repeat(101)).is_err());
    }
}
