use thiserror::Error;

/// Domain errors raised while wiring up the playground
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Failures reported by an authentication backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials for '{email}'")]
    InvalidCredentials { email: String },

    #[error("Account '{email}' already exists")]
    AccountExists { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication service unavailable: {message}")]
    Unavailable { message: String },
}

impl AuthError {
    pub fn invalid_credentials(email: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            email: email.into(),
        }
    }

    pub fn account_exists(email: impl Into<String>) -> Self {
        Self::AccountExists {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Message shown to the user when this error ends an auth operation
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials { .. } => "Invalid email or password".to_string(),
            Self::AccountExists { .. } => {
                "Failed to create account: an account with this email already exists".to_string()
            }
            Self::Validation { message } => format!("Failed to create account: {}", message),
            Self::Unavailable { .. } => {
                "Unable to reach the authentication service. Please try again.".to_string()
            }
        }
    }
}

/// Failures reported by a model catalog provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogLoadError {
    #[error("Model provider unreachable: {message}")]
    Unreachable { message: String },

    #[error("Malformed model catalog: {message}")]
    Malformed { message: String },
}

impl CatalogLoadError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Message shown to the user when the catalog cannot be loaded
    pub fn user_message(&self) -> String {
        "Failed to load models".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("missing catalog path");
        assert_eq!(
            error.to_string(),
            "Configuration error: missing catalog path"
        );
    }

    #[test]
    fn test_auth_error_user_messages() {
        assert_eq!(
            AuthError::invalid_credentials("user@example.com").user_message(),
            "Invalid email or password"
        );
        assert!(
            AuthError::account_exists("user@example.com")
                .user_message()
                .starts_with("Failed to create account")
        );
        assert!(
            AuthError::validation("Password is too short")
                .user_message()
                .ends_with("Password is too short")
        );
    }

    #[test]
    fn test_auth_error_display_keeps_detail() {
        let error = AuthError::unavailable("connection refused");
        assert_eq!(
            error.to_string(),
            "Authentication service unavailable: connection refused"
        );
    }

    #[test]
    fn test_catalog_error_user_message() {
        let error = CatalogLoadError::malformed("missing field `name`");
        assert_eq!(error.user_message(), "Failed to load models");
        assert_eq!(
            error.to_string(),
            "Malformed model catalog: missing field `name`"
        );
    }
}
