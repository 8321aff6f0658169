//! Sign-in and registration form checks done before calling the session store

use thiserror::Error;

use crate::store::{AuthOutcome, SessionStore};

/// Problems caught before a form reaches the session store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require("Email", &self.email)?;
        require("Password", &self.password)
    }

    /// Validate, then sign in through `store`
    pub async fn submit(&self, store: &SessionStore) -> Result<AuthOutcome, FormError> {
        self.validate()?;
        Ok(store.login(&self.email, &self.password).await)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("Full name", &self.name)?;
        require("Email", &self.email)?;
        require("Password", &self.password)?;

        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }

        Ok(())
    }

    /// Validate, then create the account through `store`
    pub async fn submit(&self, store: &SessionStore) -> Result<AuthOutcome, FormError> {
        self.validate()?;
        Ok(store
            .register(&self.name, &self.email, &self.password)
            .await)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}
