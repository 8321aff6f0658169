//! User domain
//!
//! This module provides domain types and traits for playground sign-in,
//! including the user identity, field validation, and the auth backend trait.

mod backend;
mod entity;
mod validation;

pub use backend::AuthBackend;
pub use entity::{User, UserId, UserRole};
pub use validation::{
    validate_display_name, validate_email, validate_password, validate_user_id,
    UserValidationError,
};

#[cfg(test)]
pub use backend::mock::MockAuthBackend;
