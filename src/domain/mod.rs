//! Domain layer - Core entities, errors and collaborator traits

pub mod error;
pub mod model;
pub mod user;

pub use error::{AuthError, CatalogLoadError, DomainError};
pub use model::{
    validate_model_id, validate_model_name, Model, ModelId, ModelIdGenerator, ModelProvider,
    ModelValidationError, NewModel, Provider, TimestampIdGenerator,
};
pub use user::{AuthBackend, User, UserId, UserRole, UserValidationError};

#[cfg(test)]
pub use model::MockModelProvider;
#[cfg(test)]
pub use user::MockAuthBackend;
