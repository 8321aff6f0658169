//! Model domain - Model descriptors, ids and catalog providers

mod entity;
mod id_generator;
mod provider;
mod validation;

pub use entity::{Model, ModelId, NewModel, Provider};
pub use id_generator::{ModelIdGenerator, TimestampIdGenerator};
pub use provider::ModelProvider;
pub use validation::{
    validate_model_id, validate_model_name, ModelValidationError, MAX_MODEL_ID_LENGTH,
    MAX_MODEL_NAME_LENGTH,
};

#[cfg(test)]
pub use provider::MockModelProvider;
