//! Model catalog providers

mod factory;
mod file;
mod fixture;

pub use factory::ModelProviderFactory;
pub use file::{parse_catalog, FileModelProvider};
pub use fixture::{fixture_models, FixtureModelProvider};
