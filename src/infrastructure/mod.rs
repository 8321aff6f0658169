//! Infrastructure layer - Simulated backends and process setup

pub mod logging;
pub mod model;
pub mod user;
