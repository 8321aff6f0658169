//! User infrastructure module
//!
//! Simulated authentication backend and the Argon2 password hashing it uses
//! for in-memory accounts.

mod backend;
mod password;

pub use backend::SimulatedAuthBackend;
pub use password::{Argon2Hasher, PasswordHasher};
