//! Reactive stores consumed by the playground views
//!
//! Each store is a cheap-to-clone handle over shared state. Views read
//! snapshots, subscribe for change notification, and mutate only through the
//! store operations.

mod catalog;
mod observable;
mod session;

pub use catalog::{CatalogState, LoadOutcome, ModelCatalogStore};
pub use observable::{Observable, SubscriptionId};
pub use session::{AuthOutcome, RouteAccess, SessionPhase, SessionState, SessionStore};
