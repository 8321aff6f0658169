//! Id generation for models added at runtime

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use super::ModelId;

/// Produces fresh model ids for `add_model`
pub trait ModelIdGenerator: Send + Sync {
    fn next_id(&self) -> ModelId;
}

/// Millisecond-timestamp ids, bumped past the previous value when two
/// requests land in the same millisecond
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: AtomicU64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelIdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> ModelId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();

        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        ModelId::from_sequence(now.max(previous + 1))
    }
}
