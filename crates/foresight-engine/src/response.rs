//! Response envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Wrapper around every successful payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Request identifier (UUIDv7, time-ordered)
    pub request_id: Uuid,

    /// When the response was assembled
    pub generated_at: DateTime<Utc>,

    /// Wall-clock time spent on the request
    pub elapsed_ms: u64,

    /// Operation result
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Wrap `payload` for a request that started at `started`
    pub fn new(request_id: Uuid, started: Instant, payload: T) -> Self {
        Self {
            request_id,
            generated_at: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            payload,
        }
    }

    /// Consume the envelope, returning the payload
    pub fn into_payload(self) -> T {
        self.payload
    }
}
