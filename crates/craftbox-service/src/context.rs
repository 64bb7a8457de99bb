//! Request context carrying the acting owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use craftbox_core::types::OwnerId;

/// Context for the current request.
///
/// Authentication happens upstream; by the time a structural operation
/// reaches this crate, the caller has been resolved to an owning account
/// and every repository call is scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting owner's ID.
    pub owner_id: OwnerId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            request_time: Utc::now(),
        }
    }
}
