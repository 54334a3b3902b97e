//! Request and response status ids plus the lifecycle transition labels.
//!
//! Status ids mirror the seed rows in `request_statuses` and
//! `response_statuses`. The numeric values are load-bearing: transition
//! logic and the report-closure side effect key off them directly.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// `request_statuses` seed ids.
pub const STATUS_NEW: DbId = 1;
pub const STATUS_IN_PROGRESS: DbId = 2;
pub const STATUS_COMPLETED: DbId = 3;
pub const STATUS_DENIED: DbId = 4;
pub const STATUS_ON_HOLD: DbId = 5;
pub const STATUS_CLOSED: DbId = 6;

/// `response_statuses` seed ids.
pub const RESPONSE_STATUS_ACCEPTED: DbId = 1;
pub const RESPONSE_STATUS_DENIED: DbId = 2;

/// History action recorded for every lifecycle event.
pub const HISTORY_ACTION_STATUS_CHANGED: &str = "Status changed";

/// Closed set of request statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    InProgress,
    Completed,
    Denied,
    OnHold,
    Closed,
}

impl RequestStatus {
    /// Database id of this status.
    pub fn id(&self) -> DbId {
        match self {
            Self::New => STATUS_NEW,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
            Self::Denied => STATUS_DENIED,
            Self::OnHold => STATUS_ON_HOLD,
            Self::Closed => STATUS_CLOSED,
        }
    }

    /// Resolve a status from its database id.
    pub fn from_id(id: DbId) -> Result<Self, CoreError> {
        match id {
            STATUS_NEW => Ok(Self::New),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_DENIED => Ok(Self::Denied),
            STATUS_ON_HOLD => Ok(Self::OnHold),
            STATUS_CLOSED => Ok(Self::Closed),
            other => Err(CoreError::BadRequest(format!(
                "Unknown request status id {other}"
            ))),
        }
    }
}

/// Human-readable label for a status transition, written to the request
/// history. Unmapped transitions fall through to the catch-all label.
pub fn transition_label(old_status_id: DbId, new_status_id: DbId) -> &'static str {
    match new_status_id {
        STATUS_IN_PROGRESS if old_status_id == STATUS_NEW => "took ownership",
        STATUS_CLOSED => "closed the request",
        STATUS_ON_HOLD => "put on hold",
        STATUS_DENIED => "declined the request",
        STATUS_NEW => "reopened the request",
        _ => "took the request into progress",
    }
}
