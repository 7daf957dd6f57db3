use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use outbox_core::{MediaRef, Platform, PublishStatus};

/// A post waiting in the `jobs` table for its `due_at` to arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Store-assigned row id.
    pub id: i64,
    /// Opaque requester id; all lookups are scoped to it.
    pub owner: i64,
    /// Platform tag selecting the publisher variant.
    pub platform: Platform,
    /// Text payload.
    pub body: String,
    /// Optional attached media.
    pub media: Option<MediaRef>,
    /// The job is eligible for delivery once `now >= due_at`.
    pub due_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a delivery attempt, appended to the `published` table.
///
/// Immutable except for the `external_id`/`status` correction path used
/// when an attempt is fixed up after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedRecord {
    pub id: i64,
    pub owner: i64,
    pub platform: Platform,
    pub body: String,
    pub media_path: Option<String>,
    /// Platform-assigned post id.
    pub external_id: String,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
}
