use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, warn};

use outbox_core::{MediaRef, Platform, PublishStatus};

use crate::error::Result;
use crate::types::{PublishedRecord, ScheduledJob};

/// Thread-safe store for scheduled jobs and published records.
///
/// Wraps a single SQLite connection in a `Mutex`: one writer at a time is
/// all this workload needs (a single polling worker plus occasional caller
/// tasks). Acquisition is scoped per call, so the lock is released on every
/// exit path including errors.
pub struct JobStore {
    db: Mutex<Connection>,
}

impl JobStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Insert a new scheduled job and return its store-assigned id.
    ///
    /// `due_at` is stored as given — whether it is already in the past is
    /// the caller's business, and the scheduler will simply deliver such a
    /// job on its next poll.
    pub fn add_job(
        &self,
        owner: i64,
        platform: Platform,
        body: &str,
        media: Option<&MediaRef>,
        due_at: DateTime<Utc>,
    ) -> Result<i64> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO jobs (owner, platform, body, media_path, media_kind, due_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                owner,
                platform.to_string(),
                body,
                media.map(|m| m.path.as_str()),
                media.map(|m| m.kind.to_string()),
                due_at.to_rfc3339(),
                now,
            ],
        )?;
        let id = db.last_insert_rowid();
        info!(job_id = id, owner, %platform, due_at = %due_at, "job scheduled");
        Ok(id)
    }

    /// All jobs with `due_at <= now`, earliest first.
    ///
    /// Due-time order is the only fairness guarantee the scheduler gives;
    /// there is no priority beyond time.
    pub fn due_jobs(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledJob>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare_cached(
            "SELECT id, owner, platform, body, media_path, media_kind, due_at, created_at
             FROM jobs WHERE due_at <= ?1 ORDER BY due_at ASC",
        )?;
        let jobs = stmt
            .query_map([now.to_rfc3339()], job_row)?
            .filter_map(|r| r.ok())
            .filter_map(job_from_parts)
            .collect();
        Ok(jobs)
    }

    /// An owner's not-yet-due jobs, earliest first.
    pub fn pending_jobs(&self, owner: i64, now: DateTime<Utc>) -> Result<Vec<ScheduledJob>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare_cached(
            "SELECT id, owner, platform, body, media_path, media_kind, due_at, created_at
             FROM jobs WHERE owner = ?1 AND due_at > ?2 ORDER BY due_at ASC",
        )?;
        let jobs = stmt
            .query_map(rusqlite::params![owner, now.to_rfc3339()], job_row)?
            .filter_map(|r| r.ok())
            .filter_map(job_from_parts)
            .collect();
        Ok(jobs)
    }

    /// Owner-scoped point lookup. Returns `None` when the id does not exist
    /// *or* belongs to a different owner — an id alone grants nothing.
    pub fn get_job(&self, owner: i64, id: i64) -> Result<Option<ScheduledJob>> {
        let db = self.db.lock().unwrap();
        let row = db
            .query_row(
                "SELECT id, owner, platform, body, media_path, media_kind, due_at, created_at
                 FROM jobs WHERE id = ?1 AND owner = ?2",
                rusqlite::params![id, owner],
                job_row,
            )
            .optional()?;
        Ok(row.and_then(job_from_parts))
    }

    /// Idempotent owner-scoped delete. Returns whether a row existed.
    ///
    /// Also unlinks the job's media file from disk, since nothing else will
    /// reference it once the row is gone.
    pub fn remove_job(&self, owner: i64, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let media_path: Option<String> = db
            .query_row(
                "SELECT media_path FROM jobs WHERE id = ?1 AND owner = ?2",
                rusqlite::params![id, owner],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        let n = db.execute(
            "DELETE FROM jobs WHERE id = ?1 AND owner = ?2",
            rusqlite::params![id, owner],
        )?;
        if n > 0 {
            if let Some(path) = media_path {
                unlink_media(&path);
            }
            info!(job_id = id, owner, "job removed");
        }
        Ok(n > 0)
    }

    /// Append a delivery outcome to the `published` table.
    pub fn record_published(
        &self,
        owner: i64,
        platform: Platform,
        body: &str,
        media_path: Option<&str>,
        external_id: &str,
        status: PublishStatus,
    ) -> Result<i64> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO published (owner, platform, body, media_path, external_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                owner,
                platform.to_string(),
                body,
                media_path,
                external_id,
                status.to_string(),
                now,
            ],
        )?;
        let id = db.last_insert_rowid();
        debug!(record_id = id, owner, %status, "publish outcome recorded");
        Ok(id)
    }

    /// An owner's published records, newest first.
    pub fn published_for(&self, owner: i64) -> Result<Vec<PublishedRecord>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare_cached(
            "SELECT id, owner, platform, body, media_path, external_id, status, created_at
             FROM published WHERE owner = ?1 ORDER BY created_at DESC",
        )?;
        let records = stmt
            .query_map([owner], record_row)?
            .filter_map(|r| r.ok())
            .filter_map(record_from_parts)
            .collect();
        Ok(records)
    }

    /// Owner-scoped point lookup in the published table.
    pub fn get_published(&self, owner: i64, id: i64) -> Result<Option<PublishedRecord>> {
        let db = self.db.lock().unwrap();
        let row = db
            .query_row(
                "SELECT id, owner, platform, body, media_path, external_id, status, created_at
                 FROM published WHERE id = ?1 AND owner = ?2",
                rusqlite::params![id, owner],
                record_row,
            )
            .optional()?;
        Ok(row.and_then(record_from_parts))
    }

    /// Idempotent owner-scoped delete of a published record, unlinking its
    /// media file as well.
    pub fn remove_published(&self, owner: i64, id: i64) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let media_path: Option<String> = db
            .query_row(
                "SELECT media_path FROM published WHERE id = ?1 AND owner = ?2",
                rusqlite::params![id, owner],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        let n = db.execute(
            "DELETE FROM published WHERE id = ?1 AND owner = ?2",
            rusqlite::params![id, owner],
        )?;
        if n > 0 {
            if let Some(path) = media_path {
                unlink_media(&path);
            }
            info!(record_id = id, owner, "published record removed");
        }
        Ok(n > 0)
    }

    /// Correction path: fix up a record's external id and status after the
    /// fact. Returns whether a row was updated.
    pub fn update_published(
        &self,
        id: i64,
        external_id: &str,
        status: PublishStatus,
    ) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "UPDATE published SET external_id = ?1, status = ?2 WHERE id = ?3",
            rusqlite::params![external_id, status.to_string(), id],
        )?;
        Ok(n > 0)
    }
}

// --- row mapping -----------------------------------------------------------

type JobParts = (
    i64,
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
);

fn job_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobParts> {
    Ok((
        row.get(0)?, // id
        row.get(1)?, // owner
        row.get(2)?, // platform
        row.get(3)?, // body
        row.get(4)?, // media_path
        row.get(5)?, // media_kind
        row.get(6)?, // due_at
        row.get(7)?, // created_at
    ))
}

fn job_from_parts(parts: JobParts) -> Option<ScheduledJob> {
    let (id, owner, platform, body, media_path, media_kind, due_at, created_at) = parts;
    let platform: Platform = match platform.parse() {
        Ok(p) => p,
        Err(e) => {
            warn!(job_id = id, "dropping unreadable job row: {e}");
            return None;
        }
    };
    Some(ScheduledJob {
        id,
        owner,
        platform,
        body,
        media: media_from(media_path, media_kind),
        due_at: parse_ts(&due_at)?,
        created_at: parse_ts(&created_at)?,
    })
}

type RecordParts = (
    i64,
    i64,
    String,
    String,
    Option<String>,
    String,
    String,
    String,
);

fn record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordParts> {
    Ok((
        row.get(0)?, // id
        row.get(1)?, // owner
        row.get(2)?, // platform
        row.get(3)?, // body
        row.get(4)?, // media_path
        row.get(5)?, // external_id
        row.get(6)?, // status
        row.get(7)?, // created_at
    ))
}

fn record_from_parts(parts: RecordParts) -> Option<PublishedRecord> {
    let (id, owner, platform, body, media_path, external_id, status, created_at) = parts;
    Some(PublishedRecord {
        id,
        owner,
        platform: platform.parse().ok()?,
        body,
        media_path,
        external_id,
        status: status.parse().ok()?,
        created_at: parse_ts(&created_at)?,
    })
}

fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn media_from(path: Option<String>, kind: Option<String>) -> Option<MediaRef> {
    let path = path?;
    let kind = kind?.parse().ok()?;
    Some(MediaRef { path, kind })
}

fn unlink_media(path: &str) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(%path, "media file removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(%path, "could not remove media file: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use outbox_core::MediaKind;

    fn test_store() -> JobStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        JobStore::new(conn)
    }

    #[test]
    fn due_jobs_excludes_future() {
        let store = test_store();
        let now = Utc::now();
        store
            .add_job(1, Platform::Twitter, "past", None, now - Duration::seconds(1))
            .unwrap();
        store
            .add_job(1, Platform::Twitter, "future", None, now + Duration::hours(1))
            .unwrap();

        let due = store.due_jobs(now).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].body, "past");
    }

    #[test]
    fn due_jobs_ordered_by_due_time() {
        let store = test_store();
        let now = Utc::now();
        store
            .add_job(1, Platform::Twitter, "second", None, now - Duration::seconds(5))
            .unwrap();
        store
            .add_job(1, Platform::Twitter, "first", None, now - Duration::seconds(10))
            .unwrap();
        store
            .add_job(1, Platform::Twitter, "third", None, now - Duration::seconds(1))
            .unwrap();

        let due = store.due_jobs(now).unwrap();
        let bodies: Vec<_> = due.iter().map(|j| j.body.as_str()).collect();
        assert_eq!(bodies, ["first", "second", "third"]);
        assert!(due.windows(2).all(|w| w[0].due_at <= w[1].due_at));
    }

    #[test]
    fn remove_job_is_idempotent() {
        let store = test_store();
        let id = store
            .add_job(1, Platform::Twitter, "hi", None, Utc::now())
            .unwrap();
        assert!(store.remove_job(1, id).unwrap());
        assert!(!store.remove_job(1, id).unwrap());
    }

    #[test]
    fn get_job_is_owner_scoped() {
        let store = test_store();
        let id = store
            .add_job(1, Platform::Twitter, "mine", None, Utc::now())
            .unwrap();
        assert!(store.get_job(1, id).unwrap().is_some());
        assert!(store.get_job(2, id).unwrap().is_none());
    }

    #[test]
    fn remove_job_is_owner_scoped() {
        let store = test_store();
        let id = store
            .add_job(1, Platform::Twitter, "mine", None, Utc::now())
            .unwrap();
        assert!(!store.remove_job(2, id).unwrap());
        assert!(store.get_job(1, id).unwrap().is_some());
    }

    #[test]
    fn media_roundtrips_through_job_row() {
        let store = test_store();
        let media = MediaRef {
            path: "/tmp/pic.jpg".into(),
            kind: MediaKind::Photo,
        };
        let id = store
            .add_job(1, Platform::Instagram, "pic", Some(&media), Utc::now())
            .unwrap();
        let job = store.get_job(1, id).unwrap().unwrap();
        assert_eq!(job.media, Some(media));
        assert_eq!(job.platform, Platform::Instagram);
    }

    #[test]
    fn remove_job_unlinks_media_file() {
        let store = test_store();
        let path = std::env::temp_dir().join(format!("outbox-test-media-{}", std::process::id()));
        std::fs::write(&path, b"jpeg").unwrap();
        let media = MediaRef {
            path: path.to_string_lossy().into_owned(),
            kind: MediaKind::Photo,
        };
        let id = store
            .add_job(1, Platform::Twitter, "pic", Some(&media), Utc::now())
            .unwrap();
        assert!(store.remove_job(1, id).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn pending_jobs_only_future_for_owner() {
        let store = test_store();
        let now = Utc::now();
        store
            .add_job(1, Platform::Twitter, "due", None, now - Duration::seconds(1))
            .unwrap();
        store
            .add_job(1, Platform::Twitter, "later", None, now + Duration::hours(1))
            .unwrap();
        store
            .add_job(2, Platform::Twitter, "other owner", None, now + Duration::hours(1))
            .unwrap();

        let pending = store.pending_jobs(1, now).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].body, "later");
    }

    #[test]
    fn record_and_list_published() {
        let store = test_store();
        let id = store
            .record_published(1, Platform::Twitter, "posted", None, "tw-42", PublishStatus::Published)
            .unwrap();

        let records = store.published_for(1).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].external_id, "tw-42");
        assert_eq!(records[0].status, PublishStatus::Published);
        assert!(store.published_for(2).unwrap().is_empty());
    }

    #[test]
    fn update_published_corrects_record() {
        let store = test_store();
        let id = store
            .record_published(1, Platform::Twitter, "posted", None, "", PublishStatus::Error)
            .unwrap();
        assert!(store
            .update_published(id, "tw-99", PublishStatus::Published)
            .unwrap());

        let record = store.get_published(1, id).unwrap().unwrap();
        assert_eq!(record.external_id, "tw-99");
        assert_eq!(record.status, PublishStatus::Published);
        assert!(!store
            .update_published(id + 1, "x", PublishStatus::Error)
            .unwrap());
    }

    #[test]
    fn remove_published_is_idempotent_and_owner_scoped() {
        let store = test_store();
        let id = store
            .record_published(1, Platform::Twitter, "posted", None, "tw-1", PublishStatus::Published)
            .unwrap();
        assert!(!store.remove_published(2, id).unwrap());
        assert!(store.remove_published(1, id).unwrap());
        assert!(!store.remove_published(1, id).unwrap());
    }
}
