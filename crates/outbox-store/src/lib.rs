//! `outbox-store` — SQLite persistence for scheduled jobs and published
//! posts.
//!
//! Two tables: `jobs` holds posts waiting for their `due_at` to arrive,
//! `published` is the append-only record of delivery outcomes. A job row is
//! deleted the moment its published row is written; a crash between the two
//! writes redelivers the job on the next boot (at-least-once).
//!
//! [`JobStore`] wraps one connection in a `Mutex` and is shared via `Arc`
//! between the scheduler worker and caller tasks. All reads are scoped to an
//! owner id — a job id alone is not enough to read or cancel a row.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use db::init_db;
pub use error::{Result, StoreError};
pub use store::JobStore;
pub use types::{PublishedRecord, ScheduledJob};
