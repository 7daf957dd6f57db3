//! `outbox-scheduler` — fixed-interval polling worker that delivers due
//! posts.
//!
//! # Overview
//!
//! [`SchedulerLoop`] owns a single background Tokio task. Every poll
//! interval (60 s by default) it asks the store for jobs whose `due_at` has
//! arrived, publishes each one in due-time order, and on success appends a
//! published record *before* deleting the job row. A crash between those
//! two writes redelivers the job on the next boot — delivery is
//! at-least-once, and downstream consumers must tolerate duplicates.
//!
//! A failed publish leaves the job untouched; it is retried on every
//! subsequent poll until it succeeds or someone cancels it. There is no
//! back-off and no attempt cap.
//!
//! [`ScheduleRegistry`] is a small in-memory id → due-time index kept for
//! cancellation lookups and diagnostics. It is not persisted and the worker
//! never consults it to find due jobs — the store is the source of truth.

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::SchedulerLoop;
pub use error::{Result, SchedulerError};
pub use registry::ScheduleRegistry;
