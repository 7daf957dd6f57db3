//! `outbox-social` — the publishing seam between the scheduler and the
//! actual social networks.
//!
//! The scheduler never talks to a network API directly: it hands the post
//! body and optional media to a [`Publisher`] and gets back a
//! [`PublishReceipt`] or a [`PublishError`]. Concrete clients (Twitter,
//! Instagram, …) live outside this workspace; [`DryRunPublisher`] is the
//! built-in stand-in that logs instead of posting.
//!
//! [`PublisherSet`] routes a job to the right publisher by its
//! [`Platform`](outbox_core::Platform) tag.

pub mod dryrun;
pub mod error;
pub mod publisher;
pub mod set;

pub use dryrun::DryRunPublisher;
pub use error::{PublishError, Result};
pub use publisher::{PublishReceipt, Publisher};
pub use set::PublisherSet;
