//! `outbox-core` — shared types, configuration and errors for Outbox.
//!
//! Everything here is plain data: the target-platform and media tags used
//! across the store and scheduler, the daemon configuration (TOML file +
//! `OUTBOX_*` env overrides), and the top-level error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DatabaseConfig, OutboxConfig, SchedulerConfig};
pub use error::{OutboxError, Result};
pub use types::{MediaKind, MediaRef, Platform, PublishStatus};
