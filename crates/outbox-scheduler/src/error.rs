use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
///
/// Publish failures never surface here — they are handled per job inside
/// the delivery cycle, which leaves the row for retry. What does surface is
/// logged at the iteration boundary and the loop keeps going; nothing is
/// fatal to the worker.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Persistence failure from the job store.
    #[error("store error: {0}")]
    Store(#[from] outbox_store::StoreError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
