use outbox_core::Platform;
use thiserror::Error;

/// Errors a publish or delete attempt can produce.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The service accepted the request but refused the post.
    #[error("publish rejected: {0}")]
    Rejected(String),

    /// No publisher is registered for the job's platform tag.
    #[error("unsupported platform: {platform}")]
    UnsupportedPlatform { platform: Platform },

    /// The attached media file could not be read.
    #[error("media error: {0}")]
    Media(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;
