use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use outbox_core::MediaRef;

use crate::error::Result;

/// What the platform handed back for a successful post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Platform-assigned post id.
    pub external_id: String,
    /// Public URL of the post, when the platform exposes one.
    pub url: Option<String>,
}

/// Capability that performs the actual post/delete against a social network.
///
/// Implementations own their credentials, media upload mechanics and request
/// timeouts; the scheduler only sees success or failure. `publish` must not
/// block indefinitely — the worker delivers jobs sequentially.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Post `body` (with optional attached media) and return the receipt.
    async fn publish(&self, body: &str, media: Option<&MediaRef>) -> Result<PublishReceipt>;

    /// Delete a previously published post by its platform-assigned id.
    async fn delete(&self, external_id: &str) -> Result<()>;
}
