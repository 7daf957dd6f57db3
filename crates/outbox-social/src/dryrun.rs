use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use outbox_core::MediaRef;

use crate::error::Result;
use crate::publisher::{PublishReceipt, Publisher};

/// Publisher that logs instead of posting.
///
/// Used when no real client is configured, so a fresh deployment can run the
/// whole schedule/deliver cycle without credentials. Receipts carry a
/// monotonically numbered synthetic id.
#[derive(Default)]
pub struct DryRunPublisher {
    counter: AtomicU64,
}

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, body: &str, media: Option<&MediaRef>) -> Result<PublishReceipt> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            chars = body.len(),
            media = ?media.map(|m| m.kind),
            "dry-run publish"
        );
        Ok(PublishReceipt {
            external_id: format!("dry-run-{n}"),
            url: None,
        })
    }

    async fn delete(&self, external_id: &str) -> Result<()> {
        info!(%external_id, "dry-run delete");
        Ok(())
    }
}
