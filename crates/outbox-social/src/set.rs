use std::collections::HashMap;
use std::sync::Arc;

use outbox_core::{MediaRef, Platform};

use crate::error::{PublishError, Result};
use crate::publisher::{PublishReceipt, Publisher};

/// Routes a post to the publisher registered for its platform tag.
#[derive(Default)]
pub struct PublisherSet {
    publishers: HashMap<Platform, Arc<dyn Publisher>>,
}

impl PublisherSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `publisher` for `platform`, replacing any previous entry.
    pub fn register(&mut self, platform: Platform, publisher: Arc<dyn Publisher>) {
        self.publishers.insert(platform, publisher);
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn Publisher>> {
        self.publishers.get(&platform).cloned()
    }

    /// Publish via the platform's registered publisher.
    ///
    /// Fails with [`PublishError::UnsupportedPlatform`] when no publisher is
    /// registered for `platform` — jobs stored with a tag nobody handles are
    /// a delivery failure, not a panic.
    pub async fn publish_to(
        &self,
        platform: Platform,
        body: &str,
        media: Option<&MediaRef>,
    ) -> Result<PublishReceipt> {
        let publisher = self
            .publishers
            .get(&platform)
            .ok_or(PublishError::UnsupportedPlatform { platform })?;
        publisher.publish(body, media).await
    }
}
