use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use outbox_core::{MediaRef, Platform, PublishStatus};
use outbox_social::PublisherSet;
use outbox_store::JobStore;

use crate::error::Result;
use crate::registry::ScheduleRegistry;

/// Background polling loop that delivers due posts.
///
/// `start()` spawns a single worker task; iterations never overlap.
/// `stop()` signals a watch channel and awaits the task, so shutdown
/// interrupts the sleep instead of waiting out the interval.
pub struct SchedulerLoop {
    worker: Worker,
    poll_interval: Duration,
    shutdown: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl SchedulerLoop {
    pub fn new(
        store: Arc<JobStore>,
        publishers: Arc<PublisherSet>,
        registry: Arc<ScheduleRegistry>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            worker: Worker {
                store,
                publishers,
                registry,
            },
            poll_interval,
            shutdown: None,
            handle: None,
        }
    }

    /// Enqueue a post for future delivery: insert the job row and register
    /// the id for cancellation lookups. Returns the store-assigned id.
    ///
    /// `due_at` is not validated against the clock — a past due time just
    /// means the next poll delivers immediately.
    pub fn schedule(
        &self,
        owner: i64,
        platform: Platform,
        body: &str,
        media: Option<&MediaRef>,
        due_at: DateTime<Utc>,
    ) -> Result<i64> {
        let id = self.worker.store.add_job(owner, platform, body, media, due_at)?;
        self.worker.registry.schedule(id, due_at);
        Ok(id)
    }

    /// Cancel a scheduled post. Returns whether a job row existed.
    ///
    /// Soft cancellation: a job already picked up by the current poll cycle
    /// may still be delivered (see the re-check in the worker, which only
    /// narrows the window).
    pub fn cancel(&self, owner: i64, id: i64) -> Result<bool> {
        let existed = self.worker.store.remove_job(owner, id)?;
        self.worker.registry.cancel(id);
        Ok(existed)
    }

    /// The registry handle, for introspection by callers.
    pub fn registry(&self) -> &Arc<ScheduleRegistry> {
        &self.worker.registry
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the worker task. Warns and no-ops if already running.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            warn!("scheduler already running");
            return;
        }
        let (tx, rx) = watch::channel(false);
        let worker = self.worker.clone();
        let poll_interval = self.poll_interval;
        self.shutdown = Some(tx);
        self.handle = Some(tokio::spawn(worker.run(poll_interval, rx)));
        info!(poll_interval_secs = poll_interval.as_secs(), "scheduler started");
    }

    /// Signal shutdown and wait for the worker to finish its current
    /// iteration. No-op when not running.
    pub async fn stop(&mut self) {
        let Some(tx) = self.shutdown.take() else {
            return;
        };
        let _ = tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("scheduler stopped");
    }
}

/// The loop body, cloned into the spawned task.
#[derive(Clone)]
struct Worker {
    store: Arc<JobStore>,
    publishers: Arc<PublisherSet>,
    registry: Arc<ScheduleRegistry>,
}

impl Worker {
    async fn run(self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(poll_interval);
        // A long delivery must not cause burst catch-up ticks afterwards.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // Iteration boundary: one bad cycle never stops the loop.
                    if let Err(e) = self.deliver_due(Utc::now()).await {
                        error!("scheduler iteration error: {e}");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One poll cycle: fetch due jobs and attempt each in due-time order.
    async fn deliver_due(&self, now: DateTime<Utc>) -> Result<()> {
        let due = self.store.due_jobs(now)?;
        for job in due {
            // Re-check existence: a cancel may have landed since the due
            // query. A cancel racing the publish itself can still deliver.
            if self.store.get_job(job.owner, job.id)?.is_none() {
                debug!(job_id = job.id, "job cancelled since due check; skipping");
                self.registry.cancel(job.id);
                continue;
            }

            match self
                .publishers
                .publish_to(job.platform, &job.body, job.media.as_ref())
                .await
            {
                Ok(receipt) => {
                    // Record the outcome before deleting the job: a crash
                    // between the two writes redelivers on the next boot
                    // (at-least-once).
                    self.store.record_published(
                        job.owner,
                        job.platform,
                        &job.body,
                        job.media.as_ref().map(|m| m.path.as_str()),
                        &receipt.external_id,
                        PublishStatus::Published,
                    )?;
                    self.store.remove_job(job.owner, job.id)?;
                    self.registry.cancel(job.id);
                    info!(
                        job_id = job.id,
                        owner = job.owner,
                        external_id = %receipt.external_id,
                        "scheduled post published"
                    );
                }
                Err(e) => {
                    // Job left untouched: retried on the next poll, forever.
                    error!(job_id = job.id, "publish failed, will retry next poll: {e}");
                }
            }
        }
        Ok(())
    }
}
