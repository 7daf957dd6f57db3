use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

/// In-memory index of outstanding job ids to their scheduled times.
///
/// A non-owning cache over the store, used for cancellation lookups and
/// diagnostics. Not persisted: a restarted process starts with an empty
/// registry while the store keeps the authoritative rows, and the worker
/// never reads it to find due jobs.
///
/// An explicit component, injected wherever cancellation UX needs it —
/// never a process-global.
#[derive(Default)]
pub struct ScheduleRegistry {
    inner: Mutex<HashMap<i64, DateTime<Utc>>>,
}

impl ScheduleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as scheduled for `due_at`.
    pub fn schedule(&self, id: i64, due_at: DateTime<Utc>) {
        self.inner.lock().unwrap().insert(id, due_at);
        debug!(job_id = id, due_at = %due_at, "job registered");
    }

    /// Forget `id`. Returns whether it was present.
    pub fn cancel(&self, id: i64) -> bool {
        let removed = self.inner.lock().unwrap().remove(&id).is_some();
        if removed {
            debug!(job_id = id, "job unregistered");
        }
        removed
    }

    pub fn contains(&self, id: i64) -> bool {
        self.inner.lock().unwrap().contains_key(&id)
    }

    /// Snapshot of the current id → due-time mapping.
    pub fn list(&self) -> HashMap<i64, DateTime<Utc>> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_then_cancel() {
        let registry = ScheduleRegistry::new();
        let due = Utc::now();
        registry.schedule(7, due);
        assert!(registry.contains(7));
        assert_eq!(registry.list().get(&7), Some(&due));

        assert!(registry.cancel(7));
        assert!(!registry.contains(7));
        assert!(registry.is_empty());
    }

    #[test]
    fn cancel_unknown_id_is_false() {
        let registry = ScheduleRegistry::new();
        assert!(!registry.cancel(999));
    }

    #[test]
    fn reschedule_overwrites_due_time() {
        let registry = ScheduleRegistry::new();
        let first = Utc::now();
        let later = first + chrono::Duration::hours(1);
        registry.schedule(1, first);
        registry.schedule(1, later);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list().get(&1), Some(&later));
    }
}
