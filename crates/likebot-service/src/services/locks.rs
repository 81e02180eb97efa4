//! Per-message lock table
//!
//! Presses on the same message are serialised; presses on different messages
//! run in parallel. Entries exist only while someone holds or waits for them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use likebot_core::MessageRef;

#[derive(Debug, Default)]
pub struct RefLocks {
    locks: DashMap<MessageRef, Arc<Mutex<()>>>,
}

impl RefLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `message_ref`
    pub async fn lock(&self, message_ref: &MessageRef) -> RefGuard<'_> {
        let lock = Arc::clone(self.locks.entry(message_ref.clone()).or_default().value());
        let guard = lock.lock_owned().await;
        RefGuard {
            locks: self,
            key: message_ref.clone(),
            guard: Some(guard),
        }
    }

    /// Number of refs currently locked or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock; dropping it releases the ref and forgets idle entries
#[derive(Debug)]
pub struct RefGuard<'a> {
    locks: &'a RefLocks,
    key: MessageRef,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RefGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table's own handle left: nobody holds or waits
        self.locks
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
