//! Per-year write serialization
//!
//! Single-cell edits, clears, restores and solver result writes for the same
//! year must not interleave. Each year gets its own async mutex; different
//! years proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct YearLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl YearLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to a year's assignments
    ///
    /// Access is held until the returned guard is dropped.
    pub async fn lock(&self, year_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(year_id).or_default())
        };
        lock.lock_owned().await
    }
}
