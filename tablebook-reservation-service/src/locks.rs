use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type SlotKey = (i32, String);

/// Per `(table_number, date)` async locks. Holding a [`SlotGuard`] serializes
/// admissions for that key inside this process; other keys are unaffected.
#[derive(Clone, Default)]
pub struct SlotLocks {
    inner: Arc<Mutex<HashMap<SlotKey, Arc<AsyncMutex<()>>>>>,
}

pub struct SlotGuard {
    key: SlotKey,
    locks: SlotLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, table_number: i32, date: &str) -> SlotGuard {
        let key = (table_number, date.to_string());
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        SlotGuard {
            key,
            locks: self.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        // the map holds one reference; anything above that is a waiter
        if map
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_released_keys_are_pruned() {
        let locks = SlotLocks::new();
        {
            let _guard = locks.acquire(5, "2024-06-01").await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let locks = SlotLocks::new();
        let _a = locks.acquire(5, "2024-06-01").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(5, "2024-06-02")).await;
        assert!(b.is_ok());
        let c = tokio::time::timeout(Duration::from_millis(100), locks.acquire(6, "2024-06-01")).await;
        assert!(c.is_ok());
    }

    #[tokio::test]
    async fn test_same_key_waits_for_release() {
        let locks = SlotLocks::new();
        let first = locks.acquire(5, "2024-06-01").await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(5, "2024-06-01")).await;
        assert!(blocked.is_err());

        drop(first);
        let second =
            tokio::time::timeout(Duration::from_millis(100), locks.acquire(5, "2024-06-01")).await;
        assert!(second.is_ok());
    }
}
