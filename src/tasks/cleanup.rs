//! TTL Cleanup Task
//!
//! Background task that periodically removes expired memory-store entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryTable;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `interval` between runs and takes the write lock only
/// for the duration of one sweep. It runs until the returned handle is
/// aborted, which [`MemoryStore`](crate::cache::MemoryStore) does on drop.
///
/// # Example
/// ```ignore
/// let table = Arc::new(RwLock::new(MemoryTable::new(HashMap::new())));
/// let cleanup_handle = spawn_cleanup_task(table.clone(), Duration::from_secs(60));
/// // Later:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(
    table: Arc<RwLock<MemoryTable<T>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "Starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut table_guard = table.write().await;
                table_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryEntry;
    use std::collections::HashMap;

    fn shared_table() -> Arc<RwLock<MemoryTable<String>>> {
        Arc::new(RwLock::new(MemoryTable::new(HashMap::new())))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let table = shared_table();
        table.write().await.insert(
            "expire_soon".to_string(),
            MemoryEntry::new("value".to_string(), Duration::from_millis(50)),
        );

        let handle = spawn_cleanup_task(table.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(table.read().await.is_empty(), "Expired entry should have been swept");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let table = shared_table();
        table.write().await.insert(
            "long_lived".to_string(),
            MemoryEntry::new("value".to_string(), Duration::from_secs(3600)),
        );

        let handle = spawn_cleanup_task(table.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(table.read().await.len(), 1, "Valid entry should not be removed");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(shared_table(), Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
