use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Keyed set of background tasks. At most one task lives under a key:
/// spawning under an occupied key aborts the previous task first.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<&'static str, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn<F>(&mut self, key: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.abort(key);
        self.tasks.insert(key, tokio::spawn(task));
    }

    pub fn abort(&mut self, key: &'static str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
        self.tasks.clear();
    }

    pub fn is_active(&self, key: &'static str) -> bool {
        self.tasks.get(key).is_some_and(|h| !h.is_finished())
    }

    pub fn active_count(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn respawn_under_same_key_keeps_one_task() {
        let mut tasks = TaskManager::new();
        tasks.spawn("poll", tokio::time::sleep(Duration::from_secs(60)));
        tasks.spawn("poll", tokio::time::sleep(Duration::from_secs(60)));

        assert_eq!(tasks.active_count(), 1);
        assert!(tasks.is_active("poll"));
    }

    #[tokio::test]
    async fn abort_removes_task() {
        let mut tasks = TaskManager::new();
        tasks.spawn("poll", tokio::time::sleep(Duration::from_secs(60)));
        tasks.spawn("fetch", tokio::time::sleep(Duration::from_secs(60)));

        tasks.abort("poll");
        assert!(!tasks.is_active("poll"));
        assert_eq!(tasks.active_count(), 1);

        tasks.abort_all();
        assert_eq!(tasks.active_count(), 0);
    }

    #[tokio::test]
    async fn replaced_task_is_cancelled() {
        let (tx, rx) = flume::unbounded::<u8>();
        let mut tasks = TaskManager::new();

        let first = tx.clone();
        tasks.spawn("tick", async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = first.send(1);
        });
        tasks.spawn("tick", async move {
            let _ = tx.send(2);
        });

        assert_eq!(rx.recv_async().await.ok(), Some(2));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
