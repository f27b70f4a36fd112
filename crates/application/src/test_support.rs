use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use camgate_core::AppResult;

use crate::StorageBackend;

#[derive(Default)]
pub(crate) struct FakeStorage {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl FakeStorage {
    pub(crate) async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl StorageBackend for FakeStorage {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> AppResult<()> {
        self.entries.lock().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter_map(|key| key.strip_prefix(prefix).map(str::to_owned))
            .collect())
    }
}
