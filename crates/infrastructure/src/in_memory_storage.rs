use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use camgate_application::StorageBackend;
use camgate_core::AppResult;

/// In-memory storage adapter for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> AppResult<()> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_owned()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .filter_map(|key| key.strip_prefix(prefix).map(str::to_owned))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use camgate_application::StorageBackend;

    use super::InMemoryStorage;

    #[tokio::test]
    async fn lists_only_keys_under_prefix() {
        let storage = InMemoryStorage::new();
        for key in ["role/zebra", "config/client", "role/elk", "roles"] {
            assert!(storage.put(key, b"{}".to_vec()).await.is_ok());
        }

        let listed = storage.list("role/").await;
        assert!(matches!(
            listed,
            Ok(ref keys) if keys == &vec!["elk".to_owned(), "zebra".to_owned()]
        ));
    }

    #[tokio::test]
    async fn delete_of_missing_key_succeeds() {
        let storage = InMemoryStorage::new();
        assert!(storage.put("role/elk", b"{}".to_vec()).await.is_ok());

        assert!(storage.delete("role/elk").await.is_ok());
        assert!(storage.delete("role/elk").await.is_ok());
        assert!(matches!(storage.get("role/elk").await, Ok(None)));
        assert!(matches!(storage.list("role/").await, Ok(keys) if keys.is_empty()));
    }
}
