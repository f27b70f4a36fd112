use async_trait::async_trait;

use camgate_core::AppResult;

/// Key-value storage port scoped to this auth backend.
///
/// Values are opaque bytes. Keys are `/`-separated paths such as
/// `role/<name>` or `config/client`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the value stored at `key`, if any.
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Stores `value` at `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> AppResult<()>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Lists keys under `prefix` with the prefix stripped, sorted ascending.
    async fn list(&self, prefix: &str) -> AppResult<Vec<String>>;
}
