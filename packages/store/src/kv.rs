//! The [`KeyValueStore`] trait shared by every platform store.

use thiserror::Error;

/// Failure reported by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Async string key-value storage that survives process restarts.
///
/// Removing a key that is not present is not an error.
pub trait KeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>;
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>>;
}
