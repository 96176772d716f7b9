use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use std::collections::BTreeMap;
use std::sync::RwLock;
use thiserror::Error;

/// State ledger failures surfaced verbatim to the invoke caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid composite key: {0}")]
    InvalidKey(String),

    #[error("state store failure: {0}")]
    Backend(String),
}

/// Entries matched by a prefix scan, in backend iteration order.
///
/// The stream is finite and closed by dropping it; it is not restartable.
pub type ScanStream<'a> = BoxStream<'a, Result<(String, Vec<u8>), StoreError>>;

/// Contract the workflow engine requires from the surrounding ledger
/// platform.
///
/// Implementations own durability and serialize conflicting writes to the
/// same key; the engine performs one read-modify-write per invocation and
/// never retries a failed store call.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, as produced by
    /// [`crate::keys::scan_prefix`]. Scans must tolerate concurrent writers
    /// without corrupting an in-flight iteration.
    async fn scan(&self, prefix: &str) -> Result<ScanStream<'static>, StoreError>;
}

/// In-memory reference backend over an ordered map.
///
/// Scans snapshot the matching range while holding the read lock, so a
/// writer landing mid-iteration cannot disturb the sequence already handed
/// out.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("state lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Backend("state lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn scan(&self, prefix: &str) -> Result<ScanStream<'static>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("state lock poisoned".to_string()))?;
        let matched: Vec<Result<(String, Vec<u8>), StoreError>> = entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| Ok((key.clone(), value.clone())))
            .collect();
        Ok(Box::pin(stream::iter(matched)))
    }
}
