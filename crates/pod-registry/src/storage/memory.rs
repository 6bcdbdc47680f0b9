use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use async_trait::async_trait;
use error_stack::Report;
use error_stack::ResultExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::Storage;
use super::StorageError;
use super::StorageResult;

type Entries = BTreeMap<String, Value>;

/// In-process storage backend keeping JSON encoded values in key order.
///
/// Clones share the same entries, so several registries can be pointed at one
/// store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, still counted when a writer panicked.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Entries>> {
        self.entries.read().map_err(|e| {
            Report::new(StorageError::Other {
                message: format!("storage lock poisoned: {e}"),
            })
        })
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Entries>> {
        self.entries.write().map_err(|e| {
            Report::new(StorageError::Other {
                message: format!("storage lock poisoned: {e}"),
            })
        })
    }
}

fn ensure_active(ctx: &CancellationToken) -> StorageResult<()> {
    if ctx.is_cancelled() {
        return Err(Report::new(StorageError::Cancelled));
    }
    Ok(())
}

fn encode<T: Serialize>(key: &str, value: &T) -> StorageResult<Value> {
    serde_json::to_value(value).change_context(StorageError::Other {
        message: format!("failed to encode value for {key}"),
    })
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> StorageResult<T> {
    serde_json::from_value(value).change_context(StorageError::Other {
        message: format!("failed to decode value at {key}"),
    })
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get<T>(&self, ctx: &CancellationToken, key: &str) -> StorageResult<T>
    where
        T: DeserializeOwned + Send,
    {
        ensure_active(ctx)?;
        let value = self.read()?.get(key).cloned().ok_or_else(|| {
            Report::new(StorageError::NotFound {
                key: key.to_string(),
            })
        })?;
        decode(key, value)
    }

    async fn create<T>(&self, ctx: &CancellationToken, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + Sync,
    {
        ensure_active(ctx)?;
        let value = encode(key, value)?;
        let mut entries = self.write()?;
        if entries.contains_key(key) {
            return Err(Report::new(StorageError::AlreadyExists {
                key: key.to_string(),
            }));
        }
        entries.insert(key.to_string(), value);
        trace!(key, "created entry");
        Ok(())
    }

    async fn update<T>(&self, ctx: &CancellationToken, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + Sync,
    {
        ensure_active(ctx)?;
        let value = encode(key, value)?;
        let mut entries = self.write()?;
        match entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                trace!(key, "updated entry");
                Ok(())
            }
            None => Err(Report::new(StorageError::NotFound {
                key: key.to_string(),
            })),
        }
    }

    async fn delete(&self, ctx: &CancellationToken, key: &str) -> StorageResult<()> {
        ensure_active(ctx)?;
        if self.write()?.remove(key).is_none() {
            return Err(Report::new(StorageError::NotFound {
                key: key.to_string(),
            }));
        }
        trace!(key, "deleted entry");
        Ok(())
    }

    async fn list<T>(&self, ctx: &CancellationToken, prefix: &str) -> StorageResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        ensure_active(ctx)?;
        let matching: Vec<(String, Value)> = self
            .read()?
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        matching
            .into_iter()
            .map(|(key, value)| decode(&key, value))
            .collect()
    }
}
