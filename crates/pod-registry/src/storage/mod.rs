//! Key-value storage contract consumed by the registry

use core::error::Error;

use async_trait::async_trait;
use error_stack::Report;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

mod memory;

pub use memory::MemoryStorage;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, Report<StorageError>>;

/// Closed set of failures every storage backend reports.
///
/// The registry only classifies on these variants, never on backend specific
/// error values, which stay attached to the report as printable context.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StorageError {
    #[display("key not found: {key}")]
    NotFound { key: String },
    #[display("key already exists: {key}")]
    AlreadyExists { key: String },
    #[display("storage operation cancelled")]
    Cancelled,
    #[display("storage error: {message}")]
    Other { message: String },
}

impl Error for StorageError {}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Minimal key-value contract.
///
/// Keys are opaque strings. Implementations must be safe for concurrent use
/// and must fail `update` and `delete` with [`StorageError::NotFound`] when
/// the key is absent. Every call receives the caller's cancellation token.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch and decode the value stored at `key`.
    async fn get<T>(&self, ctx: &CancellationToken, key: &str) -> StorageResult<T>
    where
        T: DeserializeOwned + Send;

    /// Store `value` at `key`, failing with `AlreadyExists` if occupied.
    async fn create<T>(&self, ctx: &CancellationToken, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + Sync;

    /// Replace the value at `key`, failing with `NotFound` if absent.
    async fn update<T>(&self, ctx: &CancellationToken, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + Sync;

    async fn delete(&self, ctx: &CancellationToken, key: &str) -> StorageResult<()>;

    /// Decode every value whose key starts with `prefix`.
    async fn list<T>(&self, ctx: &CancellationToken, prefix: &str) -> StorageResult<Vec<T>>
    where
        T: DeserializeOwned + Send;
}
