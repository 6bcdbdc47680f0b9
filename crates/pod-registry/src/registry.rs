//! Pod registry enforcing uniqueness and spec validity over a shared store

use std::sync::Arc;

use api_types::Pod;
use api_types::PodStatus;
use error_stack::Report;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::Operation;
use crate::error::RegistryError;
use crate::error::RegistryResult;
use crate::storage::Storage;
use crate::storage::StorageError;
use crate::storage::StorageResult;
use crate::validation::validate_pod_spec;

/// Key prefix all pod records live under.
pub const POD_PREFIX: &str = "/pods/";

/// Storage key for a pod name.
pub fn pod_key(name: &str) -> String {
    format!("{POD_PREFIX}{name}")
}

/// Thread-safe pod registry.
///
/// Mutations hold the exclusive lock for their whole storage round-trip and
/// reads hold the shared lock, so in-process callers never observe a partial
/// create/update/delete. The lock does not coordinate with other processes
/// writing the same store. Clones share the lock and the storage.
pub struct PodRegistry<S> {
    storage: Arc<S>,
    lock: Arc<RwLock<()>>,
}

impl<S> Clone for PodRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            lock: Arc::clone(&self.lock),
        }
    }
}

impl<S: Storage> PodRegistry<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            lock: Arc::new(RwLock::new(())),
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Create a pod after probing for an existing record and validating its spec.
    ///
    /// An empty status is defaulted to `Unassigned` before the record is written.
    pub async fn create_pod(&self, ctx: &CancellationToken, mut pod: Pod) -> RegistryResult<()> {
        let _guard = self.lock.write().await;
        let key = pod_key(&pod.name);
        debug!(pod = %pod.name, "creating pod");

        let probe: StorageResult<Pod> = self.storage.get(ctx, &key).await;
        match probe {
            Ok(_) => {
                warn!(pod = %pod.name, "rejected create of existing pod");
                return Err(Report::new(RegistryError::Conflict { name: pod.name }));
            }
            Err(report) if report.current_context().is_not_found() => {}
            Err(report) => return Err(classify(report, Operation::Create, &pod.name, &key)),
        }

        if pod.status.is_empty() {
            pod.status = PodStatus::unassigned();
        }

        if let Err(violation) = validate_pod_spec(&pod.spec) {
            warn!(pod = %pod.name, %violation, "rejected create with invalid spec");
            return Err(Report::new(RegistryError::InvalidSpec {
                name: pod.name,
                violation,
            }));
        }

        self.storage
            .create(ctx, &key, &pod)
            .await
            .map_err(|report| classify(report, Operation::Create, &pod.name, &key))?;

        info!(pod = %pod.name, status = %pod.status, "created pod");
        Ok(())
    }

    /// Get a pod by name
    pub async fn get_pod(&self, ctx: &CancellationToken, name: &str) -> RegistryResult<Pod> {
        let _guard = self.lock.read().await;
        let key = pod_key(name);

        self.storage
            .get(ctx, &key)
            .await
            .map_err(|report| classify(report, Operation::Get, name, &key))
    }

    /// Replace a pod after validating its spec.
    ///
    /// Existence is not probed; a missing record surfaces as `NotFound` from
    /// the storage update. The status is written as given.
    pub async fn update_pod(&self, ctx: &CancellationToken, pod: Pod) -> RegistryResult<()> {
        let _guard = self.lock.write().await;
        let key = pod_key(&pod.name);
        debug!(pod = %pod.name, "updating pod");

        if let Err(violation) = validate_pod_spec(&pod.spec) {
            warn!(pod = %pod.name, %violation, "rejected update with invalid spec");
            return Err(Report::new(RegistryError::InvalidSpec {
                name: pod.name,
                violation,
            }));
        }

        self.storage
            .update(ctx, &key, &pod)
            .await
            .map_err(|report| classify(report, Operation::Update, &pod.name, &key))?;

        info!(pod = %pod.name, status = %pod.status, "updated pod");
        Ok(())
    }

    pub async fn delete_pod(&self, ctx: &CancellationToken, name: &str) -> RegistryResult<()> {
        let _guard = self.lock.write().await;
        let key = pod_key(name);

        self.storage
            .delete(ctx, &key)
            .await
            .map_err(|report| classify(report, Operation::Delete, name, &key))?;

        info!(pod = %name, "deleted pod");
        Ok(())
    }

    /// List all pods in the order storage returns them
    pub async fn list_pods(&self, ctx: &CancellationToken) -> RegistryResult<Vec<Pod>> {
        let _guard = self.lock.read().await;

        self.storage.list(ctx, POD_PREFIX).await.map_err(|report| {
            report.change_context(RegistryError::Storage {
                operation: Operation::List,
                key: POD_PREFIX.to_string(),
            })
        })
    }

    /// List pods still waiting for a scheduler, preserving list order.
    pub async fn list_unassigned_pods(&self, ctx: &CancellationToken) -> RegistryResult<Vec<Pod>> {
        let pods = self.list_pods(ctx).await?;
        Ok(pods.into_iter().filter(|pod| pod.is_unassigned()).collect())
    }
}

/// Map a storage failure onto the registry taxonomy, keeping the storage frame.
fn classify(
    report: Report<StorageError>,
    operation: Operation,
    name: &str,
    key: &str,
) -> Report<RegistryError> {
    let context = match report.current_context() {
        StorageError::NotFound { .. } => RegistryError::NotFound {
            name: name.to_string(),
        },
        StorageError::AlreadyExists { .. } => RegistryError::Conflict {
            name: name.to_string(),
        },
        StorageError::Cancelled | StorageError::Other { .. } => RegistryError::Storage {
            operation,
            key: key.to_string(),
        },
    };
    report.change_context(context)
}
