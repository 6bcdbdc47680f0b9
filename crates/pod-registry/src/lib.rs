//! In-process pod registry over a generic key-value store.
//!
//! [`PodRegistry`] serializes create/update/delete against a shared
//! [`Storage`] backend, rejects duplicate names and invalid specs before
//! anything is written, and defaults new pods to the `Unassigned` status.

pub mod apply;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod storage;
pub mod validation;

pub use error::{Operation, RegistryError, RegistryResult};
pub use registry::{pod_key, PodRegistry, POD_PREFIX};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use validation::{validate_pod_spec, SpecViolation};
