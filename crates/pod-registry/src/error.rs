//! Error types for registry operations

use core::error::Error;

use error_stack::Report;

use crate::validation::SpecViolation;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, Report<RegistryError>>;

/// Registry operation, carried in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Operation {
    #[display("create")]
    Create,
    #[display("get")]
    Get,
    #[display("update")]
    Update,
    #[display("delete")]
    Delete,
    #[display("list")]
    List,
}

/// Errors surfaced by the pod registry.
///
/// Storage failures keep the originating [`StorageError`](crate::storage::StorageError)
/// as the previous frame of the report.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RegistryError {
    #[display("pod {name} already exists")]
    Conflict { name: String },
    #[display("invalid pod spec for {name}: {violation}")]
    InvalidSpec {
        name: String,
        violation: SpecViolation,
    },
    #[display("pod {name} not found")]
    NotFound { name: String },
    #[display("storage failure during {operation} of {key}")]
    Storage { operation: Operation, key: String },
}

impl Error for RegistryError {}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn violation(&self) -> Option<SpecViolation> {
        match self {
            Self::InvalidSpec { violation, .. } => Some(*violation),
            _ => None,
        }
    }
}
