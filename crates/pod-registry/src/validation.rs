//! Pod spec validation shared by create and update

use core::error::Error;

use api_types::PodSpec;

/// First rule a pod spec broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SpecViolation {
    #[display("replicas must be at least 1")]
    InsufficientReplicas,
    #[display("at least one container must be specified")]
    NoContainers,
    /// `index` is the position of the offending container.
    #[display("container image must not be empty")]
    EmptyImage { index: usize },
}

impl Error for SpecViolation {}

/// Checks replicas, then container count, then each image in order, and
/// reports only the first violation.
pub fn validate_pod_spec(spec: &PodSpec) -> Result<(), SpecViolation> {
    if spec.replicas < 1 {
        return Err(SpecViolation::InsufficientReplicas);
    }
    if spec.containers.is_empty() {
        return Err(SpecViolation::NoContainers);
    }
    if let Some(index) = spec.containers.iter().position(|c| c.image.is_empty()) {
        return Err(SpecViolation::EmptyImage { index });
    }
    Ok(())
}
