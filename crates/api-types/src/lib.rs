//! Shared API type definitions
//!
//! This crate contains the resource records exchanged between the pod registry,
//! its storage backends and external schedulers: the Pod itself, its desired-state
//! spec and the lifecycle status marker.

use serde::Deserialize;
use serde::Serialize;

/// Pod resource record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pod {
    /// Unique pod name, also used to derive the storage key
    pub name: String,
    /// Desired state
    pub spec: PodSpec,
    /// Lifecycle status, empty until the registry defaults it
    #[serde(default)]
    pub status: PodStatus,
}

impl Pod {
    pub fn new(name: impl Into<String>, spec: PodSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            status: PodStatus::default(),
        }
    }

    pub fn with_status(mut self, status: impl Into<PodStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.status.is_unassigned()
    }
}

/// Desired-state descriptor of a pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PodSpec {
    /// Number of replicas, must be at least 1
    pub replicas: i32,
    /// Containers in declaration order, must not be empty
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl PodSpec {
    pub fn new(replicas: i32, containers: Vec<Container>) -> Self {
        Self {
            replicas,
            containers,
        }
    }
}

/// Container descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Container {
    /// Container image reference, must not be empty
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

impl Container {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Pod lifecycle status.
///
/// Only [`PodStatus::UNASSIGNED`] carries meaning for the registry; any other
/// value is assigned by external schedulers and kept verbatim.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PodStatus(String);

impl PodStatus {
    pub const UNASSIGNED: &'static str = "Unassigned";

    pub fn unassigned() -> Self {
        Self(Self::UNASSIGNED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_unassigned(&self) -> bool {
        self.0 == Self::UNASSIGNED
    }
}

impl From<&str> for PodStatus {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
