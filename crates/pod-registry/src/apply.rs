//! Loads manifest pods into a registry on behalf of the binary

use anyhow::Result;
use api_types::Pod;
use tokio_util::sync::CancellationToken;

use crate::registry::PodRegistry;
use crate::storage::Storage;

/// Per-manifest result of creating every pod.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub created: Vec<String>,
    pub rejected: Vec<String>,
}

impl ApplyOutcome {
    /// Fails when any manifest pod was rejected, naming them.
    pub fn ensure_all_created(&self) -> Result<()> {
        if !self.rejected.is_empty() {
            anyhow::bail!(
                "{} of {} pods were rejected: {}",
                self.rejected.len(),
                self.rejected.len() + self.created.len(),
                self.rejected.join(", ")
            );
        }
        Ok(())
    }
}

/// Create each pod in manifest order, continuing past rejections.
pub async fn apply_pods<S: Storage>(
    registry: &PodRegistry<S>,
    ctx: &CancellationToken,
    pods: Vec<Pod>,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();
    for pod in pods {
        let name = pod.name.clone();
        match registry.create_pod(ctx, pod).await {
            Ok(()) => outcome.created.push(name),
            Err(report) => {
                tracing::warn!(pod = %name, "create failed: {report:?}");
                outcome.rejected.push(name);
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use api_types::{Container, PodSpec};
    use similar_asserts::assert_eq;

    use super::*;
    use crate::storage::MemoryStorage;

    fn pod(name: &str, replicas: i32) -> Pod {
        Pod::new(name, PodSpec::new(replicas, vec![Container::new("nginx")]))
    }

    #[test_log::test(tokio::test)]
    async fn rejected_pods_fail_the_apply() {
        let registry = PodRegistry::new(Arc::new(MemoryStorage::new()));
        let ctx = CancellationToken::new();

        let outcome = apply_pods(
            &registry,
            &ctx,
            vec![pod("a", 1), pod("b", 0), pod("a", 1), pod("c", 2)],
        )
        .await;

        assert_eq!(outcome.created, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(outcome.rejected, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(registry.list_pods(&ctx).await.unwrap().len(), 2);

        let err = outcome.ensure_all_created().unwrap_err();
        assert_eq!(err.to_string(), "2 of 4 pods were rejected: b, a");
    }

    #[test_log::test(tokio::test)]
    async fn clean_apply_succeeds() {
        let registry = PodRegistry::new(Arc::new(MemoryStorage::new()));
        let ctx = CancellationToken::new();

        let outcome = apply_pods(&registry, &ctx, vec![pod("a", 1), pod("b", 3)]).await;

        assert!(outcome.rejected.is_empty());
        assert!(outcome.ensure_all_created().is_ok());
    }
}
