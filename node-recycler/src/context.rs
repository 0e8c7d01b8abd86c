use std::fmt;
use std::sync::Arc;

use node_recycler_ext as k8s;

use k8s::PodExt as _;

use super::ClusterApi;
use super::ComputeApi;
use super::Error;
use super::PodRef;
use super::RetryPolicy;
use super::config::DEFAULT_RECYCLABLE_LABEL;

/// Where the recycler itself runs.
///
/// Resolved once at startup. If the pod is later moved to another node this
/// value goes stale and self-detection with it; the recycler does not
/// re-resolve it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelfIdentity {
    pub pod: String,
    pub namespace: String,
    pub node: String,
}

impl SelfIdentity {
    pub fn new(pod: impl ToString, namespace: impl ToString, node: impl ToString) -> Self {
        Self {
            pod: pod.to_string(),
            namespace: namespace.to_string(),
            node: node.to_string(),
        }
    }

    /// Look up the node the pod `namespace/pod` is scheduled on.
    pub async fn resolve(cluster: &dyn ClusterApi, pod: &str, namespace: &str) -> Result<Self, Error> {
        let unresolved = |reason: String| Error::SelfIdentityUnresolved {
            pod: pod.to_string(),
            namespace: namespace.to_string(),
            reason,
        };

        let record = cluster
            .get_pod(pod, namespace)
            .await
            .map_err(|err| unresolved(err.to_string()))?;
        let node = record
            .assigned_node()
            .ok_or_else(|| unresolved("pod is not scheduled on any node".to_string()))?;

        tracing::info!(pod, namespace, node, "Resolved own node");
        Ok(Self::new(pod, namespace, node))
    }

    pub fn is_on(&self, node: &str) -> bool {
        self.node == node
    }

    pub fn pod_ref(&self) -> PodRef {
        PodRef::new(&self.namespace, &self.pod)
    }
}

/// Everything a recycle cycle needs, built once at startup and borrowed by
/// every step.
#[derive(Clone)]
pub struct Context {
    pub cluster: Arc<dyn ClusterApi>,
    pub compute: Arc<dyn ComputeApi>,
    pub identity: SelfIdentity,
    pub recyclable_label: String,
    pub retry: RetryPolicy,
}

impl Context {
    pub fn new(
        cluster: Arc<dyn ClusterApi>,
        compute: Arc<dyn ComputeApi>,
        identity: SelfIdentity,
    ) -> Self {
        Self {
            cluster,
            compute,
            identity,
            recyclable_label: DEFAULT_RECYCLABLE_LABEL.to_string(),
            retry: RetryPolicy::none(),
        }
    }

    pub fn recyclable_label(self, label: impl ToString) -> Self {
        Self {
            recyclable_label: label.to_string(),
            ..self
        }
    }

    pub fn retry(self, retry: RetryPolicy) -> Self {
        Self { retry, ..self }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cluster", &"<ClusterApi>")
            .field("compute", &"<ComputeApi>")
            .field("identity", &self.identity)
            .field("recyclable_label", &self.recyclable_label)
            .field("retry", &self.retry)
            .finish()
    }
}
