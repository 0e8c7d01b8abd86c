//! Evicting the workloads of a node, best effort.
//!
//! Evictions go through the eviction subresource so disruption budgets are
//! honoured. A refused or failed eviction is logged and recorded, never
//! retried beyond the context's retry policy, and never stops the remaining
//! evictions: deleting the Node afterwards removes whatever pods are left.

use std::fmt;

use kube::ResourceExt as _;
use node_recycler_ext as k8s;

use k8s::PodExt as _;
use k8s::corev1;

use super::ApiError;
use super::Context;
use super::StepOutcome;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
}

impl PodRef {
    pub fn new(namespace: impl ToString, name: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<&corev1::Pod> for PodRef {
    fn from(pod: &corev1::Pod) -> Self {
        Self::new(pod.namespace().unwrap_or_default(), pod.name_any())
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eviction {
    pub pod: PodRef,
    pub outcome: StepOutcome,
}

/// What happened while draining a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrainReport {
    /// Outcome of listing the pods on the node.
    pub listing: StepOutcome,
    pub evictions: Vec<Eviction>,
}

impl DrainReport {
    pub fn evicted(&self) -> usize {
        self.evictions
            .iter()
            .filter(|eviction| eviction.outcome.is_done())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.evictions
            .iter()
            .filter(|eviction| eviction.outcome.is_failed())
            .count()
    }
}

/// Pods currently assigned to `node`, in every namespace.
pub async fn pods_on(ctx: &Context, node: &str) -> Result<Vec<corev1::Pod>, ApiError> {
    tracing::info!(node, "Listing pods in the node");
    let cluster = &ctx.cluster;
    let pods = ctx
        .retry
        .run("list pods", move || cluster.list_pods_on_node(node))
        .await?;
    Ok(pods
        .into_iter()
        .filter(|pod| pod.assigned_node() == Some(node))
        .collect())
}

/// Ask the control plane to evict `pod`.
pub async fn evict(ctx: &Context, pod: &PodRef) -> StepOutcome {
    tracing::info!(%pod, "Evicting pod");
    let cluster = &ctx.cluster;
    let PodRef { namespace, name } = pod;
    match ctx
        .retry
        .run("evict pod", move || cluster.evict_pod(name, namespace))
        .await
    {
        Ok(()) => StepOutcome::Done,
        Err(err) => {
            tracing::warn!(%pod, %err, "Eviction failed");
            StepOutcome::failed(err)
        }
    }
}

/// Evict every pod on `node`, one after another, whatever each outcome.
pub async fn drain(ctx: &Context, node: &str) -> DrainReport {
    tracing::info!(node, "Preparing to drain node");
    let pods = match pods_on(ctx, node).await {
        Ok(pods) => pods,
        Err(err) => {
            tracing::error!(node, %err, "Unable to list pods on node");
            return DrainReport {
                listing: StepOutcome::failed(err),
                evictions: Vec::new(),
            };
        }
    };

    let mut evictions = Vec::with_capacity(pods.len());
    for pod in pods.iter().map(PodRef::from) {
        let outcome = evict(ctx, &pod).await;
        evictions.push(Eviction { pod, outcome });
    }

    let report = DrainReport {
        listing: StepOutcome::Done,
        evictions,
    };
    tracing::info!(
        node,
        evicted = report.evicted(),
        failed = report.failed(),
        "Drain finished"
    );
    report
}
