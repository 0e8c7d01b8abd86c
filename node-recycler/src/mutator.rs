//! Node object changes: cordon and delete.

use kube::ResourceExt as _;
use node_recycler_ext as k8s;

use k8s::NodeExt as _;
use k8s::corev1;

use super::Context;
use super::StepOutcome;

/// Mark the node unschedulable. Nothing is written when it already is.
///
/// The schedulability flag is read from a fresh copy of the node, falling back
/// to `node` when that read fails.
pub async fn cordon(ctx: &Context, node: &corev1::Node) -> StepOutcome {
    let name = node.name_any();
    let unschedulable = match ctx.cluster.get_node(&name).await {
        Ok(current) => current.is_unschedulable(),
        Err(err) => {
            tracing::debug!(node = name, %err, "Using listed node state");
            node.is_unschedulable()
        }
    };

    if unschedulable {
        tracing::info!(node = name, "Node already cordoned");
        return StepOutcome::skipped("already unschedulable");
    }

    tracing::info!(node = name, "Cordoning node");
    let cluster = &ctx.cluster;
    let name = name.as_str();
    match ctx
        .retry
        .run("cordon node", move || cluster.cordon_node(name))
        .await
    {
        Ok(()) => StepOutcome::Done,
        Err(err) => {
            tracing::warn!(node = name, %err, "Unable to cordon node");
            StepOutcome::failed(err)
        }
    }
}

/// Remove the Node object from the cluster.
pub async fn delete_node(ctx: &Context, name: &str) -> StepOutcome {
    tracing::info!(node = name, "Removing node from cluster");
    let cluster = &ctx.cluster;
    match ctx
        .retry
        .run("delete node", move || cluster.delete_node(name))
        .await
    {
        Ok(()) => {
            tracing::info!(node = name, "Node removed");
            StepOutcome::Done
        }
        Err(err) => {
            tracing::error!(node = name, %err, "Unable to remove node");
            StepOutcome::failed(err)
        }
    }
}
