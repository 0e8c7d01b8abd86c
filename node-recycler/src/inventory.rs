//! Fetching nodes and narrowing them to the recyclable ones.

use kube::ResourceExt as _;
use node_recycler_ext as k8s;

use k8s::NodeExt as _;
use k8s::corev1;

use super::Context;
use super::Error;

/// Every node in the cluster, fresh from the control plane.
pub async fn list_nodes(ctx: &Context) -> Result<Vec<corev1::Node>, Error> {
    tracing::info!("Listing available nodes in the cluster");
    ctx.cluster
        .list_nodes()
        .await
        .map_err(Error::ControlPlaneUnavailable)
}

/// Nodes carrying `label`, in their original order. An empty result is not an error.
pub fn filter_recyclable(nodes: Vec<corev1::Node>, label: &str) -> Vec<corev1::Node> {
    nodes
        .into_iter()
        .filter(|node| node.has_label(label))
        .collect()
}

pub async fn recyclable_nodes(ctx: &Context) -> Result<Vec<corev1::Node>, Error> {
    let nodes = list_nodes(ctx).await?;
    let total = nodes.len();
    let recyclable = filter_recyclable(nodes, &ctx.recyclable_label);
    tracing::info!(
        total,
        recyclable = recyclable.len(),
        label = ctx.recyclable_label,
        "Found nodes that can be recycled"
    );
    tracing::debug!(
        nodes = ?recyclable.iter().map(|node| node.name_any()).collect::<Vec<_>>(),
        "Recyclable nodes"
    );
    Ok(recyclable)
}
