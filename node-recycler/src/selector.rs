//! Electing the node to recycle.

use kube::ResourceExt as _;
use node_recycler_ext as k8s;

use k8s::NodeExt as _;
use k8s::corev1;

use super::Error;

/// The candidate with the earliest creation timestamp. Ties go to the
/// candidate listed first; nodes without a timestamp sort last.
pub fn select_oldest(candidates: Vec<corev1::Node>) -> Result<corev1::Node, Error> {
    let oldest = candidates
        .into_iter()
        .min_by_key(|node| {
            let created = node.creation_time().cloned();
            (created.is_none(), created)
        })
        .ok_or(Error::NoCandidates)?;
    tracing::info!(node = oldest.name_any(), "Oldest node elected");
    Ok(oldest)
}
