//! Terminating the compute instance behind a node.

use std::fmt;

use kube::ResourceExt as _;
use node_recycler_ext as k8s;
use node_recycler_gce::Operation;
use node_recycler_gce::ProviderId;

use k8s::NodeExt as _;
use k8s::corev1;

use super::Context;
use super::StepOutcome;

/// What happened to the instance behind a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Termination {
    pub outcome: StepOutcome,
    /// The compute operation tracking the deletion, once it was accepted.
    pub operation: Option<Operation>,
}

impl Termination {
    fn started(operation: Operation) -> Self {
        Self {
            outcome: StepOutcome::Done,
            operation: Some(operation),
        }
    }

    fn failed(err: impl fmt::Display) -> Self {
        Self {
            outcome: StepOutcome::failed(err),
            operation: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_done()
    }

    pub fn is_failed(&self) -> bool {
        self.outcome.is_failed()
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operation {
            Some(operation) => write!(f, "{} ({})", self.outcome, operation.name),
            None => fmt::Display::fmt(&self.outcome, f),
        }
    }
}

/// Delete the instance named by the node's provider id.
///
/// Completes once the compute API has accepted the deletion; the operation it
/// starts is returned, not awaited.
pub async fn terminate(ctx: &Context, node: &corev1::Node) -> Termination {
    let name = node.name_any();
    let Some(provider_id) = node.provider_id() else {
        tracing::error!(node = name, "Node has no provider id, cannot delete its instance");
        return Termination::failed("node has no provider id");
    };

    let id = match provider_id.parse::<ProviderId>() {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(node = name, %err, "Cannot delete instance");
            return Termination::failed(err);
        }
    };

    tracing::info!(node = name, instance = %id, "Deleting instance");
    let compute = &ctx.compute;
    let id = &id;
    match ctx
        .retry
        .run("delete instance", move || compute.delete_instance(id))
        .await
    {
        Ok(operation) => {
            tracing::info!(
                node = name,
                operation = operation.name,
                status = ?operation.status,
                "Instance deletion started"
            );
            Termination::started(operation)
        }
        Err(err) => {
            tracing::error!(node = name, instance = %id, %err, "Unable to delete instance");
            Termination::failed(err)
        }
    }
}
