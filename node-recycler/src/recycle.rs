//! The recycle cycle for one elected node.
//!
//! ```text
//! Idle -> Cordoning -> SelfCheck -> SelfEviction (recycler yields)
//!                                -> Draining -> NodeDeleting -> InstanceTerminating -> Done
//! ```
//!
//! Every step after the cordon runs whatever the previous step's outcome;
//! a half finished node is picked up again on a later tick.

use std::fmt;

use kube::ResourceExt as _;
use node_recycler_ext as k8s;

use k8s::corev1;

use super::Context;
use super::DrainReport;
use super::StepOutcome;
use super::evictor;
use super::mutator;
use super::Termination;
use super::terminator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecycleState {
    Idle,
    Cordoning,
    SelfCheck,
    SelfEviction,
    Draining,
    NodeDeleting,
    InstanceTerminating,
    Done,
}

impl fmt::Display for RecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The node hosts the recycler. Its own pod was evicted and the node is
    /// left for whichever recycler replaces it.
    SelfEvicted { eviction: StepOutcome },
    Recycled {
        drain: DrainReport,
        delete: StepOutcome,
        terminate: Termination,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecycleReport {
    pub node: String,
    /// States entered, in order.
    pub trace: Vec<RecycleState>,
    pub cordon: StepOutcome,
    pub disposition: Disposition,
}

impl RecycleReport {
    pub fn is_self_eviction(&self) -> bool {
        matches!(self.disposition, Disposition::SelfEvicted { .. })
    }
}

struct Trace {
    node: String,
    states: Vec<RecycleState>,
}

impl Trace {
    fn new(node: String) -> Self {
        Self {
            node,
            states: vec![RecycleState::Idle],
        }
    }

    fn enter(&mut self, state: RecycleState) {
        tracing::debug!(node = self.node, %state, "Entering state");
        self.states.push(state);
    }

    fn finish(self, cordon: StepOutcome, disposition: Disposition) -> RecycleReport {
        RecycleReport {
            node: self.node,
            trace: self.states,
            cordon,
            disposition,
        }
    }
}

/// Run one recycle cycle against `node`.
///
/// Never fails: each step's outcome is recorded in the report. When the
/// report is a self eviction the caller is expected to exit.
pub async fn recycle(ctx: &Context, node: &corev1::Node) -> RecycleReport {
    let name = node.name_any();
    tracing::info!(node = name, "Preparing to recycle node");
    let mut trace = Trace::new(name.clone());

    trace.enter(RecycleState::Cordoning);
    let cordon = mutator::cordon(ctx, node).await;

    trace.enter(RecycleState::SelfCheck);
    if ctx.identity.is_on(&name) {
        trace.enter(RecycleState::SelfEviction);
        tracing::info!(node = name, pod = ctx.identity.pod, "This is my node. Evicting myself");
        let eviction = evictor::evict(ctx, &ctx.identity.pod_ref()).await;
        return trace.finish(cordon, Disposition::SelfEvicted { eviction });
    }

    trace.enter(RecycleState::Draining);
    let drain = evictor::drain(ctx, &name).await;

    trace.enter(RecycleState::NodeDeleting);
    let delete = mutator::delete_node(ctx, &name).await;

    trace.enter(RecycleState::InstanceTerminating);
    let terminate = terminator::terminate(ctx, node).await;

    trace.enter(RecycleState::Done);
    tracing::info!(
        node = name,
        %cordon,
        %delete,
        %terminate,
        "Node has been recycled"
    );
    trace.finish(
        cordon,
        Disposition::Recycled {
            drain,
            delete,
            terminate,
        },
    )
}

#[cfg(test)]
mod tests;
