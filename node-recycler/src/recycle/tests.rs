use std::sync::Arc;
use std::time::Duration;

use node_recycler_ext::NodeExt as _;
use node_recycler_ext::PodExt as _;
use node_recycler_ext::corev1;

use super::*;
use crate::RetryPolicy;
use crate::fake;
use crate::fake::Call;
use crate::fake::FakeCluster;
use crate::fake::FakeCompute;
use crate::fake::Journal;

use super::RecycleState::*;

const PROVIDER_ID: &str = "gce://proj-1/us-central1-a/node-1";

fn target() -> corev1::Node {
    corev1::Node::new("node-1").provider(PROVIDER_ID)
}

fn cluster(journal: &Arc<Journal>) -> FakeCluster {
    FakeCluster::default()
        .node(target())
        .pod(corev1::Pod::new("web-1", "default").on_node("node-1"))
        .pod(corev1::Pod::new("db-0", "data").on_node("node-1"))
        .pod(corev1::Pod::new("fluentd-x7k2p", "kube-system").on_node("node-1"))
        .pod(corev1::Pod::new("web-2", "default").on_node("node-2"))
        .journal(journal)
}

fn evict(pod: &str) -> Call {
    Call::Evict(pod.to_string())
}

#[tokio::test]
async fn foreign_node_runs_full_sequence_in_order() {
    let journal = Arc::new(Journal::default());
    let compute = FakeCompute::default().journal(&journal);
    let ctx = fake::context(cluster(&journal), compute, "node-2");

    let report = recycle(&ctx, &target()).await;

    assert_eq!(
        journal.mutations(),
        [
            Call::Cordon("node-1".to_string()),
            evict("default/web-1"),
            evict("data/db-0"),
            evict("kube-system/fluentd-x7k2p"),
            Call::DeleteNode("node-1".to_string()),
            Call::DeleteInstance(PROVIDER_ID.to_string()),
        ]
    );
    assert_eq!(
        report.trace,
        [
            Idle,
            Cordoning,
            SelfCheck,
            Draining,
            NodeDeleting,
            InstanceTerminating,
            Done
        ]
    );
    assert_eq!(report.node, "node-1");
    assert_eq!(report.cordon, StepOutcome::Done);
    assert!(!report.is_self_eviction());
    let Disposition::Recycled {
        drain,
        delete,
        terminate,
    } = report.disposition
    else {
        panic!("expected a recycled node");
    };
    assert_eq!(drain.evicted(), 3);
    assert_eq!(delete, StepOutcome::Done);
    assert_eq!(terminate.outcome, StepOutcome::Done);
    assert_eq!(
        terminate.operation.map(|operation| operation.name),
        Some("operation-delete-node-1".to_string())
    );
}

#[tokio::test]
async fn own_node_evicts_self_and_stops() {
    let journal = Arc::new(Journal::default());
    let compute = FakeCompute::default().journal(&journal);
    let ctx = fake::context(cluster(&journal), compute, "node-1");

    let report = recycle(&ctx, &target()).await;

    assert_eq!(
        journal.mutations(),
        [
            Call::Cordon("node-1".to_string()),
            evict("kube-system/node-recycler-0"),
        ]
    );
    assert_eq!(report.trace, [Idle, Cordoning, SelfCheck, SelfEviction]);
    assert!(report.is_self_eviction());
    assert_eq!(
        report.disposition,
        Disposition::SelfEvicted {
            eviction: StepOutcome::Done
        }
    );
}

#[tokio::test]
async fn own_node_never_deleted_even_when_self_eviction_fails() {
    let journal = Arc::new(Journal::default());
    let cluster = cluster(&journal).failing(evict("kube-system/node-recycler-0"));
    let compute = FakeCompute::default().journal(&journal);
    let ctx = fake::context(cluster, compute, "node-1");

    let report = recycle(&ctx, &target()).await;

    assert!(report.is_self_eviction());
    assert!(
        !journal
            .calls()
            .iter()
            .any(|call| matches!(call, Call::DeleteNode(_) | Call::DeleteInstance(_)))
    );
}

#[tokio::test]
async fn every_step_runs_despite_earlier_failures() {
    let journal = Arc::new(Journal::default());
    let cluster = cluster(&journal)
        .failing(Call::Cordon("node-1".to_string()))
        .failing(evict("default/web-1"))
        .failing(evict("data/db-0"))
        .failing(Call::DeleteNode("node-1".to_string()));
    let compute = FakeCompute::default().journal(&journal).failing();
    let ctx = fake::context(cluster, compute, "node-2");

    let report = recycle(&ctx, &target()).await;

    assert_eq!(
        journal.mutations(),
        [
            Call::Cordon("node-1".to_string()),
            evict("default/web-1"),
            evict("data/db-0"),
            evict("kube-system/fluentd-x7k2p"),
            Call::DeleteNode("node-1".to_string()),
            Call::DeleteInstance(PROVIDER_ID.to_string()),
        ]
    );
    assert!(report.cordon.is_failed());
    assert_eq!(report.trace.last(), Some(&Done));
    let Disposition::Recycled {
        drain,
        delete,
        terminate,
    } = report.disposition
    else {
        panic!("expected a recycled node");
    };
    assert_eq!(drain.failed(), 2);
    assert_eq!(drain.evicted(), 1);
    assert!(delete.is_failed());
    assert!(terminate.is_failed());
    assert_eq!(terminate.operation, None);
}

#[tokio::test]
async fn retry_policy_reaches_every_mutating_step() {
    let journal = Arc::new(Journal::default());
    let cluster = cluster(&journal)
        .failing(Call::Cordon("node-1".to_string()))
        .failing(evict("default/web-1"))
        .failing(Call::DeleteNode("node-1".to_string()));
    let compute = FakeCompute::default().journal(&journal).failing();
    let retry = RetryPolicy::exponential(3, Duration::from_millis(1), Duration::from_millis(1));
    let ctx = fake::context(cluster, compute, "node-2").retry(retry);

    let report = recycle(&ctx, &target()).await;

    let attempts = |expected: &Call| {
        journal
            .calls()
            .iter()
            .filter(|call| *call == expected)
            .count()
    };
    assert_eq!(attempts(&Call::Cordon("node-1".to_string())), 3);
    assert_eq!(attempts(&evict("default/web-1")), 3);
    assert_eq!(attempts(&evict("data/db-0")), 1);
    assert_eq!(attempts(&Call::DeleteNode("node-1".to_string())), 3);
    assert_eq!(attempts(&Call::DeleteInstance(PROVIDER_ID.to_string())), 3);
    assert_eq!(attempts(&Call::ListPods("node-1".to_string())), 1);
    assert!(report.cordon.is_failed());
    assert_eq!(report.trace.last(), Some(&Done));
}

#[tokio::test]
async fn pod_listing_failure_still_deletes_and_terminates() {
    let journal = Arc::new(Journal::default());
    let cluster = cluster(&journal).failing(Call::ListPods("node-1".to_string()));
    let compute = FakeCompute::default().journal(&journal);
    let ctx = fake::context(cluster, compute, "node-2");

    let report = recycle(&ctx, &target()).await;

    assert_eq!(
        journal.mutations(),
        [
            Call::Cordon("node-1".to_string()),
            Call::DeleteNode("node-1".to_string()),
            Call::DeleteInstance(PROVIDER_ID.to_string()),
        ]
    );
    let Disposition::Recycled { drain, .. } = report.disposition else {
        panic!("expected a recycled node");
    };
    assert!(drain.listing.is_failed());
}

#[tokio::test]
async fn already_cordoned_node_skips_the_write() {
    let journal = Arc::new(Journal::default());
    let node = target().cordoned();
    let cluster = FakeCluster::default().node(node.clone()).journal(&journal);
    let compute = FakeCompute::default().journal(&journal);
    let ctx = fake::context(cluster, compute, "node-2");

    let report = recycle(&ctx, &node).await;

    assert!(matches!(report.cordon, StepOutcome::Skipped(_)));
    assert_eq!(
        journal.mutations(),
        [
            Call::DeleteNode("node-1".to_string()),
            Call::DeleteInstance(PROVIDER_ID.to_string()),
        ]
    );
}
