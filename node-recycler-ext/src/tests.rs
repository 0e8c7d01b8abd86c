use std::time::Duration;

use super::*;

const HOUR: Duration = Duration::from_secs(3600);

#[test]
fn node_label_lookup_ignores_value() {
    let node = corev1::Node::new("node-1").labelled("cloud.google.com/gke-preemptible", "");
    assert!(node.has_label("cloud.google.com/gke-preemptible"));
    assert!(!node.has_label("cloud.google.com/gke-spot"));
}

#[test]
fn node_without_labels_has_none() {
    let node = corev1::Node::new("node-1");
    assert!(!node.has_label("anything"));
}

#[test]
fn node_schedulability_defaults_to_schedulable() {
    let node = corev1::Node::new("node-1");
    assert!(!node.is_unschedulable());
    assert!(node.cordoned().is_unschedulable());
}

#[test]
fn node_provider_id() {
    let node = corev1::Node::new("node-1");
    assert_eq!(node.provider_id(), None);
    let node = node.provider("gce://proj-1/us-central1-a/node-1");
    assert_eq!(node.provider_id(), Some("gce://proj-1/us-central1-a/node-1"));
}

#[test]
fn node_age() {
    let now = metav1::Time::now();
    let node = corev1::Node::new("node-1").created(now.earlier_by(20 * HOUR));
    assert_eq!(node.age_at(&now), Some(20 * HOUR));
}

#[test]
fn node_age_without_timestamp() {
    let now = metav1::Time::now();
    let node = corev1::Node::new("node-1");
    assert_eq!(node.age_at(&now), None);
}

#[test]
fn future_creation_is_zero_age() {
    let now = metav1::Time::now();
    let earlier = now.earlier_by(HOUR);
    assert_eq!(now.age_at(&earlier), Duration::ZERO);
}

#[test]
fn pod_assigned_node() {
    let pod = corev1::Pod::new("web-1", "default");
    assert_eq!(pod.assigned_node(), None);
    let pod = pod.on_node("node-1");
    assert_eq!(pod.assigned_node(), Some("node-1"));
    assert_eq!(pod.metadata.namespace.as_deref(), Some("default"));
}

#[test]
fn object_meta_labels_accumulate() {
    let meta = metav1::ObjectMeta::new("node-1").label("a", "1").label("b", "2");
    let labels = meta.labels.unwrap_or_default();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels.get("a").map(String::as_str), Some("1"));
}
