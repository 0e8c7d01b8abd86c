//! In-memory control planes that record every call, for tests.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use kube::ResourceExt as _;
use node_recycler_ext as k8s;
use node_recycler_gce::Operation;
use node_recycler_gce::ProviderId;

use k8s::NodeExt as _;
use k8s::PodExt as _;
use k8s::corev1;

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    ListNodes,
    GetNode(String),
    Cordon(String),
    DeleteNode(String),
    ListPods(String),
    GetPod(String),
    Evict(String),
    DeleteInstance(String),
}

impl Call {
    fn is_read(&self) -> bool {
        matches!(
            self,
            Self::ListNodes | Self::GetNode(_) | Self::ListPods(_) | Self::GetPod(_)
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct Journal(Mutex<Vec<Call>>);

impl Journal {
    fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Calls that change cluster or compute state, in order.
    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|call| !call.is_read()).collect()
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeCluster {
    nodes: Mutex<Vec<corev1::Node>>,
    pods: Vec<corev1::Pod>,
    failing: Vec<Call>,
    journal: Arc<Journal>,
}

impl FakeCluster {
    pub(crate) fn node(self, node: corev1::Node) -> Self {
        self.nodes.lock().unwrap().push(node);
        self
    }

    pub(crate) fn pod(mut self, pod: corev1::Pod) -> Self {
        self.pods.push(pod);
        self
    }

    /// Make every call equal to `call` fail.
    pub(crate) fn failing(mut self, call: Call) -> Self {
        self.failing.push(call);
        self
    }

    pub(crate) fn journal(self, journal: &Arc<Journal>) -> Self {
        Self {
            journal: Arc::clone(journal),
            ..self
        }
    }

    pub(crate) fn stored_node(&self, name: &str) -> Option<corev1::Node> {
        self.nodes
            .lock()
            .unwrap()
            .iter()
            .find(|node| node.name_any() == name)
            .cloned()
    }

    fn call(&self, call: Call) -> Result<(), ApiError> {
        let fails = self.failing.contains(&call);
        let text = format!("{call:?}");
        self.journal.record(call);
        if fails {
            Err(ApiError::Rejected(format!("{text} rejected")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, ApiError> {
        self.call(Call::ListNodes)?;
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn get_node(&self, name: &str) -> Result<corev1::Node, ApiError> {
        self.call(Call::GetNode(name.to_string()))?;
        self.stored_node(name)
            .ok_or_else(|| ApiError::Rejected(format!("node {name} not found")))
    }

    async fn cordon_node(&self, name: &str) -> Result<(), ApiError> {
        self.call(Call::Cordon(name.to_string()))?;
        let mut nodes = self.nodes.lock().unwrap();
        let node = nodes
            .iter_mut()
            .find(|node| node.name_any() == name)
            .ok_or_else(|| ApiError::Rejected(format!("node {name} not found")))?;
        *node = node.clone().cordoned();
        Ok(())
    }

    async fn delete_node(&self, name: &str) -> Result<(), ApiError> {
        self.call(Call::DeleteNode(name.to_string()))?;
        self.nodes
            .lock()
            .unwrap()
            .retain(|node| node.name_any() != name);
        Ok(())
    }

    async fn list_pods_on_node(&self, node: &str) -> Result<Vec<corev1::Pod>, ApiError> {
        self.call(Call::ListPods(node.to_string()))?;
        let pods = self
            .pods
            .iter()
            .filter(|pod| pod.assigned_node() == Some(node))
            .cloned()
            .collect();
        Ok(pods)
    }

    async fn get_pod(&self, name: &str, namespace: &str) -> Result<corev1::Pod, ApiError> {
        self.call(Call::GetPod(format!("{namespace}/{name}")))?;
        self.pods
            .iter()
            .find(|pod| pod.name_any() == name && pod.namespace().as_deref() == Some(namespace))
            .cloned()
            .ok_or_else(|| ApiError::Rejected(format!("pod {namespace}/{name} not found")))
    }

    async fn evict_pod(&self, name: &str, namespace: &str) -> Result<(), ApiError> {
        self.call(Call::Evict(format!("{namespace}/{name}")))
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeCompute {
    failing: bool,
    journal: Arc<Journal>,
}

impl FakeCompute {
    pub(crate) fn failing(self) -> Self {
        Self {
            failing: true,
            ..self
        }
    }

    pub(crate) fn journal(self, journal: &Arc<Journal>) -> Self {
        Self {
            journal: Arc::clone(journal),
            ..self
        }
    }
}

#[async_trait]
impl ComputeApi for FakeCompute {
    async fn delete_instance(&self, id: &ProviderId) -> Result<Operation, ApiError> {
        self.journal.record(Call::DeleteInstance(id.to_string()));
        if self.failing {
            return Err(ApiError::Rejected("quota exceeded".to_string()));
        }
        Ok(Operation {
            name: format!("operation-delete-{}", id.instance),
            status: Some("RUNNING".to_string()),
            ..Default::default()
        })
    }
}

/// A context over the given fakes, recycler running on `self_node`.
pub(crate) fn context(cluster: FakeCluster, compute: FakeCompute, self_node: &str) -> Context {
    let identity = SelfIdentity::new("node-recycler-0", "kube-system", self_node);
    Context::new(Arc::new(cluster), Arc::new(compute), identity)
}
