use async_trait::async_trait;
use node_recycler_ext as k8s;
use node_recycler_gce::GceCompute;
use node_recycler_gce::GceError;
use node_recycler_gce::Operation;
use node_recycler_gce::ProviderId;
use node_recycler_kubeapi::KubeApi;

use k8s::corev1;

/// Failure of a single cluster or compute control-plane call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Compute(#[from] GceError),

    /// Refusal injected by the in-memory control planes.
    #[cfg(test)]
    #[error("{0}")]
    Rejected(String),
}

/// The cluster control-plane operations the recycler consumes.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, ApiError>;
    async fn get_node(&self, name: &str) -> Result<corev1::Node, ApiError>;
    async fn cordon_node(&self, name: &str) -> Result<(), ApiError>;
    async fn delete_node(&self, name: &str) -> Result<(), ApiError>;
    async fn list_pods_on_node(&self, node: &str) -> Result<Vec<corev1::Pod>, ApiError>;
    async fn get_pod(&self, name: &str, namespace: &str) -> Result<corev1::Pod, ApiError>;
    async fn evict_pod(&self, name: &str, namespace: &str) -> Result<(), ApiError>;
}

/// The compute control-plane operation the recycler consumes.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn delete_instance(&self, id: &ProviderId) -> Result<Operation, ApiError>;
}

#[async_trait]
impl ClusterApi for KubeApi {
    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, ApiError> {
        Ok(Self::list_nodes(self).await?)
    }

    async fn get_node(&self, name: &str) -> Result<corev1::Node, ApiError> {
        Ok(Self::get_node(self, name).await?)
    }

    async fn cordon_node(&self, name: &str) -> Result<(), ApiError> {
        Self::cordon_node(self, name).await?;
        Ok(())
    }

    async fn delete_node(&self, name: &str) -> Result<(), ApiError> {
        Ok(Self::delete_node(self, name).await?)
    }

    async fn list_pods_on_node(&self, node: &str) -> Result<Vec<corev1::Pod>, ApiError> {
        Ok(Self::list_pods_on_node(self, node).await?)
    }

    async fn get_pod(&self, name: &str, namespace: &str) -> Result<corev1::Pod, ApiError> {
        Ok(Self::get_pod(self, name, namespace).await?)
    }

    async fn evict_pod(&self, name: &str, namespace: &str) -> Result<(), ApiError> {
        Ok(Self::evict_pod(self, name, namespace).await?)
    }
}

#[async_trait]
impl ComputeApi for GceCompute {
    async fn delete_instance(&self, id: &ProviderId) -> Result<Operation, ApiError> {
        Ok(Self::delete_instance(self, id).await?)
    }
}
