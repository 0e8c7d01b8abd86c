use std::fmt::Debug;

use kube::api;
use node_recycler_ext as k8s;

use k8s::corev1;

pub struct KubeApi {
    list_params: api::ListParams,
    delete_params: api::DeleteParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi configured with a default Kubernetes client.
    ///
    /// The client is inferred from the environment: in-cluster service account
    /// when running inside a pod, the local kubeconfig otherwise.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let api = node_recycler_kubeapi::KubeApi::new().await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    ///
    /// The returned KubeApi uses default `ListParams` and `DeleteParams` and
    /// sends every request through `client`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = kube::Client::try_default().await?;
    /// let api = node_recycler_kubeapi::KubeApi::with_client(client);
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            list_params: api::ListParams::default(),
            delete_params: api::DeleteParams::default(),
            client,
        }
    }

    /// Lists all Nodes in the cluster, in the order the API server returns them.
    ///
    /// # Returns
    ///
    /// A `kube::Result` containing one full `corev1::Node` per Node, labels and
    /// provider id included; the `Err` variant indicates a request or API error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use node_recycler_kubeapi::KubeApi;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let api = KubeApi::new().await?;
    /// let nodes = api.list_nodes().await?;
    /// println!("discovered {} nodes", nodes.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_nodes(&self) -> kube::Result<Vec<corev1::Node>> {
        tracing::debug!("Listing nodes");
        let lp = self.list_params();
        self.nodes().list(lp).await.map(|list| list.items)
    }

    /// Fetches the current state of a single Node.
    ///
    /// # Returns
    ///
    /// `Ok(Node)` as stored by the API server, or a `kube::Error`, a 404 when
    /// the Node no longer exists.
    pub async fn get_node(&self, name: &str) -> kube::Result<corev1::Node> {
        self.nodes().get(name).await
    }

    /// Marks the Node unschedulable.
    ///
    /// Patches `spec.unschedulable` to `true`; pods already running are left in
    /// place.
    ///
    /// # Returns
    ///
    /// The patched `corev1::Node` on success.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> kube::Result<()> {
    /// let api = node_recycler_kubeapi::KubeApi::new().await?;
    /// let node = api.cordon_node("node-1").await?;
    /// assert_eq!(node.spec.and_then(|spec| spec.unschedulable), Some(true));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn cordon_node(&self, name: &str) -> kube::Result<corev1::Node> {
        tracing::debug!(name, "Cordoning node");
        self.nodes().cordon(name).await
    }

    /// Removes the Node object from the cluster.
    ///
    /// The backing instance keeps running; only the cluster's record of it is
    /// deleted.
    pub async fn delete_node(&self, name: &str) -> kube::Result<()> {
        tracing::debug!(name, "Deleting node");
        let dp = self.delete_params();
        self.nodes().delete(name, dp).await.map(|_| ())
    }

    /// Lists Pods in every namespace whose `spec.nodeName` equals `node`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> kube::Result<()> {
    /// let api = node_recycler_kubeapi::KubeApi::new().await?;
    /// let pods = api.list_pods_on_node("node-1").await?;
    /// println!("{} pods scheduled on node-1", pods.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_pods_on_node(&self, node: &str) -> kube::Result<Vec<corev1::Pod>> {
        tracing::debug!(node, "Listing pods on node");
        let lp = self.list_params().clone().fields(&format!("spec.nodeName={node}"));
        self.pods().list(&lp).await.map(|list| list.items)
    }

    /// Fetches the Pod `namespace/name`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> kube::Result<()> {
    /// let api = node_recycler_kubeapi::KubeApi::new().await?;
    /// let pod = api.get_pod("node-recycler-0", "kube-system").await?;
    /// let node = pod.spec.and_then(|spec| spec.node_name);
    /// println!("running on {node:?}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_pod(&self, name: &str, namespace: &str) -> kube::Result<corev1::Pod> {
        self.namespaced_pods(namespace).get(name).await
    }

    /// Posts an Eviction for the Pod. The API server may refuse it when a
    /// PodDisruptionBudget would be violated; that refusal is returned as an error.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the API server has accepted the eviction. The Pod may still
    /// be terminating at that point.
    pub async fn evict_pod(&self, name: &str, namespace: &str) -> kube::Result<()> {
        tracing::debug!(name, namespace, "Evicting pod");
        let ep = api::EvictParams::default();
        self.namespaced_pods(namespace)
            .evict(name, &ep)
            .await
            .map(|_| ())
    }

    /// Cluster scoped Node API.
    fn nodes(&self) -> api::Api<corev1::Node> {
        api::Api::all(self.client.clone())
    }

    /// Pod API across all namespaces, for listing.
    fn pods(&self) -> api::Api<corev1::Pod> {
        api::Api::all(self.client.clone())
    }

    /// Pod API scoped to `namespace`; reads and evictions need a namespace.
    fn namespaced_pods(&self, namespace: &str) -> api::Api<corev1::Pod> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn list_params(&self) -> &api::ListParams {
        &self.list_params
    }

    fn delete_params(&self) -> &api::DeleteParams {
        &self.delete_params
    }
}

impl Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, redacting the `client`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("delete_params", &self.delete_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}
