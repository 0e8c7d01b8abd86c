use std::fmt;
use std::path::Path;
use std::time::Duration;

use super::DEFAULT_COMPUTE_ENDPOINT;
use super::DEFAULT_REQUEST_TIMEOUT;
use super::GceError;
use super::Operation;
use super::ProviderId;
use super::ServiceAccount;
use super::ServiceAccountKey;
use super::TokenSource;

/// Client for the Compute Engine `instances` collection.
pub struct GceCompute {
    http: reqwest::Client,
    tokens: Box<dyn TokenSource>,
    endpoint: String,
}

impl GceCompute {
    /// Build a client that authenticates with `tokens`.
    ///
    /// Requests time out after [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn new(tokens: impl TokenSource + 'static) -> Result<Self, GceError> {
        Ok(Self {
            http: super::http_client(DEFAULT_REQUEST_TIMEOUT)?,
            tokens: Box::new(tokens),
            endpoint: DEFAULT_COMPUTE_ENDPOINT.to_string(),
        })
    }

    /// Build a client authenticated by the service account key stored at `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn run() -> Result<(), node_recycler_gce::GceError> {
    /// let compute = node_recycler_gce::GceCompute::from_key_file("/secrets/gce.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self, GceError> {
        let key = ServiceAccountKey::from_file(path)?;
        ServiceAccount::new(key).and_then(Self::new)
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, GceError> {
        let http = super::http_client(timeout)?;
        Ok(Self { http, ..self })
    }

    /// Point the client at another API root, such as a test server.
    pub fn with_endpoint(self, endpoint: impl ToString) -> Self {
        let endpoint = endpoint.to_string().trim_end_matches('/').to_string();
        Self { endpoint, ..self }
    }

    /// Issue `instances.delete` for the instance behind `id`.
    ///
    /// Returns as soon as Compute Engine accepts the request; the returned
    /// [`Operation`] tracks the deletion itself.
    pub async fn delete_instance(&self, id: &ProviderId) -> Result<Operation, GceError> {
        let url = self.instance_url(id);
        let token = self.tokens.token().await?;
        tracing::debug!(%url, "Deleting instance");
        let response = self.http.delete(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GceError::Status {
                context: "instances.delete",
                status,
                body,
            });
        }

        response.json().await.map_err(GceError::from)
    }

    fn instance_url(&self, id: &ProviderId) -> String {
        let ProviderId {
            project,
            zone,
            instance,
            ..
        } = id;
        format!(
            "{}/compute/v1/projects/{project}/zones/{zone}/instances/{instance}",
            self.endpoint
        )
    }
}

impl fmt::Debug for GceCompute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GceCompute")
            .field("endpoint", &self.endpoint)
            .field("tokens", &"<TokenSource>")
            .finish()
    }
}
