use super::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("control plane unavailable: {0}")]
    ControlPlaneUnavailable(#[source] ApiError),

    #[error("no recyclable nodes found")]
    NoCandidates,

    #[error("unable to resolve the node running pod {namespace}/{pod}: {reason}")]
    SelfIdentityUnresolved {
        pod: String,
        namespace: String,
        reason: String,
    },

    #[error("node {0} has no creation timestamp")]
    MissingCreationTimestamp(String),
}

impl Error {
    /// Fatal errors end the control loop; the rest only abandon the current cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoCandidates | Self::SelfIdentityUnresolved { .. })
    }
}
