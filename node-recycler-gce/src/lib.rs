//! Compute Engine side of node recycling: decoding the provider id a node
//! carries, authenticating with a service account and deleting instances.

pub use auth::ServiceAccount;
pub use auth::ServiceAccountKey;
pub use auth::StaticToken;
pub use auth::TokenSource;
pub use compute::GceCompute;
pub use error::GceError;
pub use operation::Operation;
pub use provider::ProviderId;
pub use provider::ProviderIdError;

use std::time::Duration;

mod auth;
mod compute;
mod error;
mod operation;
mod provider;

/// OAuth2 scope granting read/write access to Compute Engine.
pub const COMPUTE_SCOPE: &str = "https://www.googleapis.com/auth/compute";

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com";

/// Upper bound on a single request to the token or compute endpoints.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client(timeout: Duration) -> Result<reqwest::Client, GceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(GceError::from)
}
