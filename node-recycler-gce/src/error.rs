use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GceError {
    #[error("unable to read credentials file {path:?}: {source}")]
    Credentials { path: PathBuf, source: io::Error },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to sign token request: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context} returned {status}: {body}")]
    Status {
        context: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}
