use serde::Deserialize;
use serde::Serialize;

/// Handle of an asynchronous Compute Engine operation.
///
/// Only the fields the recycler logs are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub operation_type: Option<String>,
    pub status: Option<String>,
    pub target_link: Option<String>,
    pub zone: Option<String>,
}
