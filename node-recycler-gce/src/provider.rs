use std::fmt;
use std::str::FromStr;

/// Cloud identity of a node, as found in `spec.providerID`.
///
/// The expected shape is `gce://<project>/<zone>/<instance>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderId {
    pub scheme: String,
    pub project: String,
    pub zone: String,
    pub instance: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed provider id {0:?}, expected <scheme>://<project>/<zone>/<instance>")]
pub struct ProviderIdError(pub String);

impl FromStr for ProviderId {
    type Err = ProviderIdError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || ProviderIdError(text.to_string());
        let (scheme, path) = text.split_once("://").ok_or_else(malformed)?;
        let mut segments = path.split('/');
        let (Some(project), Some(zone), Some(instance), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(malformed());
        };

        if [scheme, project, zone, instance].iter().any(|s| s.is_empty()) {
            return Err(malformed());
        }

        Ok(Self {
            scheme: scheme.to_string(),
            project: project.to_string(),
            zone: zone.to_string(),
            instance: instance.to_string(),
        })
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            scheme,
            project,
            zone,
            instance,
        } = self;
        write!(f, "{scheme}://{project}/{zone}/{instance}")
    }
}
