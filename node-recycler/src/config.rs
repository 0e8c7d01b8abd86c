use std::time::Duration;

/// Label marking preemptible GKE nodes, the default recyclable marker.
pub const DEFAULT_RECYCLABLE_LABEL: &str = "cloud.google.com/gke-preemptible";
pub const DEFAULT_AGE_THRESHOLD: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Timing of the control loop. Fixed once the loop is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecycleConfig {
    /// Nodes at least this old are recycled.
    pub age_threshold: Duration,
    /// Sleep between ticks.
    pub poll_interval: Duration,
}

impl Default for RecycleConfig {
    fn default() -> Self {
        Self {
            age_threshold: DEFAULT_AGE_THRESHOLD,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("negative duration {0:?}")]
    Negative(String),
}

/// Parse a Go style duration string such as `"12h"`, `"1h30m"` or `"90s"`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// let d = node_recycler::config::parse_duration("1h30m").unwrap();
/// assert_eq!(d, Duration::from_secs(5400));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, DurationError> {
    let nanos = go_parse_duration::parse_duration(text)
        .map_err(|_| DurationError::Invalid(text.to_string()))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| DurationError::Negative(text.to_string()))
}
