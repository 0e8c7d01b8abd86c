use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use node_recycler::RecycleConfig;
use node_recycler::RetryPolicy;
use node_recycler::config::DEFAULT_RECYCLABLE_LABEL;
use node_recycler::config::parse_duration;

/// Recycle the oldest preemptible node once it reaches a given age.
///
/// Every option can be set through the environment.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub(crate) struct Config {
    /// Service account key file used to delete Compute Engine instances
    #[arg(long, env = "GCE_CREDENTIALS")]
    pub(crate) credentials: PathBuf,

    /// Name of the pod running the recycler
    #[arg(long, env = "POD_NAME")]
    pub(crate) pod_name: String,

    /// Namespace of the pod running the recycler
    #[arg(long, env = "NAMESPACE")]
    pub(crate) namespace: String,

    /// Minimum node age before recycling, as a Go duration
    #[arg(long, env = "AGE_TO_KILL", default_value = "12h", value_parser = parse_duration)]
    pub(crate) age_to_kill: Duration,

    /// Pause between two checks, as a Go duration
    #[arg(long, env = "SLEEP_TIME", default_value = "10m", value_parser = parse_duration)]
    pub(crate) sleep_time: Duration,

    /// Label marking nodes that may be recycled
    #[arg(long, env = "RECYCLABLE_LABEL", default_value = DEFAULT_RECYCLABLE_LABEL)]
    pub(crate) recyclable_label: String,

    /// Attempts per control-plane call; 1 disables retries
    #[arg(long, env = "RETRY_MAX_ATTEMPTS", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) retry_max_attempts: u32,

    /// Wait after the first failed attempt, doubled after each further failure
    #[arg(long, env = "RETRY_BACKOFF", default_value = "1s", value_parser = parse_duration)]
    pub(crate) retry_backoff: Duration,

    /// Longest wait between two attempts
    #[arg(long, env = "RETRY_MAX_BACKOFF", default_value = "30s", value_parser = parse_duration)]
    pub(crate) retry_max_backoff: Duration,
}

impl Config {
    pub(crate) fn recycle_config(&self) -> RecycleConfig {
        RecycleConfig {
            age_threshold: self.age_to_kill,
            poll_interval: self.sleep_time,
        }
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.retry_max_attempts,
            self.retry_backoff,
            self.retry_max_backoff,
        )
    }
}
