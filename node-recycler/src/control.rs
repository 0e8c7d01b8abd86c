use std::time::Duration;

use kube::ResourceExt as _;
use node_recycler_ext as k8s;

use k8s::NodeExt as _;
use k8s::TimeExt as _;
use k8s::metav1;

use super::Context;
use super::Error;
use super::RecycleConfig;
use super::RecycleReport;
use super::inventory;
use super::recycle;
use super::selector;

/// What a single tick did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Recycled(RecycleReport),
    TooYoung { node: String, age: Duration },
}

/// Periodically elects the oldest recyclable node and recycles it once it
/// reaches the age threshold. One tick at a time, one node per tick.
#[derive(Debug)]
pub struct ControlLoop {
    ctx: Context,
    config: RecycleConfig,
}

impl ControlLoop {
    pub fn new(ctx: Context, config: RecycleConfig) -> Self {
        Self { ctx, config }
    }

    pub fn config(&self) -> &RecycleConfig {
        &self.config
    }

    /// Evaluate the cluster as of `now`, recycling the elected node when it is
    /// at least `age_threshold` old.
    pub async fn tick(&self, now: &metav1::Time) -> Result<Tick, Error> {
        let candidates = inventory::recyclable_nodes(&self.ctx).await?;
        let node = selector::select_oldest(candidates)?;
        let name = node.name_any();
        let age = node
            .age_at(now)
            .ok_or_else(|| Error::MissingCreationTimestamp(name.clone()))?;

        if age >= self.config.age_threshold {
            tracing::info!(
                node = name,
                ?age,
                threshold = ?self.config.age_threshold,
                "Node is old enough to be recycled"
            );
            let report = recycle::recycle(&self.ctx, &node).await;
            Ok(Tick::Recycled(report))
        } else {
            tracing::info!(
                node = name,
                ?age,
                threshold = ?self.config.age_threshold,
                "Node age is lower than the minimum age to be recycled"
            );
            Ok(Tick::TooYoung { node: name, age })
        }
    }

    /// Tick until the recycler has to yield its own node, sleeping
    /// `poll_interval` after every tick.
    ///
    /// Returns the self eviction report; the caller should then exit
    /// successfully. Errors that only affect one tick are logged and the loop
    /// carries on; fatal errors are returned.
    pub async fn run(&self) -> Result<RecycleReport, Error> {
        loop {
            match self.tick(&metav1::Time::now()).await {
                Ok(Tick::Recycled(report)) if report.is_self_eviction() => return Ok(report),
                Ok(_) => {}
                Err(err) if err.is_fatal() => {
                    tracing::error!(%err, "Unable to get oldest node");
                    return Err(err);
                }
                Err(err) => tracing::error!(%err, "Recycle cycle abandoned"),
            }
            tracing::info!(interval = ?self.config.poll_interval, "Sleeping");
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
