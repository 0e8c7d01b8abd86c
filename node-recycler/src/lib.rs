//! Rotates the oldest recyclable node out of a cluster: cordon, drain,
//! delete the Node object and terminate the backing instance, yielding
//! instead when the node hosts the recycler itself.

pub use api::ApiError;
pub use api::ClusterApi;
pub use api::ComputeApi;
pub use config::RecycleConfig;
pub use context::Context;
pub use context::SelfIdentity;
pub use control::ControlLoop;
pub use control::Tick;
pub use error::Error;
pub use evictor::DrainReport;
pub use evictor::Eviction;
pub use evictor::PodRef;
pub use outcome::StepOutcome;
pub use recycle::Disposition;
pub use recycle::RecycleReport;
pub use recycle::RecycleState;
pub use retry::RetryPolicy;
pub use terminator::Termination;

pub mod config;
pub mod evictor;
pub mod inventory;
pub mod mutator;
pub mod recycle;
pub mod selector;
pub mod terminator;

mod api;
mod context;
mod control;
mod error;
mod outcome;
mod retry;

#[cfg(test)]
mod fake;
