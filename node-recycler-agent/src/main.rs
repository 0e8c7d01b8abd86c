use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser as _;
use node_recycler::Context;
use node_recycler::ControlLoop;
use node_recycler::RecycleReport;
use node_recycler::SelfIdentity;
use node_recycler_gce::GceCompute;
use node_recycler_kubeapi::KubeApi;
use tracing_subscriber::EnvFilter;

use config::Config;

mod config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting node-recycler");

    match run(Config::parse()).await {
        Ok(report) => {
            tracing::info!(node = report.node, "This is my node. Evicted myself. Bye!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "Quitting");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<RecycleReport, BoxError> {
    tracing::info!(
        age_to_kill = ?config.age_to_kill,
        sleep_time = ?config.sleep_time,
        label = config.recyclable_label,
        "Configuration loaded"
    );

    let compute = GceCompute::from_key_file(&config.credentials)?;

    if std::env::var_os("KUBERNETES_SERVICE_HOST").is_some() {
        tracing::info!("Running inside a Kubernetes cluster");
    } else {
        tracing::info!("Running outside a Kubernetes cluster");
    }
    let cluster = KubeApi::new().await?;

    let identity = SelfIdentity::resolve(&cluster, &config.pod_name, &config.namespace).await?;

    let ctx = Context::new(Arc::new(cluster), Arc::new(compute), identity)
        .recyclable_label(&config.recyclable_label)
        .retry(config.retry_policy());
    let control = ControlLoop::new(ctx, config.recycle_config());

    Ok(control.run().await?)
}

/// `RUST_LOG` first, then `LOG_LEVEL`, then `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
