use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pod_registry::apply::apply_pods;
use pod_registry::config::{load_manifest, render_pods, Cli, Commands, ManifestArgs};
use pod_registry::logging;
use pod_registry::{MemoryStorage, PodRegistry};
use tokio_util::sync::CancellationToken;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    logging::init(cli.log_level);

    match cli.command {
        Commands::Apply(args) => run(args, false).await,
        Commands::Unassigned(args) => run(args, true).await,
    }
}

async fn run(args: ManifestArgs, unassigned_only: bool) -> Result<()> {
    let pods = load_manifest(&args.manifest)?;
    tracing::info!("loaded {} pods from {:?}", pods.len(), args.manifest);

    let registry = PodRegistry::new(Arc::new(MemoryStorage::new()));
    let ctx = CancellationToken::new();

    let outcome = apply_pods(&registry, &ctx, pods).await;

    let listed = if unassigned_only {
        registry.list_unassigned_pods(&ctx).await
    } else {
        registry.list_pods(&ctx).await
    }
    .map_err(|report| anyhow::anyhow!("failed to list pods: {report:?}"))?;

    println!("{}", render_pods(&listed, args.output)?);

    outcome.ensure_all_created()
}
