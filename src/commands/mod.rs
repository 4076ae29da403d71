use anyhow::Result;
use log::info;

use crate::{
    lifecycle::{create_repository, delete_repository},
    nexus::{DeleteOutcome, Registry},
    package::list_latest,
    runtime::Runtime,
    transfer::{MirrorReport, mirror},
};

pub mod config;
pub mod services;

use config::Config;
use services::build_registry;

/// Creates `config.dest` and fills it with the latest packages of `config.source`.
#[tracing::instrument(skip(runtime, config))]
pub async fn create<R: Runtime>(runtime: &R, config: &Config) -> Result<MirrorReport> {
    let registry = build_registry(config)?;
    run_create(&registry, runtime, config).await
}

#[tracing::instrument(skip(registry, runtime, config))]
pub async fn run_create<G: Registry + ?Sized, R: Runtime>(
    registry: &G,
    runtime: &R,
    config: &Config,
) -> Result<MirrorReport> {
    create_repository(registry, &config.dest).await?;

    let packages = list_latest(registry, &config.source).await?;
    for skipped in &packages.skipped {
        println!(
            "skipped asset without package metadata: {}",
            skipped.path.as_deref().unwrap_or(&skipped.download_url)
        );
    }

    let report = mirror(registry, runtime, &packages, &config.dest).await;
    info!(
        "{} -> {}: {} packages selected, {} uploaded",
        config.source,
        config.dest,
        packages.len(),
        report.uploaded()
    );
    Ok(report)
}

/// Deletes `config.dest` unless it is protected.
#[tracing::instrument(skip(config))]
pub async fn delete(config: &Config) -> Result<DeleteOutcome> {
    let registry = build_registry(config)?;
    run_delete(&registry, config).await
}

#[tracing::instrument(skip(registry, config))]
pub async fn run_delete<G: Registry + ?Sized>(registry: &G, config: &Config) -> Result<DeleteOutcome> {
    delete_repository(registry, &config.dest, &config.protected).await
}
