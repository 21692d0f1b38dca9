use std::sync::Arc;

use anyhow::{Context, Result};
use finsite_core::offline::{
    CacheStorage, DiskCacheStorage, HttpNetwork, Manifest, Network, OfflineController, Request,
    Unreachable,
};
use finsite_core::Config;
use tracing::{debug, info};

use crate::cli::{CacheCommand, FetchArgs};

pub async fn run(config: &Config, command: CacheCommand) -> Result<()> {
    let cache_dir = config.cache_dir()?;
    debug!(?cache_dir, "Cache directory configured");
    let storage = Arc::new(DiskCacheStorage::new(cache_dir)?);

    match command {
        CacheCommand::Install => install(config, storage).await,
        CacheCommand::Fetch(args) => fetch(config, storage, &args).await,
        CacheCommand::List => list(config, &storage).await,
    }
}

fn network(config: &Config, offline: bool) -> Result<Arc<dyn Network>> {
    if offline {
        Ok(Arc::new(Unreachable))
    } else {
        Ok(Arc::new(HttpNetwork::new(config.request_timeout())?))
    }
}

fn controller(
    config: &Config,
    storage: Arc<DiskCacheStorage>,
    network: Arc<dyn Network>,
) -> Result<OfflineController> {
    Ok(OfflineController::new(
        storage,
        network,
        config.cache_names(),
        Manifest::default(),
        config.site_origin()?,
    ))
}

async fn install(config: &Config, storage: Arc<DiskCacheStorage>) -> Result<()> {
    let mut controller = controller(config, storage, network(config, false)?)?;

    let report = controller.install().await?;
    println!("Installed {} (static: {})", controller.names().primary, controller.names().static_assets);
    for entry in &report.cached {
        println!("  cached  {}", entry);
    }
    for (entry, reason) in &report.failed {
        println!("  skipped {} ({})", entry, reason);
    }

    let report = controller.activate().await?;
    for name in &report.deleted {
        println!("Deleted stale cache {}", name);
    }
    for (name, reason) in &report.failed {
        println!("Could not delete {} ({})", name, reason);
    }
    Ok(())
}

async fn fetch(config: &Config, storage: Arc<DiskCacheStorage>, args: &FetchArgs) -> Result<()> {
    let network = network(config, args.offline)?;
    let mut controller = controller(config, storage.clone(), network.clone())?;

    if controller.is_installed().await {
        controller = OfflineController::resume(
            storage,
            network,
            config.cache_names(),
            Manifest::default(),
            config.site_origin()?,
        );
    } else {
        info!("Cache version not installed yet, installing first");
        controller.install().await?;
        controller.activate().await?;
    }

    let request = Request::get(&args.url)?.with_destination(args.destination.into());
    let response = controller.fetch(&request).await?;

    println!("{} {}", response.status, response.status_text);
    if let Some(content_type) = response.header("content-type") {
        println!("content-type: {}", content_type);
    }
    println!("{} bytes", response.body.len());

    if let Some(ref path) = args.output {
        std::fs::write(path, &response.body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

async fn list(config: &Config, storage: &DiskCacheStorage) -> Result<()> {
    let names = config.cache_names();
    let namespaces = storage.namespace_names().await?;
    if namespaces.is_empty() {
        println!("No caches in {}", storage.root().display());
        return Ok(());
    }

    for namespace in namespaces {
        let marker = if names.contains(&namespace) { "" } else { " (stale)" };
        let entries = storage.list_entries(&namespace).await?;
        println!("{}{} - {} entries", namespace, marker, entries.len());
        for entry in entries {
            println!("  {} {:>8} B  {:<9} {}", entry.status, entry.size, entry.age, entry.key);
        }
    }
    Ok(())
}
