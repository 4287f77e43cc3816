//! Vizwalk catalog binary
//!
//! Drives the catalog from a terminal. Storage is chosen by flag:
//! `--data-file` acts as the host capability, `--store-dir` as the
//! browser-style key/value store; with neither, nothing is persisted.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vizwalk_catalog::{
    Catalog, CatalogConfig, DirectoryKeyValueStore, JsonFileHostStorage, PersistenceGateway,
    StorageCapabilities,
};

use crate::cli::Cli;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    let Some(path) = path else {
        return Ok(CatalogConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn capabilities(cli: &Cli) -> StorageCapabilities {
    let caps = StorageCapabilities::none();
    match (&cli.data_file, &cli.store_dir) {
        (Some(file), _) => caps.with_host(Arc::new(JsonFileHostStorage::new(file))),
        (None, Some(dir)) => caps.with_local(Arc::new(DirectoryKeyValueStore::new(dir))),
        (None, None) => caps,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(cli.config.as_deref())?;
    let gateway = PersistenceGateway::detect(capabilities(&cli), &config);
    let mut catalog = Catalog::open(config, gateway).await;
    tracing::debug!(records = catalog.len(), backend = ?catalog.backend(), "catalog opened");

    commands::run(&mut catalog, cli.command).await
}
