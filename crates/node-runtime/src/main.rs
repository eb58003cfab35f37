//! # Multi-Chain Node Runtime
//!
//! Entry point: configuration, tracing, storage, application, console.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mc_05_dispatch::build_application;
use node_runtime::{console, open_store, RuntimeConfig};

fn init_tracing(config: &RuntimeConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log filter {:?}", config.log_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env()?;
    init_tracing(&config)?;
    config.validate()?;

    info!(
        app = %config.app,
        chain_id = %config.chain_id,
        storage = ?config.storage,
        "starting multi-chain node"
    );

    let store = open_store(&config)?;
    let mut app = build_application(config.app, store.clone(), &config.dispatch_config()?);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = console::run(app.as_mut(), stdin.lock(), stdout.lock());

    store.close().context("failed to close storage")?;
    info!("shutdown complete");
    result
}
