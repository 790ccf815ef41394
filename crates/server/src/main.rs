#![cfg_attr(test, allow(unused_crate_dependencies))]
//! adloc server binary.
//!
//! Loads the optional startup index file, then serves load and search requests
//! until interrupted.

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use adloc_index::PlatformIndex;
use adloc_server::ServerConfig;
use anyhow::Context;
use clap::Parser;
use cli::Cli;
use tokio_util::sync::CancellationToken;
use tracing::info;
#[allow(unused_imports, reason = "used by the adloc_server library")]
use {axum as _, serde as _, thiserror as _, toml as _, tower_http as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let base = match &cli.config {
		Some(path) => ServerConfig::from_file(path)?,
		None => ServerConfig::default(),
	};
	let cwd = std::env::current_dir().context("failed to read working directory")?;
	let config = cli.apply(base).anchored(&cwd);

	let index = Arc::new(PlatformIndex::new());

	if let Some(file) = &config.index_file {
		let path = config.resolve(file);
		let startup = Arc::clone(&index);
		let report = tokio::task::spawn_blocking(move || startup.load(&path))
			.await
			.context("startup load task failed")?
			.context("failed to load startup index")?;
		info!(generation = report.generation, locations = report.locations, "startup index loaded");
	}

	let listener = tokio::net::TcpListener::bind(config.bind)
		.await
		.with_context(|| format!("failed to bind {}", config.bind))?;

	let shutdown = CancellationToken::new();
	let signal = shutdown.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			info!("shutdown requested");
			signal.cancel();
		}
	});

	adloc_server::serve(listener, index, &config, shutdown).await?;
	info!("server stopped");
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("adloc=debug,adloc_server=debug,adloc_index=debug,tower_http=debug")
			} else {
				EnvFilter::new("adloc=info,adloc_server=info,adloc_index=info,tower_http=info")
			}
		})
	};

	if let Some(log_dir) = std::env::var("ADLOC_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("adloc.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry()
				.with(filter())
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt().with_env_filter(filter()).init();
}
