#![cfg_attr(test, allow(unused_crate_dependencies))]
//! HTTP host for the location index.
//!
//! Exposes `POST /api/ads/load?filePath=...` and `GET /api/ads/search?location=...`
//! over a single shared [`PlatformIndex`]. Relative load paths are resolved against
//! the configured content root before they reach the index.

pub mod config;
pub mod http;

use std::sync::Arc;

use adloc_index::PlatformIndex;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[allow(unused_imports, reason = "used only by the adloc binary")]
use {anyhow as _, clap as _, tracing_subscriber as _};

pub use config::{ConfigError, ServerConfig};
pub use http::{ApiError, AppState, router};

/// Serves `index` on `listener` until `shutdown` is cancelled.
pub async fn serve(
	listener: TcpListener,
	index: Arc<PlatformIndex>,
	config: &ServerConfig,
	shutdown: CancellationToken,
) -> std::io::Result<()> {
	let app = router(AppState::new(index, config.content_root.clone()));

	let addr = listener.local_addr()?;
	info!(%addr, root = %config.content_root.display(), "listening");
	axum::serve(listener, app)
		.with_graceful_shutdown(async move { shutdown.cancelled().await })
		.await
}
