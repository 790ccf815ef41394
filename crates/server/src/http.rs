//! HTTP routes exposing load and search.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adloc_index::{LoadError, LoadReport, PlatformIndex};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::config::resolve_path;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub index: Arc<PlatformIndex>,
	pub content_root: Arc<PathBuf>,
}

impl AppState {
	pub fn new(index: Arc<PlatformIndex>, content_root: impl Into<PathBuf>) -> Self {
		Self {
			index,
			content_root: Arc::new(content_root.into()),
		}
	}
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/health", get(health))
		.route("/api/ads/load", post(load))
		.route("/api/ads/search", get(search))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoadParams {
	#[serde(rename = "filePath")]
	pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
	pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
	pub message: &'static str,
	pub path: String,
	pub generation: u64,
	pub locations: usize,
	pub accepted: usize,
	pub rejected: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub generation: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	path: Option<String>,
}

/// Request failures and their HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("Specify parameter {0}.")]
	MissingParam(&'static str),
	#[error(transparent)]
	Load(#[from] LoadError),
	#[error("load task failed: {0}")]
	Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = match &self {
			ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
			ApiError::Load(LoadError::SourceNotFound { .. }) => StatusCode::NOT_FOUND,
			ApiError::Load(_) => StatusCode::BAD_REQUEST,
			ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		let path = match &self {
			ApiError::Load(err @ LoadError::SourceNotFound { .. }) => {
				err.path().map(|p| p.display().to_string())
			}
			_ => None,
		};
		let body = ErrorBody {
			error: self.to_string(),
			path,
		};
		(status, Json(body)).into_response()
	}
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok",
		generation: state.index.generation(),
	})
}

async fn load(
	State(state): State<AppState>,
	Query(params): Query<LoadParams>,
) -> Result<Json<LoadResponse>, ApiError> {
	let raw = params
		.file_path
		.filter(|p| !p.trim().is_empty())
		.ok_or(ApiError::MissingParam("filePath"))?;
	let path = resolve_path(&state.content_root, Path::new(&raw));

	// Parsing blocks on file I/O; the snapshot is only published if it completes.
	let index = Arc::clone(&state.index);
	let task_path = path.clone();
	let report: LoadReport = tokio::task::spawn_blocking(move || index.load(&task_path))
		.await
		.inspect_err(|err| error!(path = %path.display(), error = %err, "load task failed"))??;

	Ok(Json(LoadResponse {
		message: "File loaded.",
		path: path.display().to_string(),
		generation: report.generation,
		locations: report.locations,
		accepted: report.accepted,
		rejected: report.rejected,
	}))
}

async fn search(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<Vec<String>>, ApiError> {
	let location = params
		.location
		.filter(|l| !l.trim().is_empty())
		.ok_or(ApiError::MissingParam("location"))?;
	Ok(Json(state.index.search(&location)))
}
