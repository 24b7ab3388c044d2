//! HTTP server for the visualization service.
//!
//! Endpoints:
//! - `POST /upload` - render one image per variable of an uploaded dataset
//! - `POST /upload-csv` - export per-variable CSVs plus the combined CSV
//! - `GET /health` - health check
//! - `GET /media/*` - static serving of stored uploads and artifacts

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use pipeline::{ColormapPolicy, DirectorySink, PipelineConfig};
use viz_common::{ArtifactHandle, VizError};

use crate::config::VizApiConfig;

/// Shared state for the HTTP server.
pub struct ServerState {
    pub sink: DirectorySink,
    pub policy: ColormapPolicy,
    pub media_root: PathBuf,
}

impl ServerState {
    pub fn new(config: &VizApiConfig) -> Self {
        Self {
            sink: DirectorySink::new(&config.media_root, &config.media_base_url),
            policy: ColormapPolicy::default(),
            media_root: config.media_root.clone(),
        }
    }
}

/// Response body for /upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub images: BTreeMap<String, ArtifactHandle>,
}

/// Response body for /upload-csv.
#[derive(Debug, Serialize)]
pub struct CsvResponse {
    pub individual_csvs: BTreeMap<String, ArtifactHandle>,
    pub combined_csv: Option<ArtifactHandle>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn viz_error_response(err: &VizError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, format!("Failed to process file: {}", err))
}

/// Persist the raw upload, parse it, and run the pipeline with the given
/// product configuration.
async fn process_upload(
    state: &ServerState,
    body: Bytes,
    config: PipelineConfig,
) -> Result<pipeline::PipelineOutput, axum::response::Response> {
    if body.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "No file uploaded"));
    }

    let upload_id = Uuid::new_v4();
    let upload_path = state.media_root.join(format!("{}.nc", upload_id));
    if let Some(parent) = upload_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!(error = %e, "Failed to create media root");
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to store upload: {}", e),
            ));
        }
    }
    if let Err(e) = tokio::fs::write(&upload_path, &body).await {
        error!(path = %upload_path.display(), error = %e, "Failed to persist upload");
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to store upload: {}", e),
        ));
    }

    info!(
        upload = %upload_id,
        bytes = body.len(),
        render_images = config.render_images,
        export_tables = config.export_tables,
        "Processing upload"
    );

    let dataset = cdf_parser::open_dataset(&body).map_err(|e| {
        error!(upload = %upload_id, error = %e, "Failed to open dataset");
        viz_error_response(&e)
    })?;

    pipeline::run(&dataset, &config, &state.policy, &state.sink).map_err(|e| {
        error!(upload = %upload_id, error = %e, "Pipeline run failed");
        viz_error_response(&e)
    })
}

/// POST /upload - render one image per variable.
async fn upload_handler(
    Extension(state): Extension<Arc<ServerState>>,
    body: Bytes,
) -> impl IntoResponse {
    match process_upload(&state, body, PipelineConfig::images()).await {
        Ok(output) => Json(UploadResponse {
            images: output.images,
        })
        .into_response(),
        Err(response) => response,
    }
}

/// POST /upload-csv - export per-variable CSVs and the combined CSV.
async fn upload_csv_handler(
    Extension(state): Extension<Arc<ServerState>>,
    body: Bytes,
) -> impl IntoResponse {
    match process_upload(&state, body, PipelineConfig::tables()).await {
        Ok(output) => Json(CsvResponse {
            individual_csvs: output.tables,
            combined_csv: output.combined_table,
        })
        .into_response(),
        Err(response) => response,
    }
}

/// GET /health - Health check
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "viz-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the HTTP router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let media = ServeDir::new(&state.media_root);
    Router::new()
        .route("/upload", post(upload_handler))
        .route("/upload-csv", post(upload_csv_handler))
        .route("/health", get(health_handler))
        .nest_service("/media", media)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<ServerState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(address = %addr, "Starting viz-api HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
