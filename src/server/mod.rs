//! HTTP boundary: `POST /get_transcript`.
//!
//! Every request is handled start to finish on its own; [`AppState`] only
//! holds the fetcher, built once at startup.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::extractors::{require_video_id, TranscriptFetcher};
use crate::TranscriptError;

/// Request body of `POST /get_transcript`
#[derive(Debug, Default, Deserialize)]
pub struct TranscriptRequest {
    pub youtube_url: Option<String>,
}

/// Success body of `POST /get_transcript`
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub message: String,
    pub transcript: String,
}

#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<dyn TranscriptFetcher>,
}

impl AppState {
    pub fn new(fetcher: impl TranscriptFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<TranscriptError> for ApiError {
    fn from(err: TranscriptError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Build the router for the transcript API
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get_transcript", post(get_transcript))
        .with_state(state)
}

async fn get_transcript(
    State(state): State<AppState>,
    payload: Result<Json<TranscriptRequest>, JsonRejection>,
) -> ApiResult<Json<TranscriptResponse>> {
    // A body we cannot read carries no URL.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            TranscriptRequest::default()
        }
    };

    let video_id = require_video_id(request.youtube_url.as_deref()).map_err(|err| {
        tracing::info!("Bad transcript request: {}", err);
        ApiError::from(err)
    })?;
    let url = request.youtube_url.unwrap_or_default();

    tracing::info!("Fetching transcript for video {}", video_id);

    match state.fetcher.fetch_transcript(&url).await {
        Ok(transcript) => {
            tracing::info!("Transcript for video {} retrieved", video_id);
            Ok(Json(TranscriptResponse {
                message: "Transcript retrieved".to_string(),
                transcript,
            }))
        }
        Err(err) => {
            tracing::error!("Transcript for video {} failed: {}", video_id, err);
            Err(err.into())
        }
    }
}

/// Bind `addr` and serve until Ctrl+C
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;

    tracing::info!("Transcript API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running transcript API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
    tracing::info!("Shutting down");
}
