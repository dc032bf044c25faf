//! HTTP server for the dialect narration service.
//!
//! This module provides the axum router that exposes:
//! - `POST /api/convert` for dialect translation plus narration
//! - `GET /api/dialects` for listing the supported dialects
//! - `GET /` for the browser form
//! - `GET /audio/{file}` for file-delivered audio

use crate::dialect::{DialectInfo, list_dialects};
use crate::handler::{AudioOutput, ConvertHandler, ConvertParams, ConvertResult};
use crate::provider::AUDIO_MIME_TYPE;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use saturi_common::config::{Config, RuntimeMode};
use saturi_common::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Message returned for every non-validation failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "변환 중 오류가 발생했습니다.";

/// Message returned when a stored audio file does not exist.
pub const AUDIO_NOT_FOUND_MESSAGE: &str = "오디오 파일을 찾을 수 없습니다.";

const INDEX_HTML: &str = include_str!("../static/index.html");

/// HTTP server state for dialect conversion.
#[derive(Clone)]
pub struct ConvertServer {
    /// Handler for conversion operations
    handler: Arc<ConvertHandler>,
    /// Controls whether error details reach clients
    runtime_mode: RuntimeMode,
}

/// Successful conversion response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Always `true`
    pub success: bool,
    /// The narrated text
    pub converted_text: String,
    /// `data:audio/mpeg;base64,...` for inline delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<String>,
    /// `/audio/<file>` for file delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl From<ConvertResult> for ConvertResponse {
    fn from(result: ConvertResult) -> Self {
        let (audio_data, audio_url) = match result.audio {
            AudioOutput::Inline(audio) => (Some(audio.data_uri()), None),
            AudioOutput::Stored(stored) => (None, Some(stored.url)),
        };
        Self {
            success: true,
            converted_text: result.converted_text,
            audio_data,
            audio_url,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// User-facing message
    pub error: String,
    /// Raw error text, outside production only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    runtime_mode: RuntimeMode,
}

impl ApiError {
    /// Wrap an error for the given runtime mode.
    pub fn new(error: Error, runtime_mode: RuntimeMode) -> Self {
        Self {
            error,
            runtime_mode,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self.error.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client.
    pub fn body(&self) -> ErrorResponse {
        match &self.error {
            Error::Validation(message) => ErrorResponse {
                error: message.clone(),
                details: None,
            },
            other => ErrorResponse {
                error: GENERIC_FAILURE_MESSAGE.to_string(),
                details: self
                    .runtime_mode
                    .exposes_details()
                    .then(|| other.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.error.kind();
        match kind {
            ErrorKind::InvalidInput => warn!(kind = %kind, error = %self.error, "Rejected request"),
            _ => error!(kind = %kind, error = %self.error, "Request failed"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl ConvertServer {
    /// Create a new ConvertServer with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_handler(ConvertHandler::new(config), config.runtime_mode)
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: ConvertHandler, runtime_mode: RuntimeMode) -> Self {
        Self {
            handler: Arc::new(handler),
            runtime_mode,
        }
    }

    /// Build the axum router.
    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/api/convert", post(convert))
            .route("/api/dialects", get(dialects))
            .route("/audio/{file}", get(audio))
            .with_state(self)
    }

    fn fail(&self, error: Error) -> ApiError {
        ApiError::new(error, self.runtime_mode)
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn dialects() -> Json<Vec<DialectInfo>> {
    Json(list_dialects())
}

async fn convert(
    State(server): State<ConvertServer>,
    body: Bytes,
) -> Result<Json<ConvertResponse>, ApiError> {
    let params: ConvertParams = serde_json::from_slice(&body)
        .map_err(|e| server.fail(Error::internal(format!("Invalid request body: {}", e))))?;

    let result = server
        .handler
        .convert(params)
        .await
        .map_err(|e| server.fail(e))?;

    info!(converted_len = result.converted_text.chars().count(), "Conversion completed");
    Ok(Json(result.into()))
}

async fn audio(
    State(server): State<ConvertServer>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    match server.handler.store().read(&file).await {
        Ok(Some(bytes)) => Ok(([(header::CONTENT_TYPE, AUDIO_MIME_TYPE)], bytes).into_response()),
        Ok(None) => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: AUDIO_NOT_FOUND_MESSAGE.to_string(),
                details: None,
            }),
        )
            .into_response()),
        Err(e) => Err(server.fail(e)),
    }
}
