use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurpose, DecodePaddingMode, GeneralPurposeConfig},
    Engine,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::{engine::FisherEngine, error::AppError, types::FisherResponse};

pub type AppState = Arc<FisherEngine>;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

pub fn router(engine: AppState) -> Router {
    Router::new()
        .route("/fisher/:url", get(fisher_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn fisher_handler(
    State(engine): State<AppState>,
    Path(encoded): Path<String>,
) -> Result<Json<FisherResponse>, AppError> {
    let url = decode_url(&encoded)?;
    let span = info_span!("fisher", request_id = %Uuid::new_v4(), url = %url);
    let verdict = engine.score(&url).instrument(span).await?;
    Ok(Json(verdict.into()))
}

async fn health_handler() -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

// base64url with optional padding; the standard alphabet is accepted too
// since browsers' `btoa` produces it.
pub fn decode_url(encoded: &str) -> Result<String, AppError> {
    let bytes = URL_SAFE_LENIENT
        .decode(encoded)
        .or_else(|_| STANDARD_LENIENT.decode(encoded))
        .map_err(|e| AppError::Decode(e.to_string()))?;
    let url = String::from_utf8(bytes).map_err(|e| AppError::Decode(e.to_string()))?;
    if url.trim().is_empty() {
        return Err(AppError::Decode("empty URL".to_string()));
    }
    Ok(url)
}
