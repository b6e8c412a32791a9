use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::geocode::{extract_fields, AddressFields, AddressInput, GeoCoordinate, MapView, ResolutionResult};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

pub async fn health() -> &'static str {
    "ok"
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ResolveQuery {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub label: Option<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub result: ResolutionResult,
    pub map: Option<MapView>,
}

fn input_from_query(params: &ResolveQuery) -> Result<AddressInput, ApiError> {
    let coordinate = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Some(GeoCoordinate::new(lat, lon)),
        (None, None) => None,
        _ => {
            return Err(api_error(StatusCode::BAD_REQUEST, "Provide both 'lat' and 'lon', or neither"));
        }
    };
    Ok(AddressInput::from_parts(params.address.as_deref(), coordinate))
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let start = Instant::now();
    let input = input_from_query(&params)?;

    let worker_state = Arc::clone(&state);
    let worker_input = input.clone();
    let result = tokio::task::spawn_blocking(move || worker_state.resolver.resolve(&worker_input))
        .await
        .unwrap_or_else(|e| {
            log::error!("resolution task failed: {}", e);
            state.resolver.failed()
        });

    let label = params
        .label
        .as_deref()
        .or(params.address.as_deref())
        .unwrap_or_default();
    let map = MapView::from_result(&result, label, state.resolver.config().zoom);

    log::info!(
        "GET /api/resolve {:?} -> {} ({:.1}ms)",
        input,
        result.display_line(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(ResolveResponse { result, map }))
}

// ─── GET /api/extract ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ExtractQuery {
    pub address: Option<String>,
}

pub async fn extract(Query(params): Query<ExtractQuery>) -> Result<Json<AddressFields>, ApiError> {
    let address = params.address.as_deref().unwrap_or("").trim();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter"));
    }
    Ok(Json(extract_fields(address)))
}
