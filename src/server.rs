use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::budget::Budget;
use crate::config::Config;
use crate::recommend::ranking::build_recommendations;
use crate::recommend::RecommendationReport;
use crate::registry::{build_source, priced_items, ItemQuery, ItemSource, RegistryItem};
use crate::service::recommend_from_source;

#[derive(Clone)]
struct ApiState {
    config: Config,
    source: Arc<dyn ItemSource>,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct RecommendationRequest {
    friend_id: Option<String>,
    budget_amount: Option<f64>,
    currency: Option<String>,
    registry_id: Option<String>,
    /// Candidate items supplied by the caller instead of the configured source.
    items: Option<Vec<RegistryItem>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let source = build_source(&config)?;
    info!("registry items served from {} source", source.name());
    let app = router(config, source);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(config: Config, source: Arc<dyn ItemSource>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/api/budget/recommendations", post(recommendations))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ApiState { config, source })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<Config> {
    Json(state.config)
}

async fn recommendations(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<RecommendationRequest>, JsonRejection>,
) -> ApiResult<RecommendationReport> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let has_target = request.items.is_some() || request.friend_id.is_some();
    let Some(amount) = request.budget_amount.filter(|_| has_target) else {
        return Err(ApiError::bad_request(
            "friend ID and budget amount are required",
        ));
    };
    let currency = request
        .currency
        .as_deref()
        .unwrap_or(&state.config.budget.default_currency);
    let budget = Budget::new(amount, currency)
        .map_err(|_| ApiError::bad_request("budget amount must be greater than 0"))?;

    let report = match request.items {
        Some(items) => {
            let priced =
                priced_items(items).map_err(|err| ApiError::bad_request(err.to_string()))?;
            build_recommendations(&budget, priced)
        }
        None => {
            let query = ItemQuery {
                friend_id: request.friend_id,
                registry_id: request.registry_id,
            };
            recommend_from_source(state.source.as_ref(), &query, &budget)
                .await
                .map_err(|err| {
                    error!("recommendation request failed: {err:#}");
                    ApiError::internal("failed to fetch registry items")
                })?
        }
    };

    Ok(Json(report))
}
