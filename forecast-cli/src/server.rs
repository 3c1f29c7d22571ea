//! Web adapter: HTML page plus the `POST /get_weather` JSON endpoint.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use forecast_core::{
    CurrentConditions, DailyAggregate, ForecastError, ForecastService, WeatherReport,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ForecastService>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub city: Option<String>,
}

/// Body of every `/get_weather` response; `success` says which fields are set.
#[derive(Debug, Default, Serialize)]
pub struct WeatherResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentConditions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<DailyAggregate>>,
    /// PNG data URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WeatherResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn from_result(result: Result<WeatherReport, ForecastError>) -> Self {
        match result {
            Ok(report) => Self {
                success: true,
                current: Some(report.current),
                forecast: Some(report.forecast),
                chart: Some(report.chart.to_data_uri()),
                error: None,
            },
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// GET / - Lookup page
async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// POST /get_weather - Current conditions, daily forecast and chart for a city
async fn get_weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> (StatusCode, Json<WeatherResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "rejected weather request");
            return (
                rejection.status(),
                Json(WeatherResponse::failure(format!("Invalid request: {}", rejection.body_text()))),
            );
        }
    };

    let city = request.city.unwrap_or_default();
    let result = state.service.report(&city).await;
    if let Err(e) = &result {
        warn!(city = %city, error = %e, "weather lookup failed");
    }

    (StatusCode::OK, Json(WeatherResponse::from_result(result)))
}

/// Create the HTTP router
pub fn create_router(service: Arc<ForecastService>) -> Router {
    let state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/get_weather", post(get_weather))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("👋 Server stopped gracefully!");
}

pub async fn serve(service: ForecastService, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    info!("Serving weather forecasts on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(Arc::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}
