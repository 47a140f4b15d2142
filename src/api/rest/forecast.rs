use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::post;
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::AppError;
use crate::models::forecast::EtaResult;
use crate::models::location::GeoPoint;
use crate::models::priority::PriorityLabel;
use crate::observability::forecast_log::ForecastLogEntry;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/forecast/:order_id", post(forecast_eta))
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(alias = "destinationLatitude")]
    pub destination_latitude: f64,
    #[serde(alias = "destinationLongitude")]
    pub destination_longitude: f64,
    #[serde(default)]
    pub priority: Option<PriorityLabel>,
}

async fn forecast_eta(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    Json(payload): Json<ForecastRequest>,
) -> Result<Json<EtaResult>, AppError> {
    let destination =
        GeoPoint::validated(payload.destination_latitude, payload.destination_longitude)?;
    let priority = payload.priority.unwrap_or_default();

    let start = Instant::now();
    let outcome = state.eta.calculate(&order_id, &destination, priority).await;

    let label = match &outcome {
        Ok(Some(_)) => "ok",
        Ok(None) => "not_found",
        Err(_) => "error",
    };
    state
        .metrics
        .forecast_latency_seconds
        .with_label_values(&[label])
        .observe(start.elapsed().as_secs_f64());
    state.metrics.forecasts_total.with_label_values(&[label]).inc();

    match outcome {
        Ok(Some(eta)) => {
            spawn_forecast_log(state, &order_id, &eta, priority);
            Ok(Json(eta))
        }
        Ok(None) => Err(AppError::NotFound(format!(
            "No telemetry data found for order ID: {order_id}"
        ))),
        Err(err) => {
            error!(order_id = %order_id, error = %err, "telemetry lookup failed");
            Err(AppError::Upstream(format!("telemetry lookup failed: {err}")))
        }
    }
}

fn spawn_forecast_log(
    state: Arc<AppState>,
    order_id: &str,
    eta: &EtaResult,
    priority: PriorityLabel,
) {
    let entry = ForecastLogEntry::new(order_id, eta, priority, Utc::now());

    tokio::spawn(async move {
        match state.forecast_log.record(&entry).await {
            Ok(true) => state
                .metrics
                .forecast_log_uploads_total
                .with_label_values(&["ok"])
                .inc(),
            Ok(false) => {}
            Err(err) => {
                warn!(order_id = %entry.order_id, error = %err, "forecast log upload failed");
                state
                    .metrics
                    .forecast_log_uploads_total
                    .with_label_values(&["error"])
                    .inc();
            }
        }
    });
}
