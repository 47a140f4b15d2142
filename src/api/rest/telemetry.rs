use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;

use crate::error::AppError;
use crate::models::location::GeoPoint;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/test/telemetry/:order_id", get(latest_telemetry))
}

async fn latest_telemetry(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<Option<GeoPoint>>, AppError> {
    let position = state
        .telemetry
        .latest_position(&order_id)
        .await
        .map_err(|err| AppError::Upstream(format!("telemetry lookup failed: {err}")))?;

    Ok(Json(position))
}
