use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::{Deserialize, Serialize};

use crate::engine::assistant::ChatQuery;
use crate::error::AppError;
use crate::models::location::GeoPoint;
use crate::models::priority::PriorityLabel;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/assistant/chat", post(assistant_chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "orderId")]
    pub order_id: String,
    pub message: String,
    #[serde(default, alias = "destinationLatitude")]
    pub destination_latitude: Option<f64>,
    #[serde(default, alias = "destinationLongitude")]
    pub destination_longitude: Option<f64>,
    #[serde(default)]
    pub priority: Option<PriorityLabel>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl ChatRequest {
    fn into_query(self) -> Result<ChatQuery, AppError> {
        if self.order_id.trim().is_empty() {
            return Err(AppError::Validation("order_id cannot be empty".to_string()));
        }

        if self.message.trim().is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }

        let destination = match (self.destination_latitude, self.destination_longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::validated(latitude, longitude)?),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "destination_latitude and destination_longitude must be sent together"
                        .to_string(),
                ));
            }
        };

        Ok(ChatQuery {
            order_id: self.order_id,
            message: self.message,
            destination,
            priority: self.priority,
        })
    }
}

async fn assistant_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let query = payload.into_query()?;
    let reply = state.assistant.respond(query).await;

    state
        .metrics
        .assistant_replies_total
        .with_label_values(&[reply.outcome.as_label()])
        .inc();

    Ok(Json(ChatResponse { reply: reply.text }))
}
