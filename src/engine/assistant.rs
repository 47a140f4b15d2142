use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::{OrderLookup, TextCompletion};
use crate::engine::eta::EtaCalculator;
use crate::error::CompletionError;
use crate::models::forecast::EtaResult;
use crate::models::location::GeoPoint;
use crate::models::priority::PriorityLabel;

pub const SYSTEM_IDENTITY: &str = "You are the EcoStream Logistics Assistant.";

pub const FALLBACK_REPLY: &str =
    "My satellite link is currently updating. Please check back in 2 minutes!";

pub const NO_DESTINATION_REPLY: &str = "This order has no destination on record yet. \
     Please provide a destination so I can estimate the arrival time.";

pub const NO_TELEMETRY_REPLY: &str = "I don't have live position data for this order yet. \
     Please ensure telemetry is being sent, then try again.";

pub fn order_not_found_reply(order_id: &str) -> String {
    format!("I couldn't find order {order_id}. Please check the order ID and try again.")
}

pub fn grounding_context(eta: &EtaResult) -> String {
    format!(
        "<context>Distance: {:.2}km, ETA: {:.1}min</context>",
        eta.distance_km, eta.estimated_arrival_minutes
    )
}

pub fn system_prompt(eta: &EtaResult) -> String {
    format!("{SYSTEM_IDENTITY}\n{}", grounding_context(eta))
}

#[derive(Debug, Clone)]
pub struct ChatQuery {
    pub order_id: String,
    pub message: String,
    pub destination: Option<GeoPoint>,
    pub priority: Option<PriorityLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    Answered,
    OrderNotFound,
    NoDestination,
    NoTelemetry,
    Fallback,
}

impl ChatOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            ChatOutcome::Answered => "answered",
            ChatOutcome::OrderNotFound => "order_not_found",
            ChatOutcome::NoDestination => "no_destination",
            ChatOutcome::NoTelemetry => "no_telemetry",
            ChatOutcome::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub outcome: ChatOutcome,
}

impl ChatReply {
    fn new(text: impl Into<String>, outcome: ChatOutcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }

    fn fallback() -> Self {
        Self::new(FALLBACK_REPLY, ChatOutcome::Fallback)
    }
}

pub struct Assistant {
    eta: Arc<EtaCalculator>,
    orders: Arc<dyn OrderLookup>,
    completion: Arc<dyn TextCompletion>,
}

impl Assistant {
    pub fn new(
        eta: Arc<EtaCalculator>,
        orders: Arc<dyn OrderLookup>,
        completion: Arc<dyn TextCompletion>,
    ) -> Self {
        Self {
            eta,
            orders,
            completion,
        }
    }

    pub async fn chat(&self, query: ChatQuery) -> String {
        self.respond(query).await.text
    }

    pub async fn respond(&self, query: ChatQuery) -> ChatReply {
        let (destination, priority) = match self.resolve_destination(&query).await {
            Ok(resolved) => resolved,
            Err(early_exit) => return early_exit,
        };

        let eta = match self
            .eta
            .calculate(&query.order_id, &destination, priority)
            .await
        {
            Ok(Some(eta)) => eta,
            Ok(None) => return ChatReply::new(NO_TELEMETRY_REPLY, ChatOutcome::NoTelemetry),
            Err(err) => {
                warn!(order_id = %query.order_id, error = %err, "telemetry lookup failed");
                return ChatReply::fallback();
            }
        };

        let prompt = system_prompt(&eta);
        debug!(order_id = %query.order_id, system_prompt = %prompt, "requesting completion");

        match self.completion.complete(&prompt, &query.message).await {
            Ok(reply) => ChatReply::new(reply, ChatOutcome::Answered),
            Err(CompletionError::AccessDenied) => {
                warn!(order_id = %query.order_id, "completion access denied; returning fallback");
                ChatReply::fallback()
            }
            Err(err) => {
                warn!(order_id = %query.order_id, error = %err, "completion failed; returning fallback");
                ChatReply::fallback()
            }
        }
    }

    async fn resolve_destination(
        &self,
        query: &ChatQuery,
    ) -> Result<(GeoPoint, PriorityLabel), ChatReply> {
        if let Some(destination) = query.destination {
            return Ok((destination, query.priority.unwrap_or_default()));
        }

        let record = match self.orders.fetch_order(&query.order_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Err(ChatReply::new(
                    order_not_found_reply(&query.order_id),
                    ChatOutcome::OrderNotFound,
                ));
            }
            Err(err) => {
                warn!(order_id = %query.order_id, error = %err, "order lookup failed");
                return Err(ChatReply::fallback());
            }
        };

        let priority = query.priority.unwrap_or_else(|| record.priority_label());

        match record.destination {
            Some(destination) => Ok((destination, priority)),
            None => Err(ChatReply::new(
                NO_DESTINATION_REPLY,
                ChatOutcome::NoDestination,
            )),
        }
    }
}
