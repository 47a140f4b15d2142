use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::clients::{OrderLookup, TelemetryLookup, TextCompletion};
use crate::error::{CompletionError, LookupError};
use crate::models::location::GeoPoint;
use crate::models::order::OrderRecord;

#[derive(Clone, Copy)]
struct Sample {
    timestamp_ms: i64,
    position: GeoPoint,
}

#[derive(Default)]
pub struct InMemoryTelemetry {
    latest: DashMap<String, Sample>,
}

impl InMemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, order_id: &str, timestamp_ms: i64, position: GeoPoint) {
        let sample = Sample {
            timestamp_ms,
            position,
        };

        self.latest
            .entry(order_id.to_string())
            .and_modify(|current| {
                if sample.timestamp_ms >= current.timestamp_ms {
                    *current = sample;
                }
            })
            .or_insert(sample);
    }
}

#[async_trait]
impl TelemetryLookup for InMemoryTelemetry {
    async fn latest_position(&self, order_id: &str) -> Result<Option<GeoPoint>, LookupError> {
        Ok(self.latest.get(order_id).map(|entry| entry.position))
    }
}

pub struct UnavailableTelemetry;

#[async_trait]
impl TelemetryLookup for UnavailableTelemetry {
    async fn latest_position(&self, _order_id: &str) -> Result<Option<GeoPoint>, LookupError> {
        Err(LookupError::Transport("telemetry store unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryOrders {
    orders: DashMap<String, OrderRecord>,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order_id: &str, record: OrderRecord) {
        self.orders.insert(order_id.to_string(), record);
    }
}

#[async_trait]
impl OrderLookup for InMemoryOrders {
    async fn fetch_order(&self, order_id: &str) -> Result<Option<OrderRecord>, LookupError> {
        Ok(self.orders.get(order_id).map(|entry| entry.value().clone()))
    }
}

pub struct ScriptedCompletion {
    outcome: Outcome,
    calls: Mutex<Vec<(String, String)>>,
}

enum Outcome {
    Reply(String),
    AccessDenied,
    Failure(String),
}

impl ScriptedCompletion {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Reply(reply.into()))
    }

    pub fn access_denied() -> Self {
        Self::with_outcome(Outcome::AccessDenied)
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Failure(reason.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((system_prompt.to_string(), user_message.to_string()));
        }

        match &self.outcome {
            Outcome::Reply(reply) => Ok(reply.clone()),
            Outcome::AccessDenied => Err(CompletionError::AccessDenied),
            Outcome::Failure(reason) => Err(CompletionError::Failed(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryTelemetry;
    use crate::clients::TelemetryLookup;
    use crate::models::location::GeoPoint;

    #[tokio::test]
    async fn keeps_newest_sample_regardless_of_arrival_order() {
        let telemetry = InMemoryTelemetry::new();
        telemetry.record("order-1", 200, GeoPoint::new(49.0, -123.0));
        telemetry.record("order-1", 100, GeoPoint::new(10.0, 10.0));

        let latest = telemetry.latest_position("order-1").await.unwrap();
        assert_eq!(latest, Some(GeoPoint::new(49.0, -123.0)));
    }

    #[tokio::test]
    async fn unknown_order_has_no_position() {
        let telemetry = InMemoryTelemetry::new();
        assert_eq!(telemetry.latest_position("missing").await.unwrap(), None);
    }
}
