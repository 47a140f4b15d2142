pub mod bedrock;
pub mod dynamodb;
pub mod memory;
pub mod order_service;

use async_trait::async_trait;

use crate::error::{CompletionError, LookupError};
use crate::models::location::GeoPoint;
use crate::models::order::OrderRecord;

#[async_trait]
pub trait TelemetryLookup: Send + Sync {
    async fn latest_position(&self, order_id: &str) -> Result<Option<GeoPoint>, LookupError>;
}

#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn fetch_order(&self, order_id: &str) -> Result<Option<OrderRecord>, LookupError>;
}

#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}
