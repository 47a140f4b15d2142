use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ForecastLogConfig;
use crate::error::ForecastLogError;
use crate::models::forecast::{EtaResult, round_to};
use crate::models::priority::PriorityLabel;

#[derive(Debug, Clone, Serialize)]
pub struct ForecastLogEntry {
    pub order_id: String,
    pub distance_km: f64,
    pub estimated_arrival_minutes: f64,
    pub priority: PriorityLabel,
    pub timestamp_utc: DateTime<Utc>,
}

impl ForecastLogEntry {
    pub fn new(
        order_id: &str,
        eta: &EtaResult,
        priority: PriorityLabel,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: order_id.to_string(),
            distance_km: round_to(eta.distance_km, 2),
            estimated_arrival_minutes: round_to(eta.estimated_arrival_minutes, 2),
            priority,
            timestamp_utc: at,
        }
    }

    pub fn object_key(&self, prefix: &str) -> String {
        format!(
            "{}/{}_{}.json",
            prefix.trim_end_matches('/'),
            self.order_id,
            self.timestamp_utc.format("%Y%m%dT%H%M%SZ")
        )
    }
}

#[async_trait]
pub trait ForecastLog: Send + Sync {
    async fn record(&self, entry: &ForecastLogEntry) -> Result<bool, ForecastLogError>;
}

pub struct DisabledForecastLog;

#[async_trait]
impl ForecastLog for DisabledForecastLog {
    async fn record(&self, _entry: &ForecastLogEntry) -> Result<bool, ForecastLogError> {
        debug!("forecast log bucket not configured; skipping upload");
        Ok(false)
    }
}

pub struct S3ForecastLog {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3ForecastLog {
    pub async fn connect(bucket: String, prefix: String) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        Self {
            client: Client::new(&sdk_config),
            bucket,
            prefix,
        }
    }
}

pub async fn from_config(config: &ForecastLogConfig) -> Arc<dyn ForecastLog> {
    match &config.bucket {
        Some(bucket) => {
            Arc::new(S3ForecastLog::connect(bucket.clone(), config.prefix.clone()).await)
        }
        None => Arc::new(DisabledForecastLog),
    }
}

#[async_trait]
impl ForecastLog for S3ForecastLog {
    async fn record(&self, entry: &ForecastLogEntry) -> Result<bool, ForecastLogError> {
        let body = serde_json::to_vec_pretty(entry)?;
        let key = entry.object_key(&self.prefix);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|err| ForecastLogError::Upload(err.to_string()))?;

        info!(bucket = %self.bucket, key = %key, "uploaded forecast log");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{DisabledForecastLog, ForecastLog, ForecastLogEntry};
    use crate::models::forecast::EtaResult;
    use crate::models::priority::PriorityLabel;

    fn entry() -> ForecastLogEntry {
        let at = Utc.with_ymd_and_hms(2024, 6, 10, 8, 5, 9).unwrap();
        let eta = EtaResult {
            distance_km: 12.5,
            estimated_arrival_minutes: 25.0,
        };
        ForecastLogEntry::new("order-7", &eta, PriorityLabel::Express, at)
    }

    #[test]
    fn key_uses_compact_utc_timestamp() {
        assert_eq!(
            entry().object_key("delivery-logs/forecasts/"),
            "delivery-logs/forecasts/order-7_20240610T080509Z.json"
        );
    }

    #[test]
    fn payload_carries_summary_fields() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["order_id"], "order-7");
        assert_eq!(json["distance_km"], 12.5);
        assert_eq!(json["estimated_arrival_minutes"], 25.0);
        assert_eq!(json["priority"], "Express");
        assert!(json["timestamp_utc"].as_str().unwrap().starts_with("2024-06-10T08:05:09"));
    }

    #[tokio::test]
    async fn disabled_log_is_a_no_op() {
        assert!(!DisabledForecastLog.record(&entry()).await.unwrap());
    }
}
