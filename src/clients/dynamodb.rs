use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use crate::clients::TelemetryLookup;
use crate::config::TelemetryConfig;
use crate::error::LookupError;
use crate::models::location::GeoPoint;

const PARTITION_KEY: &str = "orderId";
const LATITUDE_ATTR: &str = "currentLatitude";
const LONGITUDE_ATTR: &str = "currentLongitude";

pub struct DynamoTelemetry {
    client: Client,
    table_name: String,
}

impl DynamoTelemetry {
    pub async fn connect(config: &TelemetryConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(3))
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if config.use_local_endpoint {
            builder = builder
                .endpoint_url(config.endpoint_url.clone())
                .credentials_provider(Credentials::new("dummy", "dummy", None, None, "local"));
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.table_name.clone(),
        }
    }
}

#[async_trait]
impl TelemetryLookup for DynamoTelemetry {
    async fn latest_position(&self, order_id: &str) -> Result<Option<GeoPoint>, LookupError> {
        let response = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(format!("{PARTITION_KEY} = :id"))
            .expression_attribute_values(":id", AttributeValue::S(order_id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(|err| LookupError::Transport(format!("dynamodb query failed: {err}")))?;

        let Some(item) = response.items().first() else {
            debug!(order_id, "no telemetry items");
            return Ok(None);
        };

        position_from_item(item).map(Some)
    }
}

fn position_from_item(item: &HashMap<String, AttributeValue>) -> Result<GeoPoint, LookupError> {
    Ok(GeoPoint::new(
        number_attr(item, LATITUDE_ATTR)?,
        number_attr(item, LONGITUDE_ATTR)?,
    ))
}

fn number_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<f64, LookupError> {
    let raw = item
        .get(name)
        .ok_or_else(|| LookupError::Malformed(format!("missing attribute {name}")))?
        .as_n()
        .map_err(|_| LookupError::Malformed(format!("attribute {name} is not a number")))?;

    raw.parse::<f64>()
        .map_err(|err| LookupError::Malformed(format!("attribute {name}: {err}")))
}
