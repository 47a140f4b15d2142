use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::clients::OrderLookup;
use crate::config::OrderServiceConfig;
use crate::error::LookupError;
use crate::models::order::OrderRecord;

pub struct HttpOrderLookup {
    client: Client,
    base_url: String,
}

impl HttpOrderLookup {
    pub fn new(config: &OrderServiceConfig) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn order_url(&self, order_id: &str) -> String {
        format!("{}/api/orders/{}", self.base_url, order_id)
    }
}

#[async_trait]
impl OrderLookup for HttpOrderLookup {
    async fn fetch_order(&self, order_id: &str) -> Result<Option<OrderRecord>, LookupError> {
        let response = self.client.get(self.order_url(order_id)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(order_id, "order service has no such order");
                Ok(None)
            }
            status if status.is_success() => {
                let record = response
                    .json::<OrderRecord>()
                    .await
                    .map_err(|err| LookupError::Malformed(err.to_string()))?;
                Ok(Some(record))
            }
            status => Err(LookupError::Status(status.as_u16())),
        }
    }
}
