use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub log_json: bool,
    pub speed_model_path: PathBuf,
    pub telemetry: TelemetryConfig,
    pub order_service: OrderServiceConfig,
    pub completion: CompletionConfig,
    pub forecast_log: ForecastLogConfig,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub region: String,
    pub table_name: String,
    pub endpoint_url: String,
    // DynamoDB Local with static credentials instead of the AWS chain
    pub use_local_endpoint: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            table_name: "ecostream-telemetry-local".to_string(),
            endpoint_url: "http://localhost:9000".to_string(),
            use_local_endpoint: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_millis(5_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model_id: String,
    pub region: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model_id: "us.anthropic.claude-3-5-haiku-20241022-v1:0".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForecastLogConfig {
    // uploads are skipped when unset
    pub bucket: Option<String>,
    pub prefix: String,
}

impl Default for ForecastLogConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            prefix: "delivery-logs/forecasts".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let telemetry_defaults = TelemetryConfig::default();
        let order_defaults = OrderServiceConfig::default();
        let completion_defaults = CompletionConfig::default();
        let log_defaults = ForecastLogConfig::default();

        Ok(Self {
            http_port: parse_or_default("PORT", 5050)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_FORMAT").is_ok_and(|format| format == "json"),
            speed_model_path: env::var("SPEED_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/speed_table.json")),
            telemetry: TelemetryConfig {
                region: string_or_default("REGION", telemetry_defaults.region),
                table_name: string_or_default("DYNAMODB_TABLE_NAME", telemetry_defaults.table_name),
                endpoint_url: string_or_default("DYNAMODB_URL", telemetry_defaults.endpoint_url),
                use_local_endpoint: env::var("EXECUTION_ENV")
                    .map(|value| value != "lambda")
                    .unwrap_or(true),
            },
            order_service: OrderServiceConfig {
                base_url: string_or_default("ORDER_SERVICE_URL", order_defaults.base_url),
                timeout: Duration::from_millis(parse_or_default(
                    "ORDER_SERVICE_TIMEOUT_MS",
                    order_defaults.timeout.as_millis() as u64,
                )?),
            },
            completion: CompletionConfig {
                model_id: string_or_default("BEDROCK_MODEL_ID", completion_defaults.model_id),
                region: string_or_default("BEDROCK_REGION", completion_defaults.region),
            },
            forecast_log: ForecastLogConfig {
                bucket: env::var("S3_LOG_BUCKET")
                    .ok()
                    .filter(|bucket| !bucket.trim().is_empty()),
                prefix: string_or_default("S3_LOG_PREFIX", log_defaults.prefix),
            },
        })
    }
}

fn string_or_default(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
