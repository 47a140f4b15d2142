use std::sync::Arc;

use eta_forecast::api;
use eta_forecast::clients::bedrock::BedrockCompletion;
use eta_forecast::clients::dynamodb::DynamoTelemetry;
use eta_forecast::clients::order_service::HttpOrderLookup;
use eta_forecast::config::Config;
use eta_forecast::engine::speed::SpeedPredictor;
use eta_forecast::error::AppError;
use eta_forecast::observability::forecast_log;
use eta_forecast::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    init_tracing(&config);

    let telemetry = DynamoTelemetry::connect(&config.telemetry).await;
    let orders = HttpOrderLookup::new(&config.order_service)
        .map_err(|err| AppError::Internal(format!("failed to build order client: {err}")))?;
    let completion = BedrockCompletion::connect(&config.completion).await;
    let speed = SpeedPredictor::from_model_path(Some(config.speed_model_path.as_path()));
    let forecast_log = forecast_log::from_config(&config.forecast_log).await;

    let shared_state = Arc::new(AppState::new(
        Arc::new(telemetry),
        Arc::new(orders),
        Arc::new(completion),
        speed,
        forecast_log,
    ));

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        table = %config.telemetry.table_name,
        order_service = %config.order_service.base_url,
        model_id = %config.completion.model_id,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false);

    if config.log_json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
