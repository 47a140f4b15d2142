pub mod forecast_log;
pub mod metrics;
