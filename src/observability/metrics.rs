use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub forecasts_total: IntCounterVec,
    pub forecast_latency_seconds: HistogramVec,
    pub assistant_replies_total: IntCounterVec,
    pub forecast_log_uploads_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let forecasts_total = IntCounterVec::new(
            Opts::new("forecasts_total", "Total forecast requests by outcome"),
            &["outcome"],
        )
        .expect("valid forecasts_total metric");

        let forecast_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "forecast_latency_seconds",
                "Latency of forecast computation in seconds",
            ),
            &["outcome"],
        )
        .expect("valid forecast_latency_seconds metric");

        let assistant_replies_total = IntCounterVec::new(
            Opts::new("assistant_replies_total", "Assistant replies by outcome"),
            &["outcome"],
        )
        .expect("valid assistant_replies_total metric");

        let forecast_log_uploads_total = IntCounterVec::new(
            Opts::new(
                "forecast_log_uploads_total",
                "Forecast log uploads to object storage by outcome",
            ),
            &["outcome"],
        )
        .expect("valid forecast_log_uploads_total metric");

        registry
            .register(Box::new(forecasts_total.clone()))
            .expect("register forecasts_total");
        registry
            .register(Box::new(forecast_latency_seconds.clone()))
            .expect("register forecast_latency_seconds");
        registry
            .register(Box::new(assistant_replies_total.clone()))
            .expect("register assistant_replies_total");
        registry
            .register(Box::new(forecast_log_uploads_total.clone()))
            .expect("register forecast_log_uploads_total");

        Self {
            registry,
            forecasts_total,
            forecast_latency_seconds,
            assistant_replies_total,
            forecast_log_uploads_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
