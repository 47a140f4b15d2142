use std::sync::Arc;

use crate::clients::{OrderLookup, TelemetryLookup, TextCompletion};
use crate::engine::assistant::Assistant;
use crate::engine::eta::EtaCalculator;
use crate::engine::speed::SpeedPredictor;
use crate::observability::forecast_log::ForecastLog;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub telemetry: Arc<dyn TelemetryLookup>,
    pub eta: Arc<EtaCalculator>,
    pub assistant: Assistant,
    pub forecast_log: Arc<dyn ForecastLog>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        telemetry: Arc<dyn TelemetryLookup>,
        orders: Arc<dyn OrderLookup>,
        completion: Arc<dyn TextCompletion>,
        speed: SpeedPredictor,
        forecast_log: Arc<dyn ForecastLog>,
    ) -> Self {
        let eta = Arc::new(EtaCalculator::new(telemetry.clone(), speed));
        let assistant = Assistant::new(eta.clone(), orders, completion);

        Self {
            telemetry,
            eta,
            assistant,
            forecast_log,
            metrics: Metrics::new(),
        }
    }
}
