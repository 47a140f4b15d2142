use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::TelemetryLookup;
use crate::engine::speed::SpeedPredictor;
use crate::error::LookupError;
use crate::geo::haversine_km;
use crate::models::forecast::EtaResult;
use crate::models::location::GeoPoint;
use crate::models::priority::PriorityLabel;

const MINUTES_PER_HOUR: f64 = 60.0;

pub fn eta_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    (distance_km / speed_kmh) * MINUTES_PER_HOUR
}

pub struct EtaCalculator {
    telemetry: Arc<dyn TelemetryLookup>,
    speed: SpeedPredictor,
}

impl EtaCalculator {
    pub fn new(telemetry: Arc<dyn TelemetryLookup>, speed: SpeedPredictor) -> Self {
        Self { telemetry, speed }
    }

    pub fn speed(&self) -> &SpeedPredictor {
        &self.speed
    }

    pub async fn calculate(
        &self,
        order_id: &str,
        destination: &GeoPoint,
        priority: PriorityLabel,
    ) -> Result<Option<EtaResult>, LookupError> {
        let Some(current) = self.telemetry.latest_position(order_id).await? else {
            warn!(order_id, "no telemetry found for order");
            return Ok(None);
        };

        let distance_km = haversine_km(&current, destination);
        let speed_kmh = self.speed.predict_kmh(priority);
        let minutes = eta_minutes(distance_km, speed_kmh);

        info!(
            order_id,
            distance_km,
            minutes,
            priority = %priority,
            speed_kmh,
            "eta calculated"
        );

        Ok(Some(EtaResult::rounded(distance_km, minutes)))
    }
}
