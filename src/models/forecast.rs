use serde::{Deserialize, Serialize};

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EtaResult {
    pub distance_km: f64,
    pub estimated_arrival_minutes: f64,
}

impl EtaResult {
    pub fn rounded(distance_km: f64, estimated_arrival_minutes: f64) -> Self {
        Self {
            distance_km: round_to(distance_km, 2),
            estimated_arrival_minutes: round_to(estimated_arrival_minutes, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EtaResult, round_to};

    #[test]
    fn ties_round_away_from_zero() {
        // 0.125 and 2.25 are exact in binary, so these are true ties.
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(2.25, 1), 2.3);
        assert_eq!(round_to(-0.125, 2), -0.13);
    }

    #[test]
    fn rounded_applies_separate_precisions() {
        let result = EtaResult::rounded(13.716_421, 27.432_842);
        assert_eq!(result.distance_km, 13.72);
        assert_eq!(result.estimated_arrival_minutes, 27.4);
    }
}
