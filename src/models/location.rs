use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, AppError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(format!(
                "latitude must be between -90 and 90, got {latitude}"
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "longitude must be between -180 and 180, got {longitude}"
            )));
        }

        Ok(Self::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;
    use crate::error::AppError;

    #[test]
    fn bounds_are_inclusive() {
        assert!(GeoPoint::validated(90.0, 180.0).is_ok());
        assert!(GeoPoint::validated(-90.0, -180.0).is_ok());
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let err = GeoPoint::validated(90.0001, 0.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert!(GeoPoint::validated(0.0, -180.5).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(GeoPoint::validated(f64::NAN, 0.0).is_err());
    }
}
