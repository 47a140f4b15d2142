use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::EstimatorError;
use crate::models::priority::PriorityLabel;

pub trait SpeedEstimator: Send + Sync {
    fn estimate(&self, label: PriorityLabel) -> Result<f64, EstimatorError>;
}

#[derive(Debug, Clone)]
pub struct LookupTableEstimator {
    speeds: HashMap<String, f64>,
}

impl LookupTableEstimator {
    pub fn new(speeds: HashMap<String, f64>) -> Self {
        Self { speeds }
    }

    pub fn load(path: &Path) -> Result<Self, EstimatorError> {
        let load_error = |reason: String| EstimatorError::Load {
            path: path.display().to_string(),
            reason,
        };

        let raw = fs::read_to_string(path).map_err(|err| load_error(err.to_string()))?;
        let speeds: HashMap<String, f64> =
            serde_json::from_str(&raw).map_err(|err| load_error(err.to_string()))?;

        Ok(Self::new(speeds))
    }
}

impl SpeedEstimator for LookupTableEstimator {
    fn estimate(&self, label: PriorityLabel) -> Result<f64, EstimatorError> {
        self.speeds
            .get(label.as_str())
            .copied()
            .ok_or_else(|| EstimatorError::UnknownLabel(label.to_string()))
    }
}

#[derive(Clone, Default)]
pub struct SpeedPredictor {
    estimator: Option<Arc<dyn SpeedEstimator>>,
}

impl SpeedPredictor {
    pub fn baseline() -> Self {
        Self { estimator: None }
    }

    pub fn with_estimator(estimator: Arc<dyn SpeedEstimator>) -> Self {
        Self {
            estimator: Some(estimator),
        }
    }

    pub fn from_model_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::baseline();
        };

        match LookupTableEstimator::load(path) {
            Ok(table) => {
                info!(path = %path.display(), "speed model loaded");
                Self::with_estimator(Arc::new(table))
            }
            Err(err) => {
                warn!(error = %err, "speed model unavailable; using baseline speeds");
                Self::baseline()
            }
        }
    }

    pub fn has_estimator(&self) -> bool {
        self.estimator.is_some()
    }

    pub fn predict_kmh(&self, label: PriorityLabel) -> f64 {
        let Some(estimator) = &self.estimator else {
            return label.baseline_speed_kmh();
        };

        match estimator.estimate(label) {
            Ok(speed) if speed.is_finite() && speed > 0.0 => speed,
            Ok(speed) => {
                warn!(priority = %label, speed, "estimator returned unusable speed; using baseline");
                label.baseline_speed_kmh()
            }
            Err(err) => {
                warn!(priority = %label, error = %err, "estimator failed; using baseline");
                label.baseline_speed_kmh()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{LookupTableEstimator, SpeedEstimator, SpeedPredictor};
    use crate::error::EstimatorError;
    use crate::models::priority::PriorityLabel;

    struct Fixed(f64);

    impl SpeedEstimator for Fixed {
        fn estimate(&self, _label: PriorityLabel) -> Result<f64, EstimatorError> {
            Ok(self.0)
        }
    }

    struct Counting(AtomicUsize);

    impl SpeedEstimator for Counting {
        fn estimate(&self, label: PriorityLabel) -> Result<f64, EstimatorError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(match label {
                PriorityLabel::Express => 80.0,
                PriorityLabel::Standard => 40.0,
            })
        }
    }

    #[test]
    fn baseline_speeds() {
        let predictor = SpeedPredictor::baseline();
        assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 60.0);
        assert_eq!(predictor.predict_kmh(PriorityLabel::Standard), 30.0);
        assert_eq!(predictor.predict_kmh(PriorityLabel::from("Same-day")), 30.0);
    }

    #[test]
    fn estimator_is_consulted_on_every_call() {
        let counting = Arc::new(Counting(Default::default()));
        let predictor = SpeedPredictor::with_estimator(counting.clone());

        assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 80.0);
        assert_eq!(predictor.predict_kmh(PriorityLabel::Standard), 40.0);
        assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 80.0);
        assert_eq!(counting.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn non_positive_estimates_fall_back_to_baseline() {
        for bad in [0.0, -12.0, f64::NAN, f64::INFINITY] {
            let predictor = SpeedPredictor::with_estimator(Arc::new(Fixed(bad)));
            assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 60.0);
            assert_eq!(predictor.predict_kmh(PriorityLabel::Standard), 30.0);
        }
    }

    #[test]
    fn table_missing_a_label_falls_back_for_that_label() {
        let table = LookupTableEstimator::new(HashMap::from([("Express".to_string(), 75.0)]));
        let predictor = SpeedPredictor::with_estimator(Arc::new(table));

        assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 75.0);
        assert_eq!(predictor.predict_kmh(PriorityLabel::Standard), 30.0);
    }

    #[test]
    fn missing_model_file_uses_baseline() {
        let predictor =
            SpeedPredictor::from_model_path(Some(Path::new("/nonexistent/speed_table.json")));
        assert!(!predictor.has_estimator());
        assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 60.0);
    }

    #[test]
    fn model_file_is_loaded_when_present() {
        let path = std::env::temp_dir().join(format!("speed_table_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"Express": 55.0, "Standard": 25.0}"#).unwrap();

        let predictor = SpeedPredictor::from_model_path(Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();

        assert!(predictor.has_estimator());
        assert_eq!(predictor.predict_kmh(PriorityLabel::Express), 55.0);
        assert_eq!(predictor.predict_kmh(PriorityLabel::Standard), 25.0);
    }

    #[test]
    fn malformed_model_file_uses_baseline() {
        let path = std::env::temp_dir().join(format!("speed_table_bad_{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();

        let predictor = SpeedPredictor::from_model_path(Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();

        assert!(!predictor.has_estimator());
    }
}
