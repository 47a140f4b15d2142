use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const EXPRESS_PRIORITY_THRESHOLD: i64 = 5;

const EXPRESS_SPEED_KMH: f64 = 60.0;
const STANDARD_SPEED_KMH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PriorityLabel {
    Express,
    #[default]
    Standard,
}

impl PriorityLabel {
    pub fn from_numeric(priority: i64) -> Self {
        if priority >= EXPRESS_PRIORITY_THRESHOLD {
            PriorityLabel::Express
        } else {
            PriorityLabel::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLabel::Express => "Express",
            PriorityLabel::Standard => "Standard",
        }
    }

    pub fn baseline_speed_kmh(self) -> f64 {
        match self {
            PriorityLabel::Express => EXPRESS_SPEED_KMH,
            PriorityLabel::Standard => STANDARD_SPEED_KMH,
        }
    }
}

impl From<&str> for PriorityLabel {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "Express" => PriorityLabel::Express,
            _ => PriorityLabel::Standard,
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPriority {
    Label(String),
    Numeric(i64),
    Fractional(f64),
}

// Clients send either the label itself or the order service's integer priority.
impl<'de> Deserialize<'de> for PriorityLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = match RawPriority::deserialize(deserializer)? {
            RawPriority::Label(raw) => PriorityLabel::from(raw.as_str()),
            RawPriority::Numeric(value) => PriorityLabel::from_numeric(value),
            RawPriority::Fractional(value) => {
                if value >= EXPRESS_PRIORITY_THRESHOLD as f64 {
                    PriorityLabel::Express
                } else {
                    PriorityLabel::Standard
                }
            }
        };

        Ok(label)
    }
}
