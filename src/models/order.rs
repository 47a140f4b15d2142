use serde::Deserialize;

use crate::models::location::GeoPoint;
use crate::models::priority::PriorityLabel;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default)]
    pub destination: Option<GeoPoint>,
    #[serde(default)]
    pub priority: Option<i64>,
}

impl OrderRecord {
    pub fn priority_label(&self) -> PriorityLabel {
        self.priority
            .map(PriorityLabel::from_numeric)
            .unwrap_or_default()
    }
}
