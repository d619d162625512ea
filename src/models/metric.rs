use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::MetricType;
use crate::store::{Record, RecordId};

/// A captured reading: numeric for most kinds, free-form text for blood
/// pressure ("120/80").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A vital-sign reading logged at capture time; immutable after creation in
/// observed usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: MetricType,
    pub value: MetricValue,
    pub unit: String,
    pub date: NaiveDate,
    #[serde(with = "super::hhmm")]
    pub time: NaiveTime,
    pub notes: Option<String>,
}

impl HealthMetric {
    /// The single comparable instant formed from date + time.
    pub fn instant(&self) -> NaiveDateTime {
        crate::dates::instant(self.date, self.time)
    }
}

impl Record for HealthMetric {
    const ENTITY: &'static str = "health metric";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
