//! Health-metric derivations and the metrics screen.
//!
//! Readings are immutable once logged; every view over them is a
//! sort-and-slice of the fetched collection. Blood pressure is the one
//! free-form reading ("120/80"), everything else parses as a number.

use chrono::NaiveDateTime;

use crate::models::{HealthMetric, MetricType, MetricValue};
use crate::store::{RecordStore, StoreError};
use crate::view::LoadState;

/// Newest readings first, at most `limit`; ties keep their fetched order.
pub fn recent_metrics(metrics: &[HealthMetric], limit: usize) -> Vec<HealthMetric> {
    let mut recent: Vec<HealthMetric> = metrics.to_vec();
    recent.sort_by(|a, b| b.instant().cmp(&a.instant()));
    recent.truncate(limit);
    recent
}

pub fn metrics_of_type(metrics: &[HealthMetric], kind: MetricType) -> Vec<HealthMetric> {
    metrics.iter().filter(|m| m.kind == kind).cloned().collect()
}

/// The latest reading of one type, if any was ever logged.
pub fn most_recent_of_type(metrics: &[HealthMetric], kind: MetricType) -> Option<HealthMetric> {
    recent_metrics(&metrics_of_type(metrics, kind), 1).into_iter().next()
}

/// The log-metric form. Type and value are required; the unit falls back to
/// the type's default when left blank.
#[derive(Debug, Clone, Default)]
pub struct MetricInput {
    pub kind: Option<MetricType>,
    pub value: String,
    pub unit: String,
    pub notes: Option<String>,
}

impl MetricInput {
    /// Validates the form and stamps the reading with `now`.
    pub fn into_record(self, now: NaiveDateTime) -> Result<HealthMetric, StoreError> {
        let kind = self.kind.ok_or_else(|| StoreError::InvalidField {
            field: "type".into(),
            value: "<missing>".into(),
        })?;
        let raw = self.value.trim();
        if raw.is_empty() {
            return Err(StoreError::InvalidField {
                field: "value".into(),
                value: self.value.clone(),
            });
        }
        let value = if kind.is_numeric() {
            raw.parse::<f64>()
                .map(MetricValue::Number)
                .map_err(|_| StoreError::InvalidField {
                    field: "value".into(),
                    value: raw.to_string(),
                })?
        } else {
            MetricValue::Text(raw.to_string())
        };
        let unit = if self.unit.trim().is_empty() {
            kind.default_unit().to_string()
        } else {
            self.unit.trim().to_string()
        };
        Ok(HealthMetric {
            id: 0,
            kind,
            value,
            unit,
            date: now.date(),
            time: crate::dates::truncate_to_minute(now.time()),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// The metrics screen: current readings per type plus a bounded history.
pub struct MetricsView<S: RecordStore<HealthMetric>> {
    store: S,
    records: Vec<HealthMetric>,
    pub state: LoadState,
}

impl<S: RecordStore<HealthMetric>> MetricsView<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            state: LoadState::default(),
        }
    }

    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.store.get_all().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "health metrics loaded");
                self.records = records;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load health metrics");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn records(&self) -> &[HealthMetric] {
        &self.records
    }

    /// One card per metric type that has at least one reading.
    pub fn current_readings(&self) -> Vec<HealthMetric> {
        MetricType::ALL
            .iter()
            .filter_map(|kind| most_recent_of_type(&self.records, kind.clone()))
            .collect()
    }

    pub fn history(&self, limit: usize) -> Vec<HealthMetric> {
        recent_metrics(&self.records, limit)
    }

    /// The default history slice for the readings table.
    pub fn recent(&self) -> Vec<HealthMetric> {
        self.history(crate::config::DEFAULT_RECENT_LIMIT)
    }

    pub fn latest_of(&self, kind: MetricType) -> Option<HealthMetric> {
        most_recent_of_type(&self.records, kind)
    }

    pub async fn log_metric(
        &mut self,
        input: MetricInput,
        now: NaiveDateTime,
    ) -> Result<HealthMetric, StoreError> {
        let created = self.store.create(input.into_record(now)?).await?;
        tracing::info!(id = created.id, kind = created.kind.as_str(), "health metric logged");
        self.load().await;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    fn reading(id: u32, kind: MetricType, value: f64, when: NaiveDateTime) -> HealthMetric {
        HealthMetric {
            id,
            kind,
            value: MetricValue::Number(value),
            unit: "x".into(),
            date: when.date(),
            time: when.time(),
            notes: None,
        }
    }

    #[test]
    fn recent_sorts_descending_and_truncates() {
        let metrics = vec![
            reading(1, MetricType::Weight, 180.0, at(2024, 6, 1, 8, 0)),
            reading(2, MetricType::Weight, 181.0, at(2024, 6, 3, 8, 0)),
            reading(3, MetricType::HeartRate, 64.0, at(2024, 6, 2, 8, 0)),
        ];
        let ids: Vec<u32> = recent_metrics(&metrics, 2).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn recent_keeps_tie_order() {
        let when = at(2024, 6, 1, 8, 0);
        let metrics = vec![
            reading(1, MetricType::Weight, 180.0, when),
            reading(2, MetricType::HeartRate, 64.0, when),
        ];
        let ids: Vec<u32> = recent_metrics(&metrics, 5).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn recent_is_idempotent_and_leaves_input_alone() {
        let metrics = vec![
            reading(1, MetricType::Weight, 180.0, at(2024, 6, 2, 8, 0)),
            reading(2, MetricType::Weight, 181.0, at(2024, 6, 1, 8, 0)),
        ];
        let first = recent_metrics(&metrics, 1);
        let second = recent_metrics(&metrics, 1);
        assert_eq!(first, second);
        assert_eq!(metrics[0].id, 1);
    }

    #[test]
    fn most_recent_of_type_ignores_other_types() {
        let metrics = vec![
            reading(1, MetricType::Weight, 180.0, at(2024, 6, 1, 8, 0)),
            reading(2, MetricType::HeartRate, 64.0, at(2024, 6, 5, 8, 0)),
            reading(3, MetricType::Weight, 179.0, at(2024, 6, 3, 8, 0)),
        ];
        let latest = most_recent_of_type(&metrics, MetricType::Weight).unwrap();
        assert_eq!(latest.id, 3);
        assert_eq!(most_recent_of_type(&metrics, MetricType::Temperature), None);
    }

    #[test]
    fn input_parses_numeric_values() {
        let input = MetricInput {
            kind: Some(MetricType::Weight),
            value: " 182.5 ".into(),
            ..Default::default()
        };
        let record = input.into_record(at(2024, 6, 5, 7, 45)).unwrap();
        assert_eq!(record.value, MetricValue::Number(182.5));
        assert_eq!(record.unit, "lbs");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
    }

    #[test]
    fn input_keeps_blood_pressure_as_text() {
        let input = MetricInput {
            kind: Some(MetricType::BloodPressure),
            value: "120/80".into(),
            ..Default::default()
        };
        let record = input.into_record(at(2024, 6, 5, 7, 45)).unwrap();
        assert_eq!(record.value, MetricValue::Text("120/80".into()));
        assert_eq!(record.unit, "mmHg");
    }

    #[test]
    fn input_rejects_missing_type_and_bad_numbers() {
        let no_type = MetricInput {
            value: "64".into(),
            ..Default::default()
        };
        assert!(no_type.into_record(at(2024, 6, 5, 7, 45)).is_err());

        let bad_number = MetricInput {
            kind: Some(MetricType::HeartRate),
            value: "sixty-four".into(),
            ..Default::default()
        };
        assert!(matches!(
            bad_number.into_record(at(2024, 6, 5, 7, 45)),
            Err(StoreError::InvalidField { field, .. }) if field == "value"
        ));
    }

    #[test]
    fn input_prefers_explicit_unit() {
        let input = MetricInput {
            kind: Some(MetricType::Weight),
            value: "82".into(),
            unit: "kg".into(),
            ..Default::default()
        };
        assert_eq!(input.into_record(at(2024, 6, 5, 7, 45)).unwrap().unit, "kg");
    }

    #[tokio::test]
    async fn view_surfaces_current_readings_per_type() {
        let store = MemoryStore::instant(vec![
            reading(1, MetricType::Weight, 180.0, at(2024, 6, 1, 8, 0)),
            reading(2, MetricType::Weight, 179.0, at(2024, 6, 3, 8, 0)),
            reading(3, MetricType::HeartRate, 64.0, at(2024, 6, 2, 8, 0)),
        ]);
        let mut view = MetricsView::new(store);
        view.load().await;

        let current = view.current_readings();
        assert_eq!(current.len(), 2);
        assert!(current.iter().any(|m| m.id == 2));
        assert!(current.iter().any(|m| m.id == 3));
    }

    #[tokio::test]
    async fn log_metric_creates_and_refreshes() {
        let store = MemoryStore::instant(Vec::new());
        let mut view = MetricsView::new(store);
        view.load().await;

        let input = MetricInput {
            kind: Some(MetricType::BloodGlucose),
            value: "98".into(),
            ..Default::default()
        };
        let created = view.log_metric(input, at(2024, 6, 5, 7, 45)).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.unit, "mg/dL");
        assert_eq!(view.history(5).len(), 1);
    }
}
