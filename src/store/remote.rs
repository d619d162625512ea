//! Remote record-service client.
//!
//! The hosted backend keeps its own column naming (`dosage_c`,
//! `prescribed_by_c`, ...) and stores the medication taken log as a text
//! blob. Each entity implements [`RemoteRecord`] to translate between that
//! schema and the canonical model, so call sites never branch on record
//! shape. Backend failures propagate unchanged; there is no retry, backoff,
//! or request timeout — a hung service leaves the caller waiting, matching
//! the product's accepted-risk design.

use std::marker::PhantomData;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{Record, RecordId, RecordStore, StoreError};
use crate::dates::{self, DATE_FORMAT, TIME_FORMAT};
use crate::models::{
    Appointment, AppointmentStatus, EventKind, HealthMetric, MedicalEvent, Medication,
    MetricType, MetricValue, TakenEntry,
};

/// Wire-format adapter implemented per entity.
pub trait RemoteRecord: Record {
    /// Backend table name.
    const TABLE: &'static str;

    /// Canonical record to backend row.
    fn to_backend(&self) -> Value;

    /// Backend row to canonical record.
    fn from_backend(row: &Value) -> Result<Self, StoreError>;
}

/// Per-record outcome of a batched create: successes never suppress the
/// individual failure reasons.
#[derive(Debug, Default)]
pub struct BatchOutcome<R> {
    pub created: Vec<R>,
    pub failures: Vec<BatchFailure>,
}

/// One rejected record in a batch, by submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub reason: String,
}

pub struct RemoteStore<R: RemoteRecord> {
    base_url: String,
    client: reqwest::Client,
    _entity: PhantomData<R>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    success: bool,
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<BatchResult>,
}

#[derive(Debug, Deserialize)]
struct BatchResult {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl<R: RemoteRecord> RemoteStore<R> {
    /// Client for the record service at `base_url`. Deliberately no request
    /// timeout: see module docs.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            _entity: PhantomData,
        }
    }

    /// Client for the default endpoint from `config`.
    pub fn default_endpoint() -> Self {
        Self::new(crate::config::DEFAULT_REMOTE_BASE_URL)
    }

    fn collection_url(&self) -> String {
        format!("{}/tables/{}/records", self.base_url, R::TABLE)
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn transport_error(e: reqwest::Error) -> StoreError {
        if e.is_connect() {
            StoreError::Backend(format!("cannot reach record service: {e}"))
        } else {
            StoreError::Backend(e.to_string())
        }
    }

    async fn read_item(&self, response: reqwest::Response, id: RecordId) -> Result<R, StoreError> {
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                entity: R::ENTITY,
                id,
            });
        }
        let body: ItemResponse = response.json().await.map_err(Self::transport_error)?;
        if !body.success {
            return Err(StoreError::Backend(failure_reason(body.message)));
        }
        let row = body
            .data
            .ok_or_else(|| StoreError::Backend("record service returned no data".to_string()))?;
        R::from_backend(&row)
    }

    /// Submits a batch; the backend reports success or failure per record.
    pub async fn create_many(&self, records: Vec<R>) -> Result<BatchOutcome<R>, StoreError> {
        let rows: Vec<Value> = records.iter().map(RemoteRecord::to_backend).collect();
        let response = self
            .client
            .post(self.collection_url())
            .json(&json!({ "records": rows }))
            .send()
            .await
            .map_err(Self::transport_error)?;
        let body: BatchResponse = response.json().await.map_err(Self::transport_error)?;
        Ok(collect_batch(body))
    }
}

fn failure_reason(message: Option<String>) -> String {
    message.unwrap_or_else(|| "record service reported failure".to_string())
}

/// Folds the backend's per-record batch results into created records and
/// indexed failure reasons; one success never suppresses another record's
/// failure.
fn collect_batch<R: RemoteRecord>(response: BatchResponse) -> BatchOutcome<R> {
    let mut outcome = BatchOutcome {
        created: Vec::new(),
        failures: Vec::new(),
    };
    for (index, result) in response.results.into_iter().enumerate() {
        if !result.success {
            let reason = failure_reason(result.message);
            tracing::warn!(entity = R::ENTITY, index, %reason, "batch record rejected");
            outcome.failures.push(BatchFailure { index, reason });
            continue;
        }
        match result.data.as_ref().map(R::from_backend) {
            Some(Ok(record)) => outcome.created.push(record),
            Some(Err(e)) => outcome.failures.push(BatchFailure {
                index,
                reason: e.to_string(),
            }),
            None => outcome.failures.push(BatchFailure {
                index,
                reason: "record service returned no data".to_string(),
            }),
        }
    }
    outcome
}

impl<R: RemoteRecord> RecordStore<R> for RemoteStore<R> {
    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(Self::transport_error)?;
        let body: ListResponse = response.json().await.map_err(Self::transport_error)?;
        if !body.success {
            return Err(StoreError::Backend(failure_reason(body.message)));
        }
        body.data.iter().map(R::from_backend).collect()
    }

    async fn get_by_id(&self, id: RecordId) -> Result<R, StoreError> {
        let response = self
            .client
            .get(self.record_url(id))
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.read_item(response, id).await
    }

    async fn create(&self, record: R) -> Result<R, StoreError> {
        let mut outcome = self.create_many(vec![record]).await?;
        if let Some(failure) = outcome.failures.pop() {
            return Err(StoreError::Rejected {
                entity: R::ENTITY,
                reason: failure.reason,
            });
        }
        outcome
            .created
            .pop()
            .ok_or_else(|| StoreError::Backend("record service returned no data".to_string()))
    }

    async fn update(&self, id: RecordId, mut record: R) -> Result<R, StoreError> {
        // Id is immutable; the addressed id wins over whatever came in.
        record.set_id(id);
        let response = self
            .client
            .patch(self.record_url(id))
            .json(&record.to_backend())
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.read_item(response, id).await
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let response = self
            .client
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(Self::transport_error)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                entity: R::ENTITY,
                id,
            });
        }
        let body: ItemResponse = response.json().await.map_err(Self::transport_error)?;
        if !body.success {
            return Err(StoreError::Backend(failure_reason(body.message)));
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Row field helpers
// ---------------------------------------------------------------------------

fn missing(field: &str) -> StoreError {
    StoreError::InvalidField {
        field: field.into(),
        value: "<missing>".into(),
    }
}

fn id_field(row: &Value, field: &str) -> Result<RecordId, StoreError> {
    row.get(field)
        .and_then(Value::as_u64)
        .and_then(|raw| RecordId::try_from(raw).ok())
        .ok_or_else(|| missing(field))
}

fn text_field(row: &Value, field: &str) -> Result<String, StoreError> {
    row.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(field))
}

/// Backend rows use null and empty string interchangeably for absent fields.
fn opt_text_field(row: &Value, field: &str) -> Option<String> {
    row.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn date_field(row: &Value, field: &str) -> Result<chrono::NaiveDate, StoreError> {
    dates::parse_date(&text_field(row, field)?)
}

fn opt_date_field(row: &Value, field: &str) -> Result<Option<chrono::NaiveDate>, StoreError> {
    opt_text_field(row, field)
        .map(|raw| dates::parse_date(&raw))
        .transpose()
}

fn time_field(row: &Value, field: &str) -> Result<chrono::NaiveTime, StoreError> {
    dates::parse_time(&text_field(row, field)?)
}

fn opt_date_json(date: Option<chrono::NaiveDate>) -> Value {
    match date {
        Some(d) => Value::String(d.format(DATE_FORMAT).to_string()),
        None => Value::Null,
    }
}

// ---------------------------------------------------------------------------
// Taken-log blob codec
// ---------------------------------------------------------------------------

/// Serializes the taken log for the backend's text column: one
/// `date|time|taken` line per entry.
pub(crate) fn serialize_taken_log(entries: &[TakenEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}|{}|{}",
                entry.date.format(DATE_FORMAT),
                entry.time.format(TIME_FORMAT),
                entry.taken
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Re-parses the backend's taken blob. Malformed lines are skipped with a
/// warning rather than failing the whole record.
pub(crate) fn parse_taken_log(blob: &str) -> Vec<TakenEntry> {
    let mut entries = Vec::new();
    for line in blob.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_taken_line(line) {
            Some(entry) => entries.push(entry),
            None => tracing::warn!(%line, "skipping malformed taken-log line"),
        }
    }
    entries
}

fn parse_taken_line(line: &str) -> Option<TakenEntry> {
    let mut parts = line.splitn(3, '|');
    let date = dates::parse_date(parts.next()?).ok()?;
    let time = dates::parse_time(parts.next()?).ok()?;
    let taken = parts.next()?.trim().parse::<bool>().ok()?;
    Some(TakenEntry { date, time, taken })
}

// ---------------------------------------------------------------------------
// Per-entity field maps
// ---------------------------------------------------------------------------

impl RemoteRecord for Medication {
    const TABLE: &'static str = "medication_c";

    fn to_backend(&self) -> Value {
        json!({
            "Id": self.id,
            "Name": self.name,
            "dosage_c": self.dosage,
            "frequency_c": self.frequency,
            "prescribed_by_c": self.prescribed_by,
            "start_date_c": self.start_date.format(DATE_FORMAT).to_string(),
            "end_date_c": opt_date_json(self.end_date),
            "refill_date_c": opt_date_json(self.refill_date),
            "notes_c": self.notes,
            "taken_c": serialize_taken_log(&self.taken),
        })
    }

    fn from_backend(row: &Value) -> Result<Self, StoreError> {
        Ok(Self {
            id: id_field(row, "Id")?,
            name: text_field(row, "Name")?,
            dosage: text_field(row, "dosage_c")?,
            frequency: text_field(row, "frequency_c")?,
            prescribed_by: text_field(row, "prescribed_by_c")?,
            start_date: date_field(row, "start_date_c")?,
            end_date: opt_date_field(row, "end_date_c")?,
            refill_date: opt_date_field(row, "refill_date_c")?,
            notes: opt_text_field(row, "notes_c"),
            taken: parse_taken_log(&text_field(row, "taken_c").unwrap_or_default()),
        })
    }
}

impl RemoteRecord for Appointment {
    const TABLE: &'static str = "appointment_c";

    fn to_backend(&self) -> Value {
        json!({
            "Id": self.id,
            "Name": self.title,
            "provider_c": self.provider,
            "specialty_c": self.specialty,
            "date_c": self.date.format(DATE_FORMAT).to_string(),
            "time_c": self.time.format(TIME_FORMAT).to_string(),
            "location_c": self.location,
            "reason_c": self.reason,
            "notes_c": self.notes,
            "status_c": self.status.as_str(),
        })
    }

    fn from_backend(row: &Value) -> Result<Self, StoreError> {
        Ok(Self {
            id: id_field(row, "Id")?,
            title: text_field(row, "Name")?,
            provider: text_field(row, "provider_c")?,
            specialty: text_field(row, "specialty_c")?,
            date: date_field(row, "date_c")?,
            time: time_field(row, "time_c")?,
            location: text_field(row, "location_c")?,
            reason: text_field(row, "reason_c")?,
            notes: opt_text_field(row, "notes_c"),
            status: AppointmentStatus::from_str(&text_field(row, "status_c")?)?,
        })
    }
}

impl RemoteRecord for HealthMetric {
    const TABLE: &'static str = "health_metric_c";

    fn to_backend(&self) -> Value {
        json!({
            "Id": self.id,
            "type_c": self.kind.as_str(),
            "value_c": self.value.to_string(),
            "unit_c": self.unit,
            "date_c": self.date.format(DATE_FORMAT).to_string(),
            "time_c": self.time.format(TIME_FORMAT).to_string(),
            "notes_c": self.notes,
        })
    }

    fn from_backend(row: &Value) -> Result<Self, StoreError> {
        let kind = MetricType::from_str(&text_field(row, "type_c")?)?;
        let raw_value = text_field(row, "value_c")?;
        let value = if kind.is_numeric() {
            raw_value
                .trim()
                .parse::<f64>()
                .map(MetricValue::Number)
                .map_err(|_| StoreError::InvalidField {
                    field: "value_c".into(),
                    value: raw_value.clone(),
                })?
        } else {
            MetricValue::Text(raw_value)
        };
        Ok(Self {
            id: id_field(row, "Id")?,
            kind,
            value,
            unit: text_field(row, "unit_c")?,
            date: date_field(row, "date_c")?,
            time: time_field(row, "time_c")?,
            notes: opt_text_field(row, "notes_c"),
        })
    }
}

impl RemoteRecord for MedicalEvent {
    const TABLE: &'static str = "medical_event_c";

    fn to_backend(&self) -> Value {
        json!({
            "Id": self.id,
            "Name": self.title,
            "type_c": self.kind.as_str(),
            "date_c": self.date.format(DATE_FORMAT).to_string(),
            "provider_c": self.provider,
            "description_c": self.description,
            "results_c": self.results,
        })
    }

    fn from_backend(row: &Value) -> Result<Self, StoreError> {
        Ok(Self {
            id: id_field(row, "Id")?,
            kind: EventKind::from_str(&text_field(row, "type_c")?)?,
            title: text_field(row, "Name")?,
            date: date_field(row, "date_c")?,
            provider: text_field(row, "provider_c")?,
            description: text_field(row, "description_c")?,
            results: opt_text_field(row, "results_c"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn medication_round_trips_through_backend_schema() {
        let mut med = Medication::new("Metformin", "500mg", "Twice daily", "Dr. Chen", day(2024, 1, 1));
        med.id = 3;
        med.end_date = Some(day(2024, 12, 31));
        med.refill_date = Some(day(2024, 6, 10));
        med.notes = Some("Take with food".into());
        med.taken.push(TakenEntry {
            date: day(2024, 6, 1),
            time: hm(8, 30),
            taken: true,
        });

        let row = med.to_backend();
        assert_eq!(row["Name"], "Metformin");
        assert_eq!(row["prescribed_by_c"], "Dr. Chen");
        assert_eq!(row["taken_c"], "2024-06-01|08:30|true");

        let back = Medication::from_backend(&row).unwrap();
        assert_eq!(back, med);
    }

    #[test]
    fn medication_absent_optionals_stay_absent() {
        let med = Medication::new("Metformin", "500mg", "Twice daily", "Dr. Chen", day(2024, 1, 1));
        let row = med.to_backend();
        assert!(row["end_date_c"].is_null());

        let back = Medication::from_backend(&row).unwrap();
        assert_eq!(back.end_date, None);
        assert_eq!(back.notes, None);
        assert!(back.taken.is_empty());
    }

    #[test]
    fn empty_string_reads_as_absent() {
        let mut row = Medication::new("M", "1mg", "Daily", "Dr. A", day(2024, 1, 1)).to_backend();
        row["notes_c"] = Value::String("   ".into());
        row["end_date_c"] = Value::String(String::new());
        let back = Medication::from_backend(&row).unwrap();
        assert_eq!(back.notes, None);
        assert_eq!(back.end_date, None);
    }

    #[test]
    fn taken_blob_skips_malformed_lines() {
        let blob = "2024-06-01|08:30|true\nnot a line\n2024-06-02|21:00|false\n\n2024-13-99|08:00|true";
        let entries = parse_taken_log(blob);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, day(2024, 6, 1));
        assert!(!entries[1].taken);
    }

    #[test]
    fn taken_blob_round_trips() {
        let entries = vec![
            TakenEntry { date: day(2024, 6, 1), time: hm(8, 0), taken: true },
            TakenEntry { date: day(2024, 6, 1), time: hm(20, 15), taken: true },
        ];
        assert_eq!(parse_taken_log(&serialize_taken_log(&entries)), entries);
    }

    #[test]
    fn appointment_round_trips_through_backend_schema() {
        let mut appt = Appointment::new("Annual physical", "Dr. Patel", "Internal Medicine", day(2024, 7, 15), hm(9, 0));
        appt.id = 5;
        appt.location = "Clinic B".into();
        appt.reason = "Routine checkup".into();

        let row = appt.to_backend();
        assert_eq!(row["Name"], "Annual physical");
        assert_eq!(row["status_c"], "scheduled");
        assert_eq!(row["time_c"], "09:00");

        let back = Appointment::from_backend(&row).unwrap();
        assert_eq!(back, appt);
    }

    #[test]
    fn appointment_bad_status_is_rejected() {
        let mut row = Appointment::new("A", "B", "C", day(2024, 7, 15), hm(9, 0)).to_backend();
        row["status_c"] = Value::String("tentative".into());
        assert!(matches!(
            Appointment::from_backend(&row),
            Err(StoreError::InvalidField { .. })
        ));
    }

    #[test]
    fn numeric_metric_round_trips() {
        let metric = HealthMetric {
            id: 2,
            kind: MetricType::Weight,
            value: MetricValue::Number(182.5),
            unit: "lbs".into(),
            date: day(2024, 6, 3),
            time: hm(7, 45),
            notes: None,
        };
        let row = metric.to_backend();
        assert_eq!(row["value_c"], "182.5");
        assert_eq!(HealthMetric::from_backend(&row).unwrap(), metric);
    }

    #[test]
    fn blood_pressure_stays_text() {
        let metric = HealthMetric {
            id: 1,
            kind: MetricType::BloodPressure,
            value: MetricValue::Text("120/80".into()),
            unit: "mmHg".into(),
            date: day(2024, 6, 3),
            time: hm(7, 45),
            notes: Some("morning".into()),
        };
        let back = HealthMetric::from_backend(&metric.to_backend()).unwrap();
        assert_eq!(back.value, MetricValue::Text("120/80".into()));
    }

    #[test]
    fn non_numeric_value_for_numeric_kind_is_rejected() {
        let mut row = HealthMetric {
            id: 1,
            kind: MetricType::HeartRate,
            value: MetricValue::Number(64.0),
            unit: "bpm".into(),
            date: day(2024, 6, 3),
            time: hm(7, 45),
            notes: None,
        }
        .to_backend();
        row["value_c"] = Value::String("sixty-four".into());
        assert!(matches!(
            HealthMetric::from_backend(&row),
            Err(StoreError::InvalidField { .. })
        ));
    }

    #[test]
    fn event_round_trips_through_backend_schema() {
        let mut event = MedicalEvent::new(
            EventKind::Vaccination,
            "Influenza vaccine",
            day(2023, 10, 2),
            "CVS Pharmacy",
            "Seasonal flu shot",
        );
        event.id = 8;
        event.results = Some("No adverse reaction".into());

        let row = event.to_backend();
        assert_eq!(row["type_c"], "vaccination");
        assert_eq!(MedicalEvent::from_backend(&row).unwrap(), event);
    }

    #[test]
    fn mixed_batch_keeps_successes_and_every_failure_reason() {
        let good = Medication::new("Metformin", "500mg", "Twice daily", "Dr. Chen", day(2024, 1, 1))
            .to_backend();
        let mut malformed = good.clone();
        malformed.as_object_mut().unwrap().remove("Name");

        let response = BatchResponse {
            results: vec![
                BatchResult { success: true, data: Some(good), message: None },
                BatchResult { success: false, data: None, message: Some("duplicate Name".into()) },
                BatchResult { success: true, data: None, message: None },
                BatchResult { success: true, data: Some(malformed), message: None },
            ],
        };

        let outcome: BatchOutcome<Medication> = collect_batch(response);
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].name, "Metformin");
        assert_eq!(
            outcome.failures,
            vec![
                BatchFailure { index: 1, reason: "duplicate Name".into() },
                BatchFailure { index: 2, reason: "record service returned no data".into() },
                BatchFailure { index: 3, reason: "invalid value for Name: <missing>".into() },
            ]
        );
    }

    #[test]
    fn rejected_batch_record_without_message_gets_a_default_reason() {
        let response = BatchResponse {
            results: vec![BatchResult { success: false, data: None, message: None }],
        };
        let outcome: BatchOutcome<Medication> = collect_batch(response);
        assert!(outcome.created.is_empty());
        assert_eq!(outcome.failures[0].reason, "record service reported failure");
    }

    #[test]
    fn all_good_batch_has_no_failures() {
        let rows: Vec<BatchResult> = (1..=2)
            .map(|id| {
                let mut m = Medication::new("M", "1mg", "Daily", "Dr. A", day(2024, 1, 1));
                m.id = id;
                BatchResult { success: true, data: Some(m.to_backend()), message: None }
            })
            .collect();
        let outcome: BatchOutcome<Medication> = collect_batch(BatchResponse { results: rows });
        assert_eq!(outcome.created.len(), 2);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let mut row = MedicalEvent::new(EventKind::Test, "HbA1c", day(2024, 1, 15), "Lab", "Quarterly")
            .to_backend();
        row.as_object_mut().unwrap().remove("provider_c");
        assert!(matches!(
            MedicalEvent::from_backend(&row),
            Err(StoreError::InvalidField { .. })
        ));
    }
}
