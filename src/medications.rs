//! Medication derivations and the medications screen.
//!
//! A medication is "active today" by date-window membership alone; the log of
//! taken events drives adherence and the per-card dose status. The overdue
//! cutoff is a fixed wall-clock hour, not a per-dose schedule — the product
//! does not model scheduled dose times.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::config;
use crate::filter::search_matches;
use crate::models::{Medication, TakenEntry};
use crate::store::{RecordId, RecordStore, StoreError};
use crate::view::LoadState;

/// Today's completion numbers for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdherenceStats {
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

/// Per-card dose badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseStatus {
    TakenToday,
    Overdue,
    Pending,
}

/// The medications screen's status dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TakenFilter {
    #[default]
    All,
    TakenToday,
    PendingToday,
}

/// Active on `today`: started on or before, and not yet ended. Date-only
/// comparison; an absent end date means open-ended.
pub fn is_active_on(medication: &Medication, today: NaiveDate) -> bool {
    medication.start_date <= today && medication.end_date.map_or(true, |end| end >= today)
}

pub fn todays_medications(medications: &[Medication], today: NaiveDate) -> Vec<Medication> {
    medications
        .iter()
        .filter(|m| is_active_on(m, today))
        .cloned()
        .collect()
}

/// Any taken-log entry dated `date` counts, whatever its flag says; the log
/// records the marking action, and the flag is always written true.
pub fn taken_on(medication: &Medication, date: NaiveDate) -> bool {
    medication.taken.iter().any(|entry| entry.date == date)
}

/// Completion over today's active medications. An empty day is 0%, not a
/// division by zero.
pub fn adherence(medications: &[Medication], today: NaiveDate) -> AdherenceStats {
    let active: Vec<&Medication> = medications
        .iter()
        .filter(|m| is_active_on(m, today))
        .collect();
    let total = active.len();
    let completed = active.iter().filter(|m| taken_on(m, today)).count();
    let percentage = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };
    AdherenceStats {
        total,
        completed,
        percentage,
    }
}

/// True when the refill date is `threshold_days` or fewer away, counting an
/// already-passed refill date as due.
pub fn near_refill_within(medication: &Medication, now: NaiveDateTime, threshold_days: i64) -> bool {
    medication
        .refill_date
        .is_some_and(|refill| crate::dates::days_until(refill, now) <= threshold_days)
}

pub fn near_refill(medication: &Medication, now: NaiveDateTime) -> bool {
    near_refill_within(medication, now, config::REFILL_THRESHOLD_DAYS)
}

/// Taken today wins; otherwise past the cutoff hour means overdue.
pub fn dose_status(medication: &Medication, now: NaiveDateTime) -> DoseStatus {
    if taken_on(medication, now.date()) {
        DoseStatus::TakenToday
    } else if now.hour() >= config::OVERDUE_CUTOFF_HOUR {
        DoseStatus::Overdue
    } else {
        DoseStatus::Pending
    }
}

/// Search over name and prescriber composed with the taken-today dropdown.
pub fn filter_medications(
    medications: &[Medication],
    term: &str,
    status: TakenFilter,
    today: NaiveDate,
) -> Vec<Medication> {
    medications
        .iter()
        .filter(|m| search_matches(term, &[&m.name, &m.prescribed_by]))
        .filter(|m| match status {
            TakenFilter::All => true,
            TakenFilter::TakenToday => taken_on(m, today),
            TakenFilter::PendingToday => !taken_on(m, today),
        })
        .cloned()
        .collect()
}

/// Form fields for a new medication; required text fields are validated
/// before anything reaches the store.
#[derive(Debug, Clone, Default)]
pub struct MedicationDraft {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub prescribed_by: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub refill_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl MedicationDraft {
    pub fn into_record(self) -> Result<Medication, StoreError> {
        for (field, value) in [
            ("name", &self.name),
            ("dosage", &self.dosage),
            ("frequency", &self.frequency),
            ("prescribed_by", &self.prescribed_by),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::InvalidField {
                    field: field.into(),
                    value: value.clone(),
                });
            }
        }
        let start_date = self.start_date.ok_or_else(|| StoreError::InvalidField {
            field: "start_date".into(),
            value: "<missing>".into(),
        })?;
        let mut medication = Medication::new(
            self.name.trim(),
            self.dosage.trim(),
            self.frequency.trim(),
            self.prescribed_by.trim(),
            start_date,
        );
        medication.end_date = self.end_date;
        medication.refill_date = self.refill_date;
        medication.notes = self.notes.filter(|n| !n.trim().is_empty());
        Ok(medication)
    }
}

/// The medications screen: last-fetched collection plus the current search
/// and status selections, recomputed into a visible slice on demand.
pub struct MedicationListView<S: RecordStore<Medication>> {
    store: S,
    records: Vec<Medication>,
    pub state: LoadState,
    pub search: String,
    pub taken_filter: TakenFilter,
}

impl<S: RecordStore<Medication>> MedicationListView<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            state: LoadState::default(),
            search: String::new(),
            taken_filter: TakenFilter::All,
        }
    }

    /// Fetches the full collection. On failure the previous records stay
    /// visible and the error message lands in the view state.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.store.get_all().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "medications loaded");
                self.records = records;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load medications");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// The slice to render under the current selections.
    pub fn visible(&self, today: NaiveDate) -> Vec<Medication> {
        filter_medications(&self.records, &self.search, self.taken_filter, today)
    }

    pub fn records(&self) -> &[Medication] {
        &self.records
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.taken_filter = TakenFilter::All;
    }

    /// Appends a taken-log entry stamped with `now`, then re-fetches.
    pub async fn mark_as_taken(
        &mut self,
        id: RecordId,
        now: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let mut medication = self.store.get_by_id(id).await?;
        medication.taken.push(TakenEntry {
            date: now.date(),
            time: crate::dates::truncate_to_minute(now.time()),
            taken: true,
        });
        self.store.update(id, medication).await?;
        tracing::info!(id, "medication marked as taken");
        self.load().await;
        Ok(())
    }

    pub async fn add_medication(&mut self, draft: MedicationDraft) -> Result<Medication, StoreError> {
        let created = self.store.create(draft.into_record()?).await?;
        tracing::info!(id = created.id, name = %created.name, "medication added");
        self.load().await;
        Ok(created)
    }

    pub async fn remove(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        tracing::info!(id, "medication deleted");
        self.load().await;
        Ok(())
    }
}
