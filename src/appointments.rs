//! Appointment derivations and the calendar screen.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Appointment, AppointmentStatus};
use crate::store::{RecordId, RecordStore, StoreError};
use crate::view::LoadState;

/// Scheduled appointments at or after `now`, soonest first. Cancelled and
/// completed never appear; ties keep their fetched order.
pub fn upcoming_appointments(appointments: &[Appointment], now: NaiveDateTime) -> Vec<Appointment> {
    let mut upcoming: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled && a.instant() >= now)
        .cloned()
        .collect();
    upcoming.sort_by(|a, b| a.instant().cmp(&b.instant()));
    upcoming
}

/// Appointments on one calendar date, any status, time ignored.
pub fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.date == date)
        .cloned()
        .collect()
}

pub fn todays_appointments(appointments: &[Appointment], today: NaiveDate) -> Vec<Appointment> {
    appointments_on(appointments, today)
}

/// Form fields for a new appointment.
#[derive(Debug, Clone, Default)]
pub struct AppointmentDraft {
    pub title: String,
    pub provider: String,
    pub specialty: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: String,
    pub reason: String,
    pub notes: Option<String>,
}

impl AppointmentDraft {
    pub fn into_record(self) -> Result<Appointment, StoreError> {
        for (field, value) in [("title", &self.title), ("provider", &self.provider)] {
            if value.trim().is_empty() {
                return Err(StoreError::InvalidField {
                    field: field.into(),
                    value: value.clone(),
                });
            }
        }
        let date = self.date.ok_or_else(|| StoreError::InvalidField {
            field: "date".into(),
            value: "<missing>".into(),
        })?;
        let time = self.time.ok_or_else(|| StoreError::InvalidField {
            field: "time".into(),
            value: "<missing>".into(),
        })?;
        let mut appointment = Appointment::new(
            self.title.trim(),
            self.provider.trim(),
            self.specialty.trim(),
            date,
            time,
        );
        appointment.location = self.location.trim().to_string();
        appointment.reason = self.reason.trim().to_string();
        appointment.notes = self.notes.filter(|n| !n.trim().is_empty());
        Ok(appointment)
    }
}

/// The appointments screen: the fetched collection plus the calendar's
/// selected date.
pub struct AppointmentsView<S: RecordStore<Appointment>> {
    store: S,
    records: Vec<Appointment>,
    pub state: LoadState,
    pub selected_date: Option<NaiveDate>,
}

impl<S: RecordStore<Appointment>> AppointmentsView<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            state: LoadState::default(),
            selected_date: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.store.get_all().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "appointments loaded");
                self.records = records;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load appointments");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn records(&self) -> &[Appointment] {
        &self.records
    }

    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<Appointment> {
        upcoming_appointments(&self.records, now)
    }

    /// The appointments for the calendar's selected day, or today when no
    /// day is selected.
    pub fn for_selected_date(&self, today: NaiveDate) -> Vec<Appointment> {
        appointments_on(&self.records, self.selected_date.unwrap_or(today))
    }

    pub async fn add_appointment(
        &mut self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, StoreError> {
        let created = self.store.create(draft.into_record()?).await?;
        tracing::info!(id = created.id, title = %created.title, "appointment added");
        self.load().await;
        Ok(created)
    }

    pub async fn remove(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        tracing::info!(id, "appointment deleted");
        self.load().await;
        Ok(())
    }
}
