use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use crate::store::{Record, RecordId};

/// A scheduled visit with a provider. Date and time combine into the instant
/// used for upcoming/past ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub title: String,
    pub provider: String,
    pub specialty: String,
    pub date: NaiveDate,
    #[serde(with = "super::hhmm")]
    pub time: NaiveTime,
    pub location: String,
    pub reason: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// A new appointment as submitted from the form; status defaults to
    /// scheduled, id 0 until the store assigns one.
    pub fn new(
        title: impl Into<String>,
        provider: impl Into<String>,
        specialty: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            provider: provider.into(),
            specialty: specialty.into(),
            date,
            time,
            location: String::new(),
            reason: String::new(),
            notes: None,
            status: AppointmentStatus::Scheduled,
        }
    }

    /// The single comparable instant formed from date + time.
    pub fn instant(&self) -> NaiveDateTime {
        crate::dates::instant(self.date, self.time)
    }
}

impl Record for Appointment {
    const ENTITY: &'static str = "appointment";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
