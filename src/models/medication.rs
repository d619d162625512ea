use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::store::{Record, RecordId};

/// One "marked as taken" entry in a medication's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakenEntry {
    pub date: NaiveDate,
    #[serde(with = "super::hhmm")]
    pub time: NaiveTime,
    pub taken: bool,
}

/// A prescribed (or self-reported) medication with its taken log.
///
/// Active on a given day when `start_date <= day <= end_date`, with a missing
/// end date meaning open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: RecordId,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub prescribed_by: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub refill_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub taken: Vec<TakenEntry>,
}

impl Medication {
    /// A fresh record as submitted from the entry form: no taken entries yet,
    /// id 0 until the store assigns one.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        prescribed_by: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            prescribed_by: prescribed_by.into(),
            start_date,
            end_date: None,
            refill_date: None,
            notes: None,
            taken: Vec::new(),
        }
    }
}

impl Record for Medication {
    const ENTITY: &'static str = "medication";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
