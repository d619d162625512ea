use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::EventKind;
use crate::store::{Record, RecordId};

/// A medical-history entry: diagnosis, procedure, test, or vaccination.
/// Created once, read-mostly; ordered by date alone (no time component).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalEvent {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub date: NaiveDate,
    pub provider: String,
    pub description: String,
    pub results: Option<String>,
}

impl MedicalEvent {
    pub fn new(
        kind: EventKind,
        title: impl Into<String>,
        date: NaiveDate,
        provider: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            kind,
            title: title.into(),
            date,
            provider: provider.into(),
            description: description.into(),
            results: None,
        }
    }
}

impl Record for MedicalEvent {
    const ENTITY: &'static str = "medical event";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
