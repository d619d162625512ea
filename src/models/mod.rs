//! Canonical record types for the four tracked collections.
//!
//! One type per entity regardless of which store backs it; the remote store's
//! field-name translation lives at the collaborator boundary, not here.
//! Optional fields are `Option`, never sentinel empty strings.

pub mod appointment;
pub mod enums;
pub mod event;
pub mod medication;
pub mod metric;

pub use appointment::Appointment;
pub use enums::{AppointmentStatus, EventKind, MetricType};
pub use event::MedicalEvent;
pub use medication::{Medication, TakenEntry};
pub use metric::{HealthMetric, MetricValue};

/// Serde adapter for times carried as 24-hour `HH:MM` strings.
///
/// Record times hold minute precision: deserializing drops any seconds, so a
/// round trip through the wire format never changes a stored value.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::dates::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::dates::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}
