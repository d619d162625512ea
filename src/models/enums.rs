use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidField {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(MetricType {
    BloodPressure => "Blood Pressure",
    Weight => "Weight",
    BloodGlucose => "Blood Glucose",
    HeartRate => "Heart Rate",
    Temperature => "Temperature",
});

str_enum!(EventKind {
    Diagnosis => "diagnosis",
    Procedure => "procedure",
    Test => "test",
    Vaccination => "vaccination",
});

impl MetricType {
    /// Display order for the current-readings cards.
    pub const ALL: [MetricType; 5] = [
        MetricType::BloodPressure,
        MetricType::Weight,
        MetricType::BloodGlucose,
        MetricType::HeartRate,
        MetricType::Temperature,
    ];

    /// Unit applied when the entry form leaves the unit blank.
    pub fn default_unit(&self) -> &'static str {
        match self {
            Self::BloodPressure => "mmHg",
            Self::Weight => "lbs",
            Self::BloodGlucose => "mg/dL",
            Self::HeartRate => "bpm",
            Self::Temperature => "°F",
        }
    }

    /// Blood pressure readings stay free-form text ("120/80"); every other
    /// kind carries a numeric value.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::BloodPressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(AppointmentStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert!(AppointmentStatus::from_str("rescheduled").is_err());
        assert!(MetricType::from_str("Steps").is_err());
        assert!(EventKind::from_str("surgery-ish").is_err());
    }

    #[test]
    fn metric_kinds_know_their_units() {
        assert_eq!(MetricType::Weight.default_unit(), "lbs");
        assert_eq!(MetricType::BloodPressure.default_unit(), "mmHg");
    }

    #[test]
    fn only_blood_pressure_is_textual() {
        assert!(!MetricType::BloodPressure.is_numeric());
        assert!(MetricType::HeartRate.is_numeric());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&MetricType::BloodGlucose).unwrap();
        assert_eq!(json, "\"Blood Glucose\"");
        let back: MetricType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MetricType::BloodGlucose);
    }
}
