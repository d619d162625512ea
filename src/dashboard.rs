//! Dashboard aggregation across the three collections shown on the overview.
//!
//! The three fetches run concurrently and are awaited jointly; any failure
//! aborts the joint wait and no partial dashboard is produced.

use chrono::NaiveDateTime;

use crate::appointments::upcoming_appointments;
use crate::config;
use crate::medications::{adherence, todays_medications, AdherenceStats};
use crate::metrics::recent_metrics;
use crate::models::{Appointment, HealthMetric, Medication};
use crate::store::{RecordStore, StoreError};
use crate::view::LoadState;

/// Everything the overview renders from one joint fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub todays_medications: Vec<Medication>,
    pub adherence: AdherenceStats,
    pub upcoming_appointments: Vec<Appointment>,
    pub recent_metrics: Vec<HealthMetric>,
}

/// Fetches all three collections concurrently and derives the overview
/// slices: today's medications with adherence, the next two appointments,
/// and the three latest readings.
pub async fn load_dashboard<M, A, H>(
    medications: &M,
    appointments: &A,
    metrics: &H,
    now: NaiveDateTime,
) -> Result<DashboardData, StoreError>
where
    M: RecordStore<Medication>,
    A: RecordStore<Appointment>,
    H: RecordStore<HealthMetric>,
{
    let (all_medications, all_appointments, all_metrics) = tokio::try_join!(
        medications.get_all(),
        appointments.get_all(),
        metrics.get_all(),
    )?;

    let today = now.date();
    let todays = todays_medications(&all_medications, today);
    let mut upcoming = upcoming_appointments(&all_appointments, now);
    upcoming.truncate(config::DASHBOARD_UPCOMING_LIMIT);

    Ok(DashboardData {
        adherence: adherence(&all_medications, today),
        todays_medications: todays,
        upcoming_appointments: upcoming,
        recent_metrics: recent_metrics(&all_metrics, config::DASHBOARD_METRICS_LIMIT),
    })
}

/// The overview screen: last loaded dashboard plus its load state. A failed
/// refresh keeps the previous data on screen.
pub struct DashboardView<M, A, H>
where
    M: RecordStore<Medication>,
    A: RecordStore<Appointment>,
    H: RecordStore<HealthMetric>,
{
    medications: M,
    appointments: A,
    metrics: H,
    pub data: Option<DashboardData>,
    pub state: LoadState,
}

impl<M, A, H> DashboardView<M, A, H>
where
    M: RecordStore<Medication>,
    A: RecordStore<Appointment>,
    H: RecordStore<HealthMetric>,
{
    pub fn new(medications: M, appointments: A, metrics: H) -> Self {
        Self {
            medications,
            appointments,
            metrics,
            data: None,
            state: LoadState::default(),
        }
    }

    pub async fn refresh(&mut self, now: NaiveDateTime) {
        self.state = LoadState::Loading;
        match load_dashboard(&self.medications, &self.appointments, &self.metrics, now).await {
            Ok(data) => {
                tracing::debug!(
                    medications = data.todays_medications.len(),
                    appointments = data.upcoming_appointments.len(),
                    metrics = data.recent_metrics.len(),
                    "dashboard refreshed"
                );
                self.data = Some(data);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to refresh dashboard");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }
}
