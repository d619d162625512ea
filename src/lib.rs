//! Carelog: data layer for a personal health-tracking dashboard.
//!
//! Four flat record collections — medications, appointments, health metrics,
//! medical history — fetched wholesale from a record store (seeded in-memory
//! mock or remote record service) and derived into per-screen slices by pure
//! functions: date-window membership, sort-and-slice, adherence percentage,
//! combined search/status filters.

pub mod appointments;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod filter;
pub mod history;
pub mod medications;
pub mod metrics;
pub mod models;
pub mod store;
pub mod view;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding application.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
