//! Fixed knobs for the dashboard data layer.

/// Simulated latency for mock-store reads (milliseconds).
pub const MOCK_READ_LATENCY_MS: u64 = 250;

/// Simulated latency for mock-store writes (milliseconds).
pub const MOCK_WRITE_LATENCY_MS: u64 = 350;

/// Upcoming appointments shown on the overview screen.
pub const DASHBOARD_UPCOMING_LIMIT: usize = 2;

/// Recent metrics shown on the overview screen.
pub const DASHBOARD_METRICS_LIMIT: usize = 3;

/// Default page size for "recent metrics" reads.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// A refill due within this many days (or already overdue) flags the card.
pub const REFILL_THRESHOLD_DAYS: i64 = 7;

/// Hour of day after which an untaken medication shows as overdue.
/// A placeholder heuristic carried over from the product; not tied to any
/// per-dose schedule.
pub const OVERDUE_CUTOFF_HOUR: u32 = 10;

/// Default record-service endpoint for the remote store.
pub const DEFAULT_REMOTE_BASE_URL: &str = "http://localhost:4000";

/// Default log filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,carelog=debug"
}
