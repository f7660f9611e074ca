use std::net::SocketAddr;

use crate::engine::EngineError;

// ── Booking traffic ─────────────────────────────────────────────

/// Counter: booking attempts. Labels: status.
pub const BOOKINGS_TOTAL: &str = "spacebook_bookings_total";

/// Counter: cancellation attempts. Labels: status.
pub const CANCELLATIONS_TOTAL: &str = "spacebook_cancellations_total";

/// Counter: hours reserved by successful bookings.
pub const HOURS_BOOKED_TOTAL: &str = "spacebook_hours_booked_total";

// ── Registry and storage ────────────────────────────────────────

/// Gauge: live spaces in the registry.
pub const SPACES_ACTIVE: &str = "spacebook_spaces_active";

/// Histogram: snapshot save duration in seconds.
pub const SNAPSHOT_SAVE_DURATION_SECONDS: &str = "spacebook_snapshot_save_duration_seconds";

/// Gauge: size of the last snapshot written, in bytes.
pub const SNAPSHOT_BYTES: &str = "spacebook_snapshot_bytes";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map an operation outcome to a short `status` label.
pub fn status_label<T>(result: &Result<T, EngineError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(EngineError::NotFound(_)) => "not_found",
        Err(EngineError::InvalidRange { .. }) => "invalid_range",
        Err(EngineError::Conflict { .. }) => "conflict",
        Err(EngineError::NotReserved { .. }) => "not_reserved",
        Err(EngineError::LimitExceeded(_)) => "limit_exceeded",
        Err(_) => "error",
    }
}
