//! Telemetry metric name constants.
//!
//! Centralised metric names for comanda operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `comanda_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `endpoint` — API operation (e.g. "get_orders", "cancel_order")
//! - `status` — outcome: "ok" or "error"
//! - `freshness` — cache-hit kind: "fresh" or "stale"

/// Total HTTP requests issued to the dashboard API.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "comanda_requests_total";

/// Total query-cache hits.
///
/// Labels: `freshness` ("fresh" | "stale").
pub const CACHE_HITS_TOTAL: &str = "comanda_cache_hits_total";

/// Total query-cache misses.
pub const CACHE_MISSES_TOTAL: &str = "comanda_cache_misses_total";

/// Total fetches settled, whether awaited or background revalidations.
///
/// Labels: `status` ("ok" | "error").
pub const FETCHES_TOTAL: &str = "comanda_fetches_total";

/// Total queries that attached to an already in-flight fetch instead of
/// issuing their own.
pub const FETCHES_COALESCED_TOTAL: &str = "comanda_fetches_coalesced_total";

/// Total optimistic mutations applied (speculative cache writes issued).
pub const OPTIMISTIC_APPLIES_TOTAL: &str = "comanda_optimistic_applies_total";

/// Total optimistic mutations rolled back after a failed remote write.
pub const ROLLBACKS_TOTAL: &str = "comanda_rollbacks_total";
