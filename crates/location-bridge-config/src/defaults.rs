use crate::logging::LogFormat;
use crate::policy::PendingConflictPolicy;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default handling of a second request while one of the same kind waits.
#[must_use]
pub fn default_pending_conflict() -> PendingConflictPolicy {
    PendingConflictPolicy::Reject
}
