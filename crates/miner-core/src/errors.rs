//! Error type constants for metrics and logging.
//!
//! These constants provide consistent error classification across all crates.

/// Entity lookup failed.
pub const ERROR_NOT_FOUND: &str = "not_found";
/// Missing or invalid caller identity.
pub const ERROR_UNAUTHORIZED: &str = "unauthorized";
/// Authenticated but lacking privilege.
pub const ERROR_FORBIDDEN: &str = "forbidden";
/// Malformed or missing input.
pub const ERROR_VALIDATION: &str = "validation";
/// Business rule rejected the operation (limits, eligibility, minimums).
pub const ERROR_BUSINESS_RULE: &str = "business_rule";
/// Underlying key-value store operation failed.
pub const ERROR_STORE: &str = "store";
