//! Canonical schema constants for structured logging
//!
//! These constants keep field names identical between the logging macros,
//! the test capture layer and anything that parses log output.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Unit of work sizes
pub const FIELD_STAGED_LEN: &str = "staged_len";
pub const FIELD_WRITTEN_LEN: &str = "written_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
