//! Diagnostic rendering of records
//!
//! `TypeName(field=value, ...)`, tolerant of attributes that can no longer be
//! loaded. This is the only place a `Detached` error is swallowed. An
//! attribute not yet loaded from a live session renders as `NotLoaded`; any
//! other error is shown with its message.

use std::fmt;

use crate::errors::{ModelError, Result};

/// Placeholder for an attribute whose session has ended
pub const DETACHED_PLACEHOLDER: &str = "DetachedError";

/// Placeholder for an attribute that was never loaded
pub const NOT_LOADED_PLACEHOLDER: &str = "NotLoaded";

/// Render `instance` as `TypeName(field=value, ...)`
///
/// Each field is the result of reading that attribute. If none of them could
/// be read the output falls back to `TypeName at <address>`.
pub fn to_string<T: ?Sized>(
    type_name: &str,
    instance: &T,
    fields: &[(&str, Result<String>)],
) -> String {
    let mut parts = Vec::with_capacity(fields.len());
    let mut at_least_one_attached = false;

    for (key, field) in fields {
        match field {
            Ok(rendered) => {
                at_least_one_attached = true;
                parts.push(format!("{}={}", key, rendered));
            }
            Err(ModelError::Detached { .. }) => {
                parts.push(format!("{}={}", key, DETACHED_PLACEHOLDER));
            }
            Err(ModelError::NotLoaded { .. }) => {
                parts.push(format!("{}={}", key, NOT_LOADED_PLACEHOLDER));
            }
            Err(other) => {
                parts.push(format!("{}=<{}>", key, other));
            }
        }
    }

    if at_least_one_attached {
        format!("{}({})", type_name, parts.join(", "))
    } else {
        format!("{} at {:p}", type_name, instance)
    }
}

/// `None`, or the `Debug` form of the value
pub fn optional_debug<T: fmt::Debug>(value: &Option<T>) -> String {
    match value {
        Some(v) => format!("{:?}", v),
        None => "None".to_string(),
    }
}

/// `None`, or the `Display` form of the value
pub fn optional_display<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}
