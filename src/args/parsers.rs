use std::time::Duration;

use reqwest::Method;

use crate::config::parse_duration_value;
use crate::error::ValidationError;

/// Parses `ms`/`s`/`m`/`h` durations; a bare number means seconds.
///
/// # Errors
///
/// Returns a message describing the malformed or zero duration.
pub fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration_value(s)
}

/// # Errors
///
/// Returns [`ValidationError::InvalidMethod`] for anything but the common
/// HTTP verbs.
pub fn parse_method(s: &str) -> Result<Method, ValidationError> {
    match s.trim().to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        _ => Err(ValidationError::InvalidMethod {
            value: s.to_owned(),
        }),
    }
}

/// # Errors
///
/// Returns [`ValidationError::InvalidBoolean`] for unrecognised values.
pub fn parse_bool_env(s: &str) -> Result<bool, ValidationError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        }),
    }
}
