//! Date and time validation

use chrono::{DateTime, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ValidationRequest, Validator};
use crate::diagnostics::Diagnostics;
use crate::value::Value;

// chrono accepts single-digit fields; layouts are zero-padded
static TIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("static pattern"));
static TIME_OFFSET_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$").expect("static pattern"));
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"));

/// Accepted layouts, tried in order
#[derive(Debug, Clone, Copy)]
enum Layout {
    TimeOnly,
    TimeWithOffset,
    DateOnly,
    /// RFC 3339, with or without fractional seconds
    Rfc3339,
}

const LAYOUTS: [Layout; 4] = [
    Layout::TimeOnly,
    Layout::TimeWithOffset,
    Layout::DateOnly,
    Layout::Rfc3339,
];

impl Layout {
    fn name(self) -> &'static str {
        match self {
            Layout::TimeOnly => "HH:MM:SS",
            Layout::TimeWithOffset => "HH:MM:SS+hh:mm",
            Layout::DateOnly => "YYYY-MM-DD",
            Layout::Rfc3339 => "RFC 3339",
        }
    }

    fn parses(self, value: &str) -> bool {
        match self {
            Layout::TimeOnly => {
                TIME_SHAPE.is_match(value) && NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok()
            }
            // Anchor the time on an arbitrary date so the RFC 3339 offset rules apply
            Layout::TimeWithOffset => {
                TIME_OFFSET_SHAPE.is_match(value)
                    && DateTime::parse_from_rfc3339(&format!("1970-01-01T{}", value)).is_ok()
            }
            Layout::DateOnly => {
                DATE_SHAPE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            }
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(value).is_ok(),
        }
    }
}

/// Checks that a string is a time, a date, or an RFC 3339 timestamp
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeValidator;

impl DateTimeValidator {
    /// Whether the value matches any accepted layout
    pub fn accepts(value: &str) -> bool {
        LAYOUTS.iter().any(|layout| layout.parses(value))
    }
}

impl Validator for DateTimeValidator {
    fn description(&self) -> String {
        let layouts: Vec<&str> = LAYOUTS.iter().map(|layout| layout.name()).collect();
        format!("value must match one of: {}", layouts.join(", "))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Value::String(value) = request.value else {
            return;
        };

        if !Self::accepts(value) {
            diags.add_error(
                request.path,
                "Invalid Date/Time Value",
                format!("'{}' is not a valid date/time value; {}", value, self.description()),
            );
        }
    }
}
