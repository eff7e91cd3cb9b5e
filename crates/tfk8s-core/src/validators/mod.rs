//! Attribute validators
//!
//! Validators are attached to schema attributes and run once per attribute
//! during the configuration validation pass. They share a few rules:
//!
//! - null and unknown values are always valid,
//! - failures are reported by appending to [`Diagnostics`], never by
//!   returning an error or panicking,
//! - every violation is reported; nothing short-circuits after the first.

mod annotations;
mod datetime;
mod encoding;
mod labels;
mod name;
mod pattern;
mod port;

pub use annotations::AnnotationValidator;
pub use datetime::DateTimeValidator;
pub use encoding::Base64Validator;
pub use labels::LabelValidator;
pub use name::NameValidator;
pub use pattern::RegexValidator;
pub use port::PortValidator;

use indexmap::IndexMap;
use std::fmt::Debug;

use crate::diagnostics::Diagnostics;
use crate::path::AttributePath;
use crate::value::Value;

/// The value under validation and where it lives
#[derive(Debug, Clone, Copy)]
pub struct ValidationRequest<'a> {
    pub path: &'a AttributePath,
    pub value: &'a Value,
}

impl<'a> ValidationRequest<'a> {
    pub fn new(path: &'a AttributePath, value: &'a Value) -> Self {
        Self { path, value }
    }
}

/// A single attribute check
pub trait Validator: Debug + Send + Sync {
    /// Short description of what the validator enforces
    fn description(&self) -> String;

    /// Check the value, appending any findings to `diags`
    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics);
}

/// Extract the entries of a map value
///
/// Returns `(None, false)` when the value is null or unknown, meaning
/// validation should be skipped. A concrete value that is not a map is
/// reported and also yields `(None, false)`.
pub fn map_elements<'a>(
    request: &ValidationRequest<'a>,
    diags: &mut Diagnostics,
) -> (Option<&'a IndexMap<String, Value>>, bool) {
    match request.value {
        Value::Null | Value::Unknown => (None, false),
        Value::Map(entries) => (Some(entries), true),
        other => {
            diags.add_error(
                request.path,
                "Invalid Attribute Type",
                format!("Expected a map of values, got {}", other.type_name()),
            );
            (None, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_elements_skips_null_and_unknown() {
        let path = AttributePath::attribute("labels");
        let mut diags = Diagnostics::new();

        let (entries, ok) = map_elements(&ValidationRequest::new(&path, &Value::Null), &mut diags);
        assert!(entries.is_none());
        assert!(!ok);

        let (entries, ok) =
            map_elements(&ValidationRequest::new(&path, &Value::Unknown), &mut diags);
        assert!(entries.is_none());
        assert!(!ok);

        assert!(diags.is_empty());
    }

    #[test]
    fn test_map_elements_concrete() {
        let path = AttributePath::attribute("labels");
        let value: Value = [("app", "web")].into_iter().collect();
        let mut diags = Diagnostics::new();

        let (entries, ok) = map_elements(&ValidationRequest::new(&path, &value), &mut diags);
        assert!(ok);
        assert_eq!(entries.unwrap().len(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_map_elements_fails_closed() {
        let path = AttributePath::attribute("labels");
        let value = Value::from("not a map");
        let mut diags = Diagnostics::new();

        let (entries, ok) = map_elements(&ValidationRequest::new(&path, &value), &mut diags);
        assert!(entries.is_none());
        assert!(!ok);
        assert_eq!(diags.error_count(), 1);
    }
}
