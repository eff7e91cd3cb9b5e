//! Label map validation

use super::{ValidationRequest, Validator, map_elements};
use crate::diagnostics::Diagnostics;
use crate::k8s::{is_qualified_name, is_valid_label_value};
use crate::value::Value;

/// Checks label keys (qualified names) and label values
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelValidator;

impl Validator for LabelValidator {
    fn description(&self) -> String {
        "keys must be qualified names and values must be valid label values".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let (Some(labels), true) = map_elements(request, diags) else {
            return;
        };

        for (key, value) in labels {
            let path = request.path.with_key(key);

            for msg in is_qualified_name(key) {
                diags.add_error(
                    &path,
                    "Invalid Label Key",
                    format!("'{}' is not a valid label key: {}", key, msg),
                );
            }

            match value {
                Value::Null | Value::Unknown => {}
                Value::String(label) => {
                    for msg in is_valid_label_value(label) {
                        diags.add_error(
                            &path,
                            "Invalid Label Value",
                            format!("'{}' is not a valid label value: {}", label, msg),
                        );
                    }
                }
                other => diags.add_error(
                    &path,
                    "Invalid Label Value",
                    format!(
                        "expected string value for label '{}', got {}",
                        key,
                        other.type_name()
                    ),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::AttributePath;

    fn check(value: Value) -> Diagnostics {
        let path = AttributePath::attribute("metadata").with_attribute("labels");
        let mut diags = Diagnostics::new();
        LabelValidator.validate(&ValidationRequest::new(&path, &value), &mut diags);
        diags
    }

    #[test]
    fn test_skips_null_and_unknown() {
        assert!(check(Value::Null).is_empty());
        assert!(check(Value::Unknown).is_empty());
    }

    #[test]
    fn test_valid() {
        let labels = [("app.kubernetes.io/name", "mysql")].into_iter().collect();
        assert!(check(labels).is_empty());
    }

    #[test]
    fn test_invalid_key() {
        let labels = [("/some/value", "value")].into_iter().collect();
        let diags = check(labels);
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.iter().next().unwrap().summary, "Invalid Label Key");
    }

    #[test]
    fn test_invalid_value() {
        let labels = [("app.kubernetes.io/name", "/")].into_iter().collect();
        let diags = check(labels);
        assert_eq!(diags.error_count(), 1);

        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Invalid Label Value");
        assert_eq!(
            diag.path.to_string(),
            r#"metadata.labels["app.kubernetes.io/name"]"#
        );
    }

    #[test]
    fn test_non_string_value() {
        let labels: Value = [("replicas", Value::Int(3))].into_iter().collect();
        let diags = check(labels);
        assert_eq!(diags.error_count(), 1);
        assert!(diags.iter().next().unwrap().detail.contains("expected string"));
    }

    #[test]
    fn test_unknown_entry_value_skipped() {
        let labels: Value = [("app", Value::Unknown)].into_iter().collect();
        assert!(check(labels).is_empty());
    }

    #[test]
    fn test_accumulates_across_entries() {
        let labels = [("/a/b", "ok"), ("good", "/"), ("/c/d", "-bad-")]
            .into_iter()
            .collect();
        assert_eq!(check(labels).error_count(), 4);
    }
}
