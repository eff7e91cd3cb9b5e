//! Kubernetes object name validation

use super::{ValidationRequest, Validator};
use crate::diagnostics::Diagnostics;
use crate::k8s::is_dns1123_subdomain;
use crate::value::Value;

/// Checks that a string is a valid object name (DNS-1123 subdomain)
#[derive(Debug, Clone, Copy, Default)]
pub struct NameValidator;

impl Validator for NameValidator {
    fn description(&self) -> String {
        "value must be a valid Kubernetes object name (DNS-1123 subdomain)".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Value::String(name) = request.value else {
            return;
        };

        for msg in is_dns1123_subdomain(name) {
            diags.add_error(
                request.path,
                "Invalid Attribute Value",
                format!("'{}' is not a valid name: {}", name, msg),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::AttributePath;

    fn check(value: Value) -> Diagnostics {
        let path = AttributePath::attribute("metadata").with_attribute("name");
        let mut diags = Diagnostics::new();
        NameValidator.validate(&ValidationRequest::new(&path, &value), &mut diags);
        diags
    }

    #[test]
    fn test_skips_null_and_unknown() {
        assert!(check(Value::Null).is_empty());
        assert!(check(Value::Unknown).is_empty());
    }

    #[test]
    fn test_valid() {
        assert!(check(Value::from("ok")).is_empty());
        assert!(check(Value::from("cert-manager.io")).is_empty());
    }

    #[test]
    fn test_invalid() {
        let diags = check(Value::from("ok/or/not"));
        assert_eq!(diags.error_count(), 1);

        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.path.to_string(), "metadata.name");
        assert!(diag.detail.contains("'ok/or/not'"));
    }

    #[test]
    fn test_one_diagnostic_per_rule() {
        let diags = check(Value::from("X".repeat(300)));
        assert_eq!(diags.error_count(), 2);
    }
}
