//! Annotation map validation

use super::{ValidationRequest, Validator, map_elements};
use crate::diagnostics::Diagnostics;
use crate::k8s::is_qualified_name;

/// Checks annotation keys; annotation values are free text
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationValidator;

impl Validator for AnnotationValidator {
    fn description(&self) -> String {
        "keys must be qualified names".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let (Some(annotations), true) = map_elements(request, diags) else {
            return;
        };

        for key in annotations.keys() {
            for msg in is_qualified_name(key) {
                diags.add_error(
                    &request.path.with_key(key),
                    "Invalid Annotation Key",
                    format!("'{}' is not a valid annotation key: {}", key, msg),
                );
            }
        }
    }
}
