//! Base64 validation

use base64::Engine as _;

use super::{ValidationRequest, Validator};
use crate::diagnostics::Diagnostics;
use crate::value::Value;

/// Checks that a string is standard, padded base64
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Validator;

impl Validator for Base64Validator {
    fn description(&self) -> String {
        "value must be base64 encoded".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Value::String(encoded) = request.value else {
            return;
        };

        if let Err(e) = base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes()) {
            diags.add_error(
                request.path,
                "Invalid Base64 Value",
                format!("'{}' is not a valid base64 encoded string: {}", encoded, e),
            );
        }
    }
}
