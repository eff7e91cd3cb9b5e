//! Port number validation

use super::{ValidationRequest, Validator};
use crate::diagnostics::Diagnostics;
use crate::k8s::is_valid_port_num;
use crate::value::Value;

/// Checks that an integer is a valid port (1-65535)
#[derive(Debug, Clone, Copy, Default)]
pub struct PortValidator;

impl Validator for PortValidator {
    fn description(&self) -> String {
        "value must be a valid port number (1-65535)".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Value::Int(port) = request.value else {
            return;
        };

        for msg in is_valid_port_num(*port) {
            diags.add_error(
                request.path,
                "Invalid Port",
                format!("{} is not a valid port: {}", port, msg),
            );
        }
    }
}
