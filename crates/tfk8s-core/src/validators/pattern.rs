//! Regular expression validation for string and int-or-string attributes

use regex::Regex;

use super::{ValidationRequest, Validator};
use crate::diagnostics::Diagnostics;
use crate::error::{CoreError, Result};
use crate::value::Value;

/// Checks strings against a pattern
///
/// Numeric values pass unchecked, following the Kubernetes int-or-string
/// convention where patterns only constrain the string form. The empty
/// string is treated as unset.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
}

impl RegexValidator {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }

    /// Compile a pattern
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| CoreError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(regex))
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Validator for RegexValidator {
    fn description(&self) -> String {
        format!("string values must match '{}'", self.regex.as_str())
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        // Numbers (and anything else) are accepted without matching
        let Value::String(value) = request.value else {
            return;
        };
        if value.is_empty() {
            return;
        }

        if !self.regex.is_match(value) {
            diags.add_error(
                request.path,
                "Invalid Attribute Value Match",
                format!(
                    "'{}' does not match the pattern '{}'",
                    value,
                    self.regex.as_str()
                ),
            );
        }
    }
}
