//! tfk8s Core - configuration values, diagnostics and validators
//!
//! This crate provides the foundational types used throughout tfk8s:
//! - `Value`: tri-state (null / unknown / concrete) configuration values
//! - `Diagnostics`: the accumulator every validator reports into
//! - `validators`: Kubernetes name, label, annotation, base64, date/time,
//!   port and pattern checks
//! - `Schema`: attribute schemas and the configuration validation pass
//! - `convert`: mapping between configuration/state and Kubernetes JSON

pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod k8s;
pub mod path;
pub mod schema;
pub mod validators;
pub mod value;

pub use convert::{config_to_json, json_to_state};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{CoreError, Result};
pub use path::{AttributePath, PathStep};
pub use schema::{Attribute, AttributeKind, AttributeMode, Schema, validate_config};
pub use validators::{ValidationRequest, Validator};
pub use value::{UNKNOWN_MARKER, Value};
