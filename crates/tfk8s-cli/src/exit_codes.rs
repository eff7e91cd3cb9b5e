//! Exit codes for tfk8s CLI
//!
//! Following conventions from sysexits.h and common CLI tools.

#![allow(dead_code)] // SUCCESS is implied by a normal exit

/// Success - operation completed successfully
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - configuration does not match the type schema
pub const VALIDATION_ERROR: i32 = 2;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Kubernetes error - API request failed or object not found
pub const KUBE_ERROR: i32 = 6;
