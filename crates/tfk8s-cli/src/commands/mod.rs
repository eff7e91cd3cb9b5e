//! CLI commands

// Offline commands
pub mod fetch;
pub mod render;
pub mod schema;
pub mod types;
pub mod validate;

// Cluster commands
pub mod apply;
pub mod delete;
pub mod read;
