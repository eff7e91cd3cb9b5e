//! tfk8s Kube - CRD-driven resource types
//!
//! This crate turns CustomResourceDefinitions into typed resource types:
//!
//! - **CRD parsing** (`crd`): structured view of `apiextensions.k8s.io/v1` CRDs
//! - **Schema generation** (`generate`): attribute schemas per CRD version and flavor
//! - **Catalog** (`catalog`): CRDs loaded from disk, indexed by type name
//! - **Rendering** (`manifest`): validated configuration to objects and YAML
//! - **Structural checks** (`structural`): objects against the raw openAPIV3Schema
//! - **Live objects** (`client`, `resource`): read, Server-Side Apply and delete
//!
//! # Type names
//!
//! ```text
//! cert-manager.io / Certificate / v1
//!   k8s_cert_manager_io_certificate_v1            resource and data source
//!   k8s_cert_manager_io_certificate_v1_manifest   manifest data source
//! ```

pub mod catalog;
pub mod client;
pub mod crd;
pub mod error;
pub mod generate;
pub mod manifest;
pub mod mock;
pub mod naming;
pub mod resource;
pub mod structural;

#[cfg(test)]
mod fixtures;

pub use catalog::{Catalog, ResourceType};
pub use client::{ApplyOptions, DEFAULT_FIELD_MANAGER, KubeObjectClient, ObjectClient, ObjectRef};
pub use crd::{CrdParser, CrdSchema, CrdScope};
pub use error::{KubeError, Result};
pub use generate::{ResourceFlavor, SchemaGenerator};
pub use manifest::{RenderedObject, render_manifest, render_object};
pub use mock::MockObjectClient;
pub use resource::{apply_config, delete_object, read_object};
pub use structural::StructuralValidator;
