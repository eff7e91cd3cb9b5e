//! tfk8s Fetch - download upstream CRD definitions
//!
//! Reads a list of sources (GitHub/GitLab links or plain URLs), downloads
//! them concurrently, keeps the CustomResourceDefinitions they contain and
//! writes one file per CRD to `<out>/<group>/<plural>.yaml`.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod http;
pub mod source;
pub mod split;

pub use config::{Source, SourcesConfig};
pub use error::{FetchError, Result};
pub use extract::{ExtractedCrd, extract_crds};
pub use fetcher::{DEFAULT_CONCURRENCY, FailedSource, FetchReport, Fetcher, WriteOutcome};
pub use source::normalize_url;
pub use split::split_documents;
