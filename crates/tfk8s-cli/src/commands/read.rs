//! Read command - show the state of a live object

use miette::IntoDiagnostic;
use std::path::Path;
use tfk8s_kube::{KubeObjectClient, read_object};

use crate::error::{CliError, Result};
use crate::util::load_catalog;

pub async fn run(crds: &Path, type_name: &str, name: &str, namespace: Option<&str>) -> Result<()> {
    let catalog = load_catalog(crds)?;
    let resource_type = catalog.lookup(type_name, true)?;

    let client = KubeObjectClient::try_default().await?;
    let state = read_object(&client, &resource_type, name, namespace).await?;

    let json = state
        .to_json()
        .ok_or_else(|| CliError::other("object state contains unknown values"))?;
    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);

    Ok(())
}
