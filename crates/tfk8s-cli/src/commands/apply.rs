//! Apply command - Server-Side Apply a configuration

use console::style;
use miette::IntoDiagnostic;
use std::path::Path;
use tfk8s_kube::{ApplyOptions, KubeObjectClient, apply_config};

use crate::error::Result;
use crate::util::{load_catalog, load_config};

pub async fn run(
    crds: &Path,
    type_name: &str,
    config_path: &Path,
    options: ApplyOptions,
    json_output: bool,
) -> Result<()> {
    let catalog = load_catalog(crds)?;
    let resource_type = catalog.lookup(type_name, false)?;
    let config = load_config(config_path)?;

    let client = KubeObjectClient::try_default().await?;
    let state = apply_config(&client, &resource_type, &config, &options).await?;

    if json_output {
        let json = state.to_json().unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        return Ok(());
    }

    let id = state.get("id").and_then(|v| v.as_str()).unwrap_or_default();
    let suffix = if options.dry_run {
        format!(" {}", style("(dry run)").yellow())
    } else {
        String::new()
    };
    println!(
        "{} {} {} applied{}",
        style("✓").green().bold(),
        resource_type.kind(),
        style(id).cyan(),
        suffix
    );

    Ok(())
}
