//! Delete command - delete a live object

use console::style;
use std::path::Path;
use tfk8s_kube::{KubeObjectClient, delete_object};

use crate::error::Result;
use crate::util::load_catalog;

pub async fn run(crds: &Path, type_name: &str, name: &str, namespace: Option<&str>) -> Result<()> {
    let catalog = load_catalog(crds)?;
    let resource_type = catalog.lookup(type_name, false)?;

    let client = KubeObjectClient::try_default().await?;
    let deleted = delete_object(&client, &resource_type, name, namespace).await?;

    if deleted {
        println!("{} {} {} deleted", style("✓").green().bold(), resource_type.kind(), style(name).cyan());
    } else {
        println!(
            "{} {} {} was already gone",
            style("⚠").yellow(),
            resource_type.kind(),
            style(name).cyan()
        );
    }

    Ok(())
}
