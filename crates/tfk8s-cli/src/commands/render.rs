//! Render command - print or write the YAML manifest of a configuration

use console::style;
use std::path::Path;
use tfk8s_kube::render_object;

use crate::display::DiagnosticsReport;
use crate::error::Result;
use crate::util::{load_catalog, load_config};

pub fn run(crds: &Path, type_name: &str, config_path: &Path, output: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(crds)?;
    let resource_type = catalog.lookup(type_name, false)?;
    let config = load_config(config_path)?;

    let rendered = render_object(&resource_type, &config)?;
    let yaml = rendered.to_yaml()?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &yaml)?;

            let source = config_path.display().to_string();
            DiagnosticsReport::new(&source, &rendered.warnings).display();
            println!(
                "{} Wrote {} {} to {}",
                style("✓").green(),
                resource_type.kind(),
                rendered.name().unwrap_or_default(),
                path.display()
            );
        }
        None => {
            for warning in rendered.warnings.iter() {
                eprintln!("{} {}", style("⚠").yellow(), warning);
            }
            print!("{}", yaml);
        }
    }

    Ok(())
}
