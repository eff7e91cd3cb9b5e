//! Validate command - validate a configuration against a type schema

use console::style;
use miette::IntoDiagnostic;
use std::path::Path;
use tfk8s_core::{Diagnostics, validate_config};
use tfk8s_kube::{ResourceType, StructuralValidator, render_object};

use crate::display::DiagnosticsReport;
use crate::error::Result;
use crate::exit_codes;
use crate::util::{load_catalog, load_config};

pub fn run(
    crds: &Path,
    type_name: &str,
    config_path: &Path,
    strict_schema: bool,
    json_output: bool,
) -> Result<()> {
    let catalog = load_catalog(crds)?;
    let resource_type = catalog.lookup(type_name, false)?;
    let config = load_config(config_path)?;

    if !json_output {
        println!(
            "{} Validating {} against {}",
            style("→").blue(),
            config_path.display(),
            style(resource_type.name()).cyan()
        );
    }

    let mut diagnostics = validate_config(&resource_type.schema(), &config);

    if strict_schema && !diagnostics.has_errors() {
        diagnostics.extend(structural_check(&resource_type, &config)?);
        if !json_output {
            println!("  {} Checked against openAPIV3Schema", style("→").blue());
        }
    }

    if json_output {
        let output = serde_json::json!({
            "valid": !diagnostics.has_errors(),
            "type": resource_type.name(),
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
            "diagnostics": diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        let source = config_path.display().to_string();
        let report = DiagnosticsReport::new(&source, &diagnostics);
        report.display();
        println!();
        report.print_summary();
    }

    if diagnostics.has_errors() {
        std::process::exit(exit_codes::VALIDATION_ERROR);
    }

    Ok(())
}

/// Render the object and check it the way the API server would
fn structural_check(
    resource_type: &ResourceType<'_>,
    config: &tfk8s_core::Value,
) -> Result<Diagnostics> {
    let Some(validator) = StructuralValidator::new(resource_type.version)? else {
        tracing::debug!(type_name = %resource_type.name(), "version has no schema, skipping structural check");
        return Ok(Diagnostics::new());
    };

    let rendered = render_object(resource_type, config)?;
    Ok(validator.validate(&rendered.object))
}
