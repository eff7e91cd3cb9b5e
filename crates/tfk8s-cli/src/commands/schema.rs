//! Schema command - show the attribute tree of a type

use console::style;
use miette::IntoDiagnostic;
use std::path::Path;
use tfk8s_core::{Attribute, AttributeMode};

use crate::error::Result;
use crate::util::load_catalog;

pub fn run(crds: &Path, type_name: &str, data_source: bool, json_output: bool) -> Result<()> {
    let catalog = load_catalog(crds)?;
    let resource_type = catalog.lookup(type_name, data_source)?;
    let schema = resource_type.schema();

    if json_output {
        let mut described = schema.describe();
        described["type"] = resource_type.name().into();
        described["flavor"] = resource_type.flavor.as_str().into();
        println!("{}", serde_json::to_string_pretty(&described).into_diagnostic()?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        style(resource_type.name()).cyan().bold(),
        style(format!("{}/{}", resource_type.api_version(), resource_type.kind())).dim(),
        resource_type.flavor
    );
    if let Some(description) = &schema.description {
        println!("  {}", style(first_line(description)).dim());
    }
    println!();

    for attribute in &schema.attributes {
        print_attribute(attribute, 1);
    }

    Ok(())
}

fn print_attribute(attribute: &Attribute, depth: usize) {
    let indent = "  ".repeat(depth);
    let mode = match attribute.mode {
        AttributeMode::Required => style(attribute.mode.as_str()).red(),
        AttributeMode::Optional => style(attribute.mode.as_str()).green(),
        _ => style(attribute.mode.as_str()).dim(),
    };

    println!(
        "{}{} {} {}",
        indent,
        style(&attribute.name).bold(),
        style(attribute.kind.type_name()).yellow(),
        mode
    );

    if let Some(description) = &attribute.description {
        println!("{}  {}", indent, style(first_line(description)).dim());
    }

    for nested in attribute.kind.nested_attributes().unwrap_or_default() {
        print_attribute(nested, depth + 1);
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("Spec of the certificate.\nMore text"), "Spec of the certificate.");
        assert_eq!(first_line(""), "");
    }
}
