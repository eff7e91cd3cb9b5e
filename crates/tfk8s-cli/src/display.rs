//! Display formatting for CLI output
//!
//! Diagnostics are grouped by attribute path, errors before warnings, the
//! same way for `validate`, `render` and `apply`.

use console::style;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tfk8s_core::{Diagnostic, Diagnostics, Severity};

/// Grouped diagnostics for one configuration file
pub struct DiagnosticsReport<'a> {
    source: &'a str,
    diagnostics: &'a Diagnostics,
}

impl<'a> DiagnosticsReport<'a> {
    pub fn new(source: &'a str, diagnostics: &'a Diagnostics) -> Self {
        Self {
            source,
            diagnostics,
        }
    }

    /// Display diagnostics on stdout
    pub fn display(&self) {
        let _ = self.write_to(&mut io::stdout());
    }

    /// Write diagnostics grouped by path
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let mut by_path: BTreeMap<String, Vec<&Diagnostic>> = BTreeMap::new();
        for diagnostic in self.diagnostics.iter() {
            by_path
                .entry(diagnostic.path.to_string())
                .or_default()
                .push(diagnostic);
        }

        writeln!(w)?;
        writeln!(w, "{}", style(self.source).cyan().bold())?;

        for (path, mut items) in by_path {
            items.sort_by(|a, b| b.severity.cmp(&a.severity));

            for diagnostic in items {
                let icon = match diagnostic.severity {
                    Severity::Error => style("✗").red(),
                    Severity::Warning => style("⚠").yellow(),
                };
                writeln!(
                    w,
                    "  {} {} at {}",
                    icon,
                    diagnostic.summary,
                    style(&path).dim()
                )?;
                if !diagnostic.detail.is_empty() {
                    writeln!(w, "    {}", diagnostic.detail)?;
                }
            }
        }

        Ok(())
    }

    /// Print summary line
    pub fn print_summary(&self) {
        let errors = self.diagnostics.error_count();
        let warnings = self.diagnostics.warning_count();

        if errors > 0 {
            println!(
                "{} Validation failed: {}, {}",
                style("✗").red().bold(),
                pluralize(errors, "error", "errors"),
                pluralize(warnings, "warning", "warnings")
            );
        } else if warnings > 0 {
            println!(
                "{} Validation passed with {}",
                style("⚠").yellow().bold(),
                pluralize(warnings, "warning", "warnings")
            );
        } else {
            println!("{} Validation passed!", style("✓").green().bold());
        }
    }
}

/// Format count with proper pluralization
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
