//! tfk8s CLI - typed Kubernetes custom resources generated from CRDs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tfk8s_kube::{ApplyOptions, DEFAULT_FIELD_MANAGER};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;
mod error;
mod exit_codes;
mod util;

#[derive(Parser)]
#[command(name = "tfk8s")]
#[command(author = "tfk8s Contributors")]
#[command(version)]
#[command(about = "Typed Kubernetes custom resources generated from CRDs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download CRDs from the configured sources
    Fetch {
        /// Sources file (default: ~/.config/tfk8s/sources.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "crds")]
        output: PathBuf,

        /// Concurrent downloads
        #[arg(short, long, default_value_t = tfk8s_fetch::DEFAULT_CONCURRENCY)]
        jobs: usize,
    },

    /// List the types generated from CRDs
    Types {
        /// CRD file or directory
        crds: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the attribute schema of a type
    Schema {
        /// CRD file or directory
        crds: PathBuf,

        /// Type name (e.g. k8s_cert_manager_io_certificate_v1)
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Show the data source schema
        #[arg(long)]
        data_source: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a configuration against a type
    Validate {
        /// CRD file or directory
        crds: PathBuf,

        /// Type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Configuration file (YAML or JSON)
        config: PathBuf,

        /// Also check the rendered object against the CRD openAPIV3Schema
        #[arg(long)]
        strict_schema: bool,

        /// Output validation results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a configuration to a YAML manifest
    Render {
        /// CRD file or directory
        crds: PathBuf,

        /// Type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Configuration file (YAML or JSON)
        config: PathBuf,

        /// Output file (if not set, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read a live object as data source state
    Read {
        /// CRD file or directory
        crds: PathBuf,

        /// Type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Object name
        #[arg(long)]
        name: String,

        /// Object namespace (namespaced types only)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Apply a configuration with Server-Side Apply
    Apply {
        /// CRD file or directory
        crds: PathBuf,

        /// Type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Configuration file (YAML or JSON)
        config: PathBuf,

        /// Field manager name
        #[arg(long, default_value = DEFAULT_FIELD_MANAGER)]
        field_manager: String,

        /// Take ownership of fields managed by others
        #[arg(long)]
        force_conflicts: bool,

        /// Validate on the server without persisting
        #[arg(long)]
        dry_run: bool,

        /// Output the resulting state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a live object
    Delete {
        /// CRD file or directory
        crds: PathBuf,

        /// Type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Object name
        #[arg(long)]
        name: String,

        /// Object namespace (namespaced types only)
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli.command).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(command: Commands) -> error::Result<()> {
    match command {
        Commands::Fetch {
            config,
            output,
            jobs,
        } => commands::fetch::run(config.as_deref(), &output, jobs).await,

        Commands::Types { crds, json } => commands::types::run(&crds, json),

        Commands::Schema {
            crds,
            type_name,
            data_source,
            json,
        } => commands::schema::run(&crds, &type_name, data_source, json),

        Commands::Validate {
            crds,
            type_name,
            config,
            strict_schema,
            json,
        } => commands::validate::run(&crds, &type_name, &config, strict_schema, json),

        Commands::Render {
            crds,
            type_name,
            config,
            output,
        } => commands::render::run(&crds, &type_name, &config, output.as_deref()),

        Commands::Read {
            crds,
            type_name,
            name,
            namespace,
        } => commands::read::run(&crds, &type_name, &name, namespace.as_deref()).await,

        Commands::Apply {
            crds,
            type_name,
            config,
            field_manager,
            force_conflicts,
            dry_run,
            json,
        } => {
            let options = ApplyOptions {
                field_manager,
                force_conflicts,
                dry_run,
            };
            commands::apply::run(&crds, &type_name, &config, options, json).await
        }

        Commands::Delete {
            crds,
            type_name,
            name,
            namespace,
        } => commands::delete::run(&crds, &type_name, &name, namespace.as_deref()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_apply_defaults() {
        let cli = Cli::parse_from(["tfk8s", "apply", "crds", "k8s_x_y_v1", "cert.yaml"]);
        match cli.command {
            Commands::Apply {
                field_manager,
                force_conflicts,
                dry_run,
                ..
            } => {
                assert_eq!(field_manager, "tfk8s");
                assert!(!force_conflicts);
                assert!(!dry_run);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::parse_from(["tfk8s", "fetch"]);
        match cli.command {
            Commands::Fetch { config, output, jobs } => {
                assert!(config.is_none());
                assert_eq!(output, PathBuf::from("crds"));
                assert_eq!(jobs, 4);
            }
            _ => panic!("expected fetch"),
        }
    }
}
