//! hookwire: inspect and exercise extension points from the command line.
//!
//! Loads configuration, discovers module manifests, and then lists, applies,
//! or fires the requested point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use hookwire_core::config::AppConfig;
use hookwire_core::error::AppError;
use hookwire_plugin::HookManager;
use plugin_content::AuditModule;

/// Hook registry command-line interface.
#[derive(Debug, Parser)]
#[command(name = "hookwire", version, about = "Filter and action hook runner")]
struct Cli {
    /// Configuration file (TOML). Missing files fall back to defaults.
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Extra module directory to search (repeatable).
    #[arg(short = 'd', long = "modules-dir")]
    modules_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List extension points and their callbacks.
    Points,
    /// Run a JSON value through a filter point and print the result.
    Apply {
        /// Extension point name.
        point: String,
        /// Value as JSON; bare words are treated as strings.
        value: String,
    },
    /// Fire an action point.
    Fire {
        /// Extension point name.
        point: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(Some(cli.config.as_path())) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    let audit = Arc::new(AuditModule::default());
    let hooks = HookManager::from_config(&config)
        .directories(cli.modules_dirs)
        .loader(Arc::new(plugin_content::catalog(audit.clone())))
        .build();

    hooks.initialize().await?;
    tracing::debug!(modules = hooks.loaded_modules().len(), "Hooks ready");

    match cli.command {
        Command::Points => {
            let registry = hooks.registry();
            for point in registry.registered_points().await {
                let entries = registry.snapshot(&point).await.unwrap_or_default();
                let ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
                println!("{point}: {}", ids.join(", "));
            }
        }
        Command::Apply { point, value } => {
            let value = serde_json::from_str::<serde_json::Value>(&value)
                .unwrap_or_else(|_| serde_json::Value::String(value));
            let result = hooks.apply_filter(&point, value).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Fire { point } => {
            hooks.add_action(&point).await?;
            tracing::info!(point = %point, recorded = audit.recorded(), "Action fired");
        }
    }

    Ok(())
}
