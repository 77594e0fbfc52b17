//! pybridge: bridge between the app editor and its generated Python
//! controllers
//!
//! The editor runs an IPC server on localhost and pushes commands to
//! registered clients. `pybridge connect` registers this process and relays
//! those commands to local subprocesses and pipenv; the other subcommands
//! run the same operations directly from the terminal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pb_core::config::{self, BridgeConfig};
use pybridge::commands;

#[derive(Parser)]
#[command(name = "pybridge")]
#[command(version, about = "Bridge between the app editor and local Python controllers")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the editor's IPC server and relay commands until stopped
    #[command(alias = "c")]
    Connect {
        /// IPC port the editor listens on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Application root directory (overrides config)
        #[arg(short, long)]
        app_dir: Option<PathBuf>,

        /// Client name to register under (overrides config)
        #[arg(short, long)]
        name: Option<String>,

        /// Python interpreter for controller subprocesses (overrides config)
        #[arg(long)]
        python: Option<String>,
    },

    /// Run the Python dependency build once and exit
    Build {
        /// Application root directory (overrides config)
        #[arg(short, long)]
        app_dir: Option<PathBuf>,

        /// Python interpreter used to detect the environment (overrides config)
        #[arg(long)]
        python: Option<String>,
    },

    /// Compute a page's initial state and print it to stdout
    Compute {
        /// Page route, e.g. /home
        route: String,

        /// Page state JSON handed to the controller
        #[arg(short, long, default_value = "{}")]
        state: String,

        /// Application root directory (overrides config)
        #[arg(short, long)]
        app_dir: Option<PathBuf>,

        /// Python interpreter for the controller subprocess (overrides config)
        #[arg(long)]
        python: Option<String>,
    },

    /// Show the dependencies declared in the application Pipfile
    Deps {
        /// Application root directory (overrides config)
        #[arg(short, long)]
        app_dir: Option<PathBuf>,
    },

    /// Check the local environment and the editor's IPC server
    #[command(alias = "st")]
    Status {
        /// IPC port the editor listens on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Show the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to info so the connection lifecycle of a long-running
    // `connect` stays visible without flags
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let command = match cli.command {
        Some(command) => command,
        None => {
            // Bare invocation: quick status check
            let config = load_bridge_config(cli.config.as_ref(), None, None, None, None)?;
            commands::status_command(&config).await?;
            return Ok(());
        }
    };

    match command {
        Commands::Connect {
            port,
            app_dir,
            name,
            python,
        } => {
            let config = load_bridge_config(cli.config.as_ref(), port, app_dir, name, python)?;
            commands::connect_command(config).await?;
        }
        Commands::Build { app_dir, python } => {
            let config = load_bridge_config(cli.config.as_ref(), None, app_dir, None, python)?;
            commands::build_command(config).await?;
        }
        Commands::Compute {
            route,
            state,
            app_dir,
            python,
        } => {
            let config = load_bridge_config(cli.config.as_ref(), None, app_dir, None, python)?;
            commands::compute_command(config, &route, &state).await?;
        }
        Commands::Deps { app_dir } => {
            let config = load_bridge_config(cli.config.as_ref(), None, app_dir, None, None)?;
            commands::deps_command(&config)?;
        }
        Commands::Status { port } => {
            let config = load_bridge_config(cli.config.as_ref(), port, None, None, None)?;
            commands::status_command(&config).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(cli.config.as_ref())?,
            ConfigAction::Path => {
                let path = cli
                    .config
                    .clone()
                    .unwrap_or_else(config::default_config_path);
                println!("{}", path.display());
            }
            ConfigAction::Init { force } => commands::config_init(cli.config.as_ref(), force)?,
        },
    }

    Ok(())
}

/// Load configuration and apply command-line overrides
///
/// An explicitly passed config file must load; the default location is
/// optional and falls back to defaults.
fn load_bridge_config(
    config_path: Option<&PathBuf>,
    port: Option<u16>,
    app_dir: Option<PathBuf>,
    name: Option<String>,
    python: Option<String>,
) -> Result<BridgeConfig> {
    let mut config: BridgeConfig = if let Some(path) = config_path {
        config::load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            config::load_config(&default_path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load config from {}: {}",
                    default_path.display(),
                    e
                );
                BridgeConfig::default()
            })
        } else {
            BridgeConfig::default()
        }
    };

    if let Some(port) = port {
        config.ipc_port = port;
    }
    if let Some(app_dir) = app_dir {
        config.app_dir = app_dir;
    }
    if let Some(name) = name {
        config.client_name = name;
    }
    if let Some(python) = python {
        config.python_command = python;
    }

    // Subprocess working directories need an absolute path; the bridge
    // itself never changes directory
    config.app_dir = config::absolute_path(&config.app_dir);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ipc_port = 5005\npython_command = \"python3\"\n").unwrap();

        let config = load_bridge_config(
            Some(&path),
            Some(6006),
            Some(PathBuf::from("apps/demo")),
            Some("bridge-two".to_string()),
            None,
        )
        .unwrap();

        assert_eq!(config.ipc_port, 6006);
        assert_eq!(config.python_command, "python3");
        assert_eq!(config.client_name, "bridge-two");
        assert!(config.app_dir.is_absolute());
        assert!(config.app_dir.ends_with("apps/demo"));
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(load_bridge_config(Some(&path), None, None, None, None).is_err());
    }
}
