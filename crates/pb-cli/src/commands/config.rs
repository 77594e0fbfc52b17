//! Config command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};

use pb_core::config;

use crate::output::{print_error, print_info, print_success, print_warning};

/// Show the current configuration file
pub fn config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let path = config_path
        .cloned()
        .unwrap_or_else(config::default_config_path);

    if !path.exists() {
        print_warning(&format!("No configuration file found at {}", path.display()));
        print_info("Run 'pybridge config init' to create one");
        return Ok(());
    }

    print_info(&format!("Configuration file: {}", path.display()));
    println!();

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    println!("{}", content);

    Ok(())
}

/// Write a default configuration file
pub fn config_init(config_path: Option<&PathBuf>, force: bool) -> Result<()> {
    let config_file = config_path
        .cloned()
        .unwrap_or_else(config::default_config_path);

    if let Some(parent) = config_file.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
    }

    if config_file.exists() && !force {
        print_error(&format!(
            "Config file already exists: {}",
            config_file.display()
        ));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    std::fs::write(&config_file, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_file.display()))?;

    print_success(&format!(
        "Created configuration file: {}",
        config_file.display()
    ));

    Ok(())
}

/// Default configuration content, commented for hand editing
fn generate_default_config() -> String {
    r#"# pybridge configuration

# Port the editor's IPC server listens on (localhost only)
ipc_port = 4006

# Application root directory; generated controllers live in <app_dir>/controllers
app_dir = "."

# Name this process registers under with the IPC server
client_name = "pybridge-cli"

# Python interpreter used for controller subprocesses
python_command = "python"

# Connection timeout in seconds
connect_timeout = 10

[backoff]
# Initial retry delay in seconds
initial = 1
# Maximum retry delay in seconds
max = 4
# Delay multiplier per attempt
multiplier = 2.0
# Jitter factor (0.0 to 1.0)
jitter = 0.25
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::config::BridgeConfig;

    #[test]
    fn test_generated_config_parses_to_the_defaults() {
        let parsed: BridgeConfig = toml::from_str(&generate_default_config()).unwrap();
        let defaults = BridgeConfig::default();

        assert_eq!(parsed.ipc_port, defaults.ipc_port);
        assert_eq!(parsed.app_dir, defaults.app_dir);
        assert_eq!(parsed.client_name, defaults.client_name);
        assert_eq!(parsed.python_command, defaults.python_command);
        assert_eq!(parsed.connect_timeout, defaults.connect_timeout);
        assert_eq!(parsed.backoff.initial, defaults.backoff.initial);
        assert_eq!(parsed.backoff.max, defaults.backoff.max);
        assert_eq!(parsed.backoff.multiplier, defaults.backoff.multiplier);
        assert_eq!(parsed.backoff.jitter, defaults.backoff.jitter);
    }

    #[test]
    fn test_init_then_show_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        config_init(Some(&path), false).unwrap();
        assert!(path.exists());

        // A second init without --force must not overwrite
        std::fs::write(&path, "ipc_port = 9999\n").unwrap();
        config_init(Some(&path), false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("9999"));

        // With --force it does
        config_init(Some(&path), true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ipc_port = 4006"));
    }
}
