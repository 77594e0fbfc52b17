//! Deps command: show what the dependency build would install

use anyhow::Result;

use pb_core::config::BridgeConfig;
use pb_core::pipfile::Pipfile;

use crate::output::{format_requirements, print_info};

pub fn deps_command(config: &BridgeConfig) -> Result<()> {
    // The editor writes the Pipfile next to the controllers; after a build
    // it lives at the app root
    let controllers_pipfile = config.controllers_pipfile();
    let app_pipfile = config.app_pipfile();

    let path = if controllers_pipfile.exists() {
        controllers_pipfile
    } else if app_pipfile.exists() {
        app_pipfile
    } else {
        print_info(&format!(
            "No Pipfile found under {}",
            config.app_dir.display()
        ));
        return Ok(());
    };

    let pipfile = Pipfile::load(&path)?;
    let requirements = pipfile.requirements();

    print_info(&format!("Dependencies from {}", path.display()));
    println!();
    println!("{}", format_requirements(&requirements));

    Ok(())
}
