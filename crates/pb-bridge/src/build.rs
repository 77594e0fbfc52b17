//! Python dependency environment build
//!
//! Takes the Pipfile the editor wrote next to the controllers and installs
//! it with pipenv. Outside a virtual environment the Pipfile moves to the
//! app root and one `pipenv install` does the rest; inside one, each
//! requirement is installed individually so it lands in the active
//! environment. Either way the controllers copy is removed afterwards so a
//! later build starts clean.

use std::fmt;
use std::path::Path;

use tokio::process::Command;

use pb_core::config::BridgeConfig;
use pb_core::pipfile::Pipfile;
use pb_core::{python, BuildError};

/// What the build did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No Pipfile next to the controllers; nothing to install
    NoPipfile,

    /// Pipfile moved to the app root and installed in one `pipenv install`
    Locked { packages: usize },

    /// Each requirement installed into the active virtual environment
    Installed { packages: usize },
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::NoPipfile => write!(f, "no Pipfile found, nothing to build"),
            BuildOutcome::Locked { packages } => {
                write!(f, "installed {} packages into a pipenv environment", packages)
            }
            BuildOutcome::Installed { packages } => {
                write!(f, "installed {} packages into the active environment", packages)
            }
        }
    }
}

/// Run the dependency build for the application
pub async fn run_python_build(config: &BridgeConfig) -> Result<BuildOutcome, BuildError> {
    let controllers_pipfile = config.controllers_pipfile();
    if !controllers_pipfile.exists() {
        tracing::info!(
            "No Pipfile at {}, nothing to build",
            controllers_pipfile.display()
        );
        return Ok(BuildOutcome::NoPipfile);
    }

    let pipfile = Pipfile::load(&controllers_pipfile)?;

    let outcome = if !python::in_virtualenv(&config.python_command) {
        if !python::is_pipenv_installed() {
            return Err(BuildError::PipenvNotInstalled);
        }
        install_via_pipfile(config, &controllers_pipfile, &pipfile).await?
    } else {
        // Inside a virtual environment the only supported manager is still
        // pipenv; it installs into the active environment instead of
        // creating its own.
        if !python::is_pipenv_installed() {
            return Err(BuildError::UnsupportedEnvironment);
        }
        install_into_active_env(config, &pipfile).await?
    };

    remove_pipfile(&controllers_pipfile).await;
    Ok(outcome)
}

/// Copy the Pipfile to the app root and let pipenv install everything
async fn install_via_pipfile(
    config: &BridgeConfig,
    controllers_pipfile: &Path,
    pipfile: &Pipfile,
) -> Result<BuildOutcome, BuildError> {
    let app_pipfile = config.app_pipfile();
    tokio::fs::copy(controllers_pipfile, &app_pipfile).await?;

    tracing::info!(
        "Installing Python dependencies with pipenv in {}",
        config.app_dir.display()
    );
    let status = pipenv(config).arg("install").status().await?;
    if !status.success() {
        return Err(BuildError::InstallFailed { status });
    }

    Ok(BuildOutcome::Locked {
        packages: pipfile.requirements().len(),
    })
}

/// Install requirements one by one into the active virtual environment
async fn install_into_active_env(
    config: &BridgeConfig,
    pipfile: &Pipfile,
) -> Result<BuildOutcome, BuildError> {
    let requirements = pipfile.requirements();

    for requirement in &requirements {
        let arg = requirement.install_arg();
        tracing::info!("Installing {}", arg);

        let mut cmd = pipenv(config);
        cmd.arg("install");
        if requirement.dev {
            cmd.arg("--dev");
        }

        let status = cmd.arg(&arg).status().await?;
        if !status.success() {
            return Err(BuildError::PackageInstallFailed {
                package: requirement.name.clone(),
                status,
            });
        }
    }

    Ok(BuildOutcome::Installed {
        packages: requirements.len(),
    })
}

/// pipenv invocation rooted at the app directory, output inherited so
/// install progress shows up on the bridge's console
fn pipenv(config: &BridgeConfig) -> Command {
    let mut cmd = Command::new("pipenv");
    cmd.current_dir(&config.app_dir).kill_on_drop(true);
    cmd
}

/// Remove the controllers Pipfile after a build; failure is not fatal
async fn remove_pipfile(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to remove {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_pipfile_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig {
            app_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let outcome = run_python_build(&config).await.unwrap();
        assert_eq!(outcome, BuildOutcome::NoPipfile);
    }

    #[tokio::test]
    async fn test_invalid_pipfile_fails_before_any_install() {
        let dir = tempfile::tempdir().unwrap();
        let controllers = dir.path().join("controllers");
        std::fs::create_dir_all(&controllers).unwrap();
        std::fs::write(controllers.join("Pipfile"), "[packages]\nrequests = 42\n").unwrap();

        let config = BridgeConfig {
            app_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let err = run_python_build(&config).await.unwrap_err();
        assert!(matches!(err, BuildError::Pipfile(_)));

        // A failed build leaves the Pipfile in place for a retry
        assert!(controllers.join("Pipfile").exists());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            BuildOutcome::Locked { packages: 3 }.to_string(),
            "installed 3 packages into a pipenv environment"
        );
        assert_eq!(
            BuildOutcome::NoPipfile.to_string(),
            "no Pipfile found, nothing to build"
        );
    }
}
