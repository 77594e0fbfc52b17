//! Pipfile parsing for the dependency build
//!
//! The editor writes a Pipfile next to the generated controllers describing
//! the Python packages the application needs. Only the subset the build
//! consumes is modeled: `[packages]` and `[dev-packages]`. Everything else
//! (`[[source]]`, `[requires]`, markers) is ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::BuildError;

/// Parsed Pipfile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pipfile {
    /// Runtime dependencies
    #[serde(default)]
    pub packages: BTreeMap<String, DepSpec>,

    /// Development dependencies
    #[serde(default, rename = "dev-packages")]
    pub dev_packages: BTreeMap<String, DepSpec>,
}

/// A single dependency specifier
///
/// Pipfile values are either a bare version string (`"*"`, `"==2.28.1"`)
/// or a table carrying `version`, `extras`, and friends.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DepSpec {
    /// `requests = "==2.28.1"`
    Version(String),

    /// `requests = { version = ">=2.0", extras = ["socks"] }`
    Detailed {
        version: Option<String>,
        #[serde(default)]
        extras: Vec<String>,
    },
}

impl DepSpec {
    fn to_requirement(&self, name: &str, dev: bool) -> Requirement {
        let (spec, extras) = match self {
            DepSpec::Version(version) => (Some(version.clone()), Vec::new()),
            DepSpec::Detailed { version, extras } => (version.clone(), extras.clone()),
        };

        Requirement {
            name: name.to_string(),
            spec,
            extras,
            dev,
        }
    }
}

/// One flattened install requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub spec: Option<String>,
    pub extras: Vec<String>,
    pub dev: bool,
}

impl Requirement {
    /// Render the argument handed to `pipenv install`
    ///
    /// `"*"` and missing specs install unpinned. A spec starting with a
    /// digit is a bare version and gets normalized to an `==` pin, which
    /// is what pip expects on the command line.
    pub fn install_arg(&self) -> String {
        let mut arg = self.name.clone();
        if !self.extras.is_empty() {
            arg.push('[');
            arg.push_str(&self.extras.join(","));
            arg.push(']');
        }

        match self.spec.as_deref() {
            None | Some("*") | Some("") => arg,
            Some(spec) if spec.starts_with(|c: char| c.is_ascii_digit()) => {
                format!("{}=={}", arg, spec)
            }
            Some(spec) => format!("{}{}", arg, spec),
        }
    }
}

impl Pipfile {
    /// Parse Pipfile content (Pipfiles are TOML)
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load and parse a Pipfile from disk
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// All requirements in install order: default packages first, then dev
    pub fn requirements(&self) -> Vec<Requirement> {
        let mut requirements = Vec::with_capacity(self.packages.len() + self.dev_packages.len());
        for (name, spec) in &self.packages {
            requirements.push(spec.to_requirement(name, false));
        }
        for (name, spec) in &self.dev_packages {
            requirements.push(spec.to_requirement(name, true));
        }
        requirements
    }

    /// True when neither section declares anything
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.dev_packages.is_empty()
    }
}
