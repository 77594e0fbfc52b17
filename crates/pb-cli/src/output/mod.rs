//! Output formatting utilities for the CLI

use std::io::{stderr, stdout};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use tabled::{settings::Style, Table, Tabled};

use pb_core::pipfile::Requirement;

/// Format the install plan from a Pipfile as a table
pub fn format_requirements(requirements: &[Requirement]) -> String {
    if requirements.is_empty() {
        return "No dependencies declared".to_string();
    }

    #[derive(Tabled)]
    struct RequirementRow {
        #[tabled(rename = "PACKAGE")]
        package: String,
        #[tabled(rename = "VERSION")]
        version: String,
        #[tabled(rename = "KIND")]
        kind: String,
    }

    let rows: Vec<RequirementRow> = requirements
        .iter()
        .map(|requirement| RequirementRow {
            package: if requirement.extras.is_empty() {
                requirement.name.clone()
            } else {
                format!("{}[{}]", requirement.name, requirement.extras.join(","))
            },
            version: requirement.spec.clone().unwrap_or_else(|| "*".to_string()),
            kind: if requirement.dev { "dev" } else { "default" }.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a success message with a green checkmark
pub fn print_success(message: &str) {
    let _ = execute!(
        stdout(),
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(message),
        Print("\n")
    );
}

/// Print an error message with a red cross
pub fn print_error(message: &str) {
    let _ = execute!(
        stderr(),
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(message),
        Print("\n")
    );
}

/// Print a warning message with a yellow marker
pub fn print_warning(message: &str) {
    let _ = execute!(
        stderr(),
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(message),
        Print("\n")
    );
}

/// Print an informational message with a blue marker
pub fn print_info(message: &str) {
    let _ = execute!(
        stdout(),
        SetForegroundColor(Color::Blue),
        Print("ℹ "),
        ResetColor,
        Print(message),
        Print("\n")
    );
}
