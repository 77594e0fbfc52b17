//! CLI command implementations

mod build;
mod compute;
mod config;
mod connect;
mod deps;
mod status;

pub use build::build_command;
pub use compute::compute_command;
pub use config::{config_init, config_show};
pub use connect::connect_command;
pub use deps::deps_command;
pub use status::status_command;
