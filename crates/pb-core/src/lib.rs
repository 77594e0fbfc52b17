//! pb-core: Shared types for the pybridge workspace
//!
//! This crate provides the wire protocol spoken by the editor's IPC server,
//! configuration structures, Pipfile parsing for the dependency build, and
//! detection of the local Python tooling. The bridge loop itself lives in
//! `pb-bridge`; the binary in `pb-cli`.

pub mod config;
pub mod error;
pub mod ipc;
pub mod pipfile;
pub mod python;
pub mod time;

pub use error::{BridgeError, BuildError, ComputeError, ConfigError, IpcError};
