//! pb-bridge: Event bridge between the app editor and local Python tooling
//!
//! The editor runs an IPC server on localhost and pushes commands to
//! registered clients. This crate implements the client side: connect and
//! register, relay `doComputeInitialState` to a controller subprocess,
//! relay `doPythonBuild` to pipenv, and reconnect whenever the connection
//! drops.

pub mod build;
pub mod client;
pub mod compute;
pub mod handlers;
pub mod reconnect;
pub mod relay;

pub use build::{run_python_build, BuildOutcome};
pub use client::{ping, BridgeConnector, MessageReader, MessageWriter};
pub use handlers::{CommandHandler, LocalHandler};
pub use reconnect::ExponentialBackoff;
pub use relay::run_bridge;
