//! pybridge CLI library
//!
//! Command implementations and output helpers for the `pybridge` binary.

pub mod commands;
pub mod output;
